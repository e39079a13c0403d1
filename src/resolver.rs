//! Row address resolution.
//!
//! During the four row-preparation scanlines before each painted row, the
//! four cell codes of that row are turned into glyph addresses — one column
//! per scanline. The glyph table sits below a page boundary, so only the low
//! address byte is ever computed; the multiply by the glyph height is done
//! with shifts and adds, the way a machine without a hardware multiplier
//! would.

use crate::glyphs::GLYPH_HEIGHT;
use crate::grid::BorderedGrid;

/// The four transient glyph offsets for the row currently being prepared.
/// Recomputed every row-paint cycle and discarded once the row is painted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSlots {
    lo: [u8; 4],
}

impl RowSlots {
    pub fn new() -> Self {
        RowSlots { lo: [0; 4] }
    }

    /// Low-byte offset of the glyph for the given column slot.
    pub fn offset(&self, slot: usize) -> u8 {
        self.lo[slot]
    }
}

/// Low-byte offset of a cell code's glyph: `code * 11`, computed as
/// `3*code + 8*code` (two shifts, two adds).
pub fn glyph_offset(code: u8) -> u8 {
    let three = (code << 1).wrapping_add(code);
    three.wrapping_add(code << 3)
}

/// Resolve one column of the given row into its slot. Called once per
/// row-preparation scanline, four times per row. An empty cell resolves to
/// the blank glyph at offset 0; it is painted like any other tile, never
/// skipped.
pub fn resolve_column(grid: &BorderedGrid, row: usize, col: usize, slots: &mut RowSlots) {
    let code = grid.get(row, col).code();
    slots.lo[col] = glyph_offset(code);
}
