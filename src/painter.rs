//! Per-row raster state machine.
//!
//! Four tiles per row out of two sprite channels: during horizontal blank
//! the channels carry the glyph bytes for columns 0 and 1, and while the beam
//! crosses the midpoint between the copy pairs both channels are rewritten
//! with the bytes for columns 2 and 3. The rewrite must land before the beam
//! reaches the second pair of copies; after it, the wrong glyph repeats.

use crate::beam::{BandPattern, Beam, Channel, MID_SWAP_CLOCK};
use crate::glyphs::{GLYPH_HEIGHT, GlyphTable};
use crate::resolver::RowSlots;

/// Painted scanlines per grid row: each glyph byte is shown on two lines.
pub const PAINT_LINES: u16 = (GLYPH_HEIGHT as u16) * 2;
/// Blank scanlines between rows.
pub const GAP_LINES: u16 = 2;

/// Drives one row-paint cycle with a descending scanline counter
/// (PAINT_LINES-1 down to 0; -1 means the row is complete). One painter pass
/// per grid row, run start to finish within the frame, never restarted.
pub struct RasterPainter {
    line: i16,
}

impl RasterPainter {
    /// Start a row-paint cycle with the counter at the top.
    pub fn begin_row() -> Self {
        RasterPainter {
            line: PAINT_LINES as i16 - 1,
        }
    }

    /// True once the counter has run out.
    pub fn row_complete(&self) -> bool {
        self.line < 0
    }

    /// Paint one visible scanline of the current row.
    pub fn paint_scanline(&mut self, slots: &RowSlots, glyphs: &GlyphTable, beam: &mut Beam) {
        debug_assert!(!self.row_complete());
        let glyph_line = (PAINT_LINES as i16 - 1 - self.line) as usize / 2;

        // Columns 0 and 1 go out while the beam is still in horizontal blank.
        beam.set_sprite_pattern(Channel::A, glyphs.byte(slots.offset(0), glyph_line));
        beam.set_sprite_pattern(Channel::B, glyphs.byte(slots.offset(1), glyph_line));

        // Hard deadline: columns 2 and 3 must replace them while the beam is
        // between the first and second copy of each channel.
        beam.wait_for_beam(MID_SWAP_CLOCK);
        beam.set_sprite_pattern(Channel::A, glyphs.byte(slots.offset(2), glyph_line));
        beam.set_sprite_pattern(Channel::B, glyphs.byte(slots.offset(3), glyph_line));

        beam.end_scanline();
        self.line -= 1;
    }

    /// Close out the row: blank both channels, drop the band back to
    /// inter-row space, and emit the gap scanlines.
    pub fn finish_row(&self, beam: &mut Beam) {
        debug_assert!(self.row_complete());
        beam.set_sprite_pattern(Channel::A, 0);
        beam.set_sprite_pattern(Channel::B, 0);
        beam.set_band_pattern(BandPattern::Gap);
        for _ in 0..GAP_LINES {
            beam.end_scanline();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beam::{CHANNEL_COPIES, FIRST_VISIBLE_LINE, palette};
    use crate::grid::{BorderedGrid, Cell};
    use crate::resolver::resolve_column;

    fn visible_beam() -> Beam {
        let mut beam = Beam::new();
        beam.begin_frame();
        for _ in 0..FIRST_VISIBLE_LINE {
            beam.end_scanline();
        }
        beam.set_sprite_color(Channel::A, 0x0E);
        beam.set_sprite_color(Channel::B, 0x0E);
        beam
    }

    fn slots_for_row(grid: &BorderedGrid, row: usize) -> RowSlots {
        let mut slots = RowSlots::new();
        for col in 0..4 {
            resolve_column(grid, row, col, &mut slots);
        }
        slots
    }

    /// Count lit sprite pixels in one 16-pixel tile window on a line.
    fn lit_pixels(beam: &Beam, tile_x: u16, y: u32) -> usize {
        let lit = palette(0x0E);
        (tile_x..tile_x + 16)
            .filter(|&x| beam.screen().get_pixel(x as u32, y) == lit)
            .count()
    }

    #[test]
    fn test_row_cycle_counts_down_to_complete() {
        let grid = BorderedGrid::new();
        let glyphs = GlyphTable::new();
        let slots = slots_for_row(&grid, 0);
        let mut beam = visible_beam();

        let mut painter = RasterPainter::begin_row();
        let mut lines = 0;
        while !painter.row_complete() {
            painter.paint_scanline(&slots, &glyphs, &mut beam);
            lines += 1;
        }
        assert_eq!(lines, PAINT_LINES);
        painter.finish_row(&mut beam);
        assert_eq!(beam.frame_scanlines(), FIRST_VISIBLE_LINE + PAINT_LINES + GAP_LINES);
    }

    #[test]
    fn test_four_independent_tiles_per_row() {
        // Tiles [2, _, _, 4]: column 0 and 3 draw pixels, 1 and 2 stay blank.
        let mut grid = BorderedGrid::new();
        grid.set(0, 0, Cell::Tile(1));
        grid.set(0, 3, Cell::Tile(2));
        let glyphs = GlyphTable::new();
        let slots = slots_for_row(&grid, 0);
        let mut beam = visible_beam();

        let mut painter = RasterPainter::begin_row();
        while !painter.row_complete() {
            painter.paint_scanline(&slots, &glyphs, &mut beam);
        }

        // Glyph line 3 (digit rows) doubled onto scanlines 6 and 7.
        let y = 6;
        assert!(lit_pixels(&beam, CHANNEL_COPIES[0][0], y) > 0, "column 0 draws");
        assert_eq!(lit_pixels(&beam, CHANNEL_COPIES[1][0], y), 0, "column 1 blank");
        assert_eq!(lit_pixels(&beam, CHANNEL_COPIES[0][1], y), 0, "column 2 blank");
        assert!(lit_pixels(&beam, CHANNEL_COPIES[1][1], y) > 0, "column 3 draws");
    }

    #[test]
    fn test_distinct_glyphs_on_shared_channel() {
        // Columns 0 and 2 share channel A; give them different tiles and
        // check the two copies show different patterns on some line.
        let mut grid = BorderedGrid::new();
        grid.set(0, 0, Cell::Tile(1)); // "2"
        grid.set(0, 2, Cell::Tile(4)); // "16"
        let glyphs = GlyphTable::new();
        let slots = slots_for_row(&grid, 0);
        let mut beam = visible_beam();

        let mut painter = RasterPainter::begin_row();
        while !painter.row_complete() {
            painter.paint_scanline(&slots, &glyphs, &mut beam);
        }

        let lit = palette(0x0E);
        let mut differs = false;
        for y in 0..PAINT_LINES as u32 {
            let sample = |base: u16| -> Vec<bool> {
                (0..16)
                    .map(|dx| beam.screen().get_pixel((base + dx) as u32, y) == lit)
                    .collect()
            };
            if sample(CHANNEL_COPIES[0][0]) != sample(CHANNEL_COPIES[0][1]) {
                differs = true;
                break;
            }
        }
        assert!(differs, "the mid-scanline swap must give the copies independent glyphs");
    }

    #[test]
    fn test_finish_row_blanks_the_gap() {
        let grid = BorderedGrid::new();
        let glyphs = GlyphTable::new();
        let slots = slots_for_row(&grid, 0);
        let mut beam = visible_beam();
        beam.set_band_color(0x26);
        beam.set_band_pattern(BandPattern::TileCards);

        let mut painter = RasterPainter::begin_row();
        while !painter.row_complete() {
            painter.paint_scanline(&slots, &glyphs, &mut beam);
        }
        painter.finish_row(&mut beam);

        // Gap lines show plain background, no cards.
        let gap_y = PAINT_LINES as u32;
        assert_eq!(beam.screen().get_pixel(12, gap_y), palette(0x00));
    }
}
