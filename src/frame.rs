//! Frame scheduling.
//!
//! One frame is a fixed sequence of phases, each a fixed number of
//! scanlines; the sum never varies, whatever the board holds or the player
//! does. There is no idle loop anywhere — this phase walk is the program.
//! Input is sampled exactly once, during overscan, so the move/merge work can
//! never stretch the frame.

use rand::Rng;

use crate::beam::{BandPattern, Beam, Channel};
use crate::glyphs::GlyphTable;
use crate::grid::{BorderedGrid, GRID_COLS, GRID_ROWS};
use crate::input::InputStateMachine;
use crate::painter::{GAP_LINES, PAINT_LINES, RasterPainter};
use crate::resolver::{RowSlots, resolve_column};

/// The phases of one frame, in order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    VerticalSync,
    VerticalBlank,
    GridSetup,
    RowPreparation,
    RowPaint,
    BottomMargin,
    Overscan,
}

/// Scanline budget for one phase. `per_row` phases run once per grid row.
pub struct PhaseBudget {
    pub phase: Phase,
    pub scanlines: u16,
    pub per_row: bool,
}

/// The complete scanline budget. RowPaint covers the painted lines plus the
/// inter-row gap.
pub const PHASE_BUDGET: [PhaseBudget; 7] = [
    PhaseBudget { phase: Phase::VerticalSync, scanlines: 3, per_row: false },
    PhaseBudget { phase: Phase::VerticalBlank, scanlines: 37, per_row: false },
    PhaseBudget { phase: Phase::GridSetup, scanlines: 10, per_row: false },
    PhaseBudget { phase: Phase::RowPreparation, scanlines: GRID_COLS as u16, per_row: true },
    PhaseBudget { phase: Phase::RowPaint, scanlines: PAINT_LINES + GAP_LINES, per_row: true },
    PhaseBudget { phase: Phase::BottomMargin, scanlines: 70, per_row: false },
    PhaseBudget { phase: Phase::Overscan, scanlines: 30, per_row: false },
];

/// The one and only frame length.
pub const SCANLINES_PER_FRAME: u16 = 262;

/// Sum of the phase budget over a whole frame.
pub fn scanlines_per_frame() -> u16 {
    PHASE_BUDGET
        .iter()
        .map(|entry| {
            if entry.per_row {
                entry.scanlines * GRID_ROWS as u16
            } else {
                entry.scanlines
            }
        })
        .sum()
}

/// Palette code for the area outside the board.
pub const BACKGROUND_COLOR: u8 = 0x02;
/// Palette code for the card drawn behind each tile position.
pub const CARD_COLOR: u8 = 0x26;
/// Palette code for the glyph pixels.
pub const GLYPH_COLOR: u8 = 0x0E;

fn budget(phase: Phase) -> u16 {
    PHASE_BUDGET
        .iter()
        .find(|entry| entry.phase == phase)
        .map(|entry| entry.scanlines)
        .unwrap_or(0)
}

/// Run one complete frame against the simulation state.
pub fn run_frame<R: Rng + ?Sized>(
    grid: &mut BorderedGrid,
    input: &mut InputStateMachine,
    beam: &mut Beam,
    glyphs: &GlyphTable,
    rng: &mut R,
) {
    beam.begin_frame();

    beam.set_vsync(true);
    for _ in 0..budget(Phase::VerticalSync) {
        beam.end_scanline();
    }
    beam.set_vsync(false);

    beam.set_vblank(true);
    for _ in 0..budget(Phase::VerticalBlank) {
        beam.end_scanline();
    }
    beam.set_vblank(false);

    // Grid setup: colors, blank channels, inter-row fill.
    beam.set_background_color(BACKGROUND_COLOR);
    beam.set_band_color(CARD_COLOR);
    beam.set_sprite_color(Channel::A, GLYPH_COLOR);
    beam.set_sprite_color(Channel::B, GLYPH_COLOR);
    beam.set_sprite_pattern(Channel::A, 0);
    beam.set_sprite_pattern(Channel::B, 0);
    beam.set_band_pattern(BandPattern::Gap);
    for _ in 0..budget(Phase::GridSetup) {
        beam.end_scanline();
    }

    let mut rows_painted = 0u16;
    for row in 0..GRID_ROWS {
        // The trailing sentinel row, not a loop bound, terminates the grid.
        if !grid.row_exists(row) {
            break;
        }

        // Row preparation: one column resolved per scanline.
        let mut slots = RowSlots::new();
        for col in 0..GRID_COLS {
            resolve_column(grid, row, col, &mut slots);
            beam.end_scanline();
        }

        beam.set_band_pattern(BandPattern::TileCards);
        let mut painter = RasterPainter::begin_row();
        while !painter.row_complete() {
            painter.paint_scanline(&slots, glyphs, beam);
        }
        painter.finish_row(beam);
        rows_painted += 1;
    }

    // The bottom margin absorbs the budget of any row the sentinel probe cut
    // short, so the frame length stays constant.
    let row_lines = GRID_COLS as u16 + PAINT_LINES + GAP_LINES;
    let margin = budget(Phase::BottomMargin) + row_lines * (GRID_ROWS as u16 - rows_painted);
    for _ in 0..margin {
        beam.end_scanline();
    }

    // Overscan: the one place input is evaluated.
    beam.set_vblank(true);
    let sample = beam.switches();
    input.poll(sample, grid, rng);
    for _ in 0..budget(Phase::Overscan) {
        beam.end_scanline();
    }
}
