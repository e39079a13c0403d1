//! Top-level simulation state: board, input machine, beam, glyph table and
//! the RNG that drives tile spawning, stepped one frame at a time.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::beam::Beam;
use crate::frame;
use crate::glyphs::GlyphTable;
use crate::grid::BorderedGrid;
use crate::input::InputStateMachine;
use crate::moves;
use crate::screen_buffer::ScreenBuffer;

pub struct Console {
    pub grid: BorderedGrid,
    pub input: InputStateMachine,
    beam: Beam,
    glyphs: GlyphTable,
    rng: StdRng,
}

impl Console {
    /// A fresh game with OS-seeded randomness.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// A fresh game with deterministic tile placement, for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let mut grid = BorderedGrid::new();
        grid.initialize();
        // Two starting tiles.
        moves::spawn_tile(&mut grid, &mut rng);
        moves::spawn_tile(&mut grid, &mut rng);
        Console {
            grid,
            input: InputStateMachine::new(),
            beam: Beam::new(),
            glyphs: GlyphTable::new(),
            rng,
        }
    }

    /// Run one complete frame: paint the board and evaluate input.
    pub fn run_frame(&mut self) {
        frame::run_frame(
            &mut self.grid,
            &mut self.input,
            &mut self.beam,
            &self.glyphs,
            &mut self.rng,
        );
    }

    /// Latch the controller switch sample the next overscan will read.
    pub fn set_switches(&mut self, sample: u8) {
        self.beam.set_switches(sample);
    }

    pub fn screen(&self) -> &ScreenBuffer {
        self.beam.screen()
    }

    /// True when no gesture can change the board any more.
    pub fn is_game_over(&self) -> bool {
        !moves::has_any_move(&self.grid)
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
