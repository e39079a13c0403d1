//! Gesture recognition over the controller switch bitmask.
//!
//! The joystick reports in the upper nibble, active low: a pressed direction
//! pulls its bit to 0. Exactly one low bit is a gesture; diagonals and
//! anything else are no match. One gesture is consumed per press/release
//! cycle, sampled once per frame during overscan.

use rand::Rng;

use crate::grid::BorderedGrid;
use crate::moves::{self, Direction};

/// Switch bit for each direction (active low).
pub const SWITCH_UP: u8 = 0x10;
pub const SWITCH_DOWN: u8 = 0x20;
pub const SWITCH_LEFT: u8 = 0x40;
pub const SWITCH_RIGHT: u8 = 0x80;
/// All direction bits; high means released.
pub const SWITCH_MASK: u8 = 0xF0;

/// Whether a new directional gesture may currently be accepted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameMode {
    WaitingForPress,
    WaitingForRelease,
}

/// Decode a switch sample into a direction, if exactly one direction bit is
/// held low.
pub fn decode(sample: u8) -> Option<Direction> {
    match !sample & SWITCH_MASK {
        SWITCH_UP => Some(Direction::Up),
        SWITCH_DOWN => Some(Direction::Down),
        SWITCH_LEFT => Some(Direction::Left),
        SWITCH_RIGHT => Some(Direction::Right),
        _ => None,
    }
}

/// Press/release state machine feeding accepted gestures into the board.
pub struct InputStateMachine {
    mode: GameMode,
}

impl InputStateMachine {
    pub fn new() -> Self {
        InputStateMachine {
            mode: GameMode::WaitingForPress,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Evaluate one switch sample.
    ///
    /// In `WaitingForPress`, a recognized gesture applies the move and, if
    /// the board changed, spawns a new tile; the machine then waits for
    /// release whether or not the board changed, so a rejected gesture still
    /// costs a press. In `WaitingForRelease`, a neutral sample re-arms the
    /// machine. Everything else is a no-op.
    ///
    /// Returns the gesture that was accepted this sample, if any.
    pub fn poll<R: Rng + ?Sized>(
        &mut self,
        sample: u8,
        grid: &mut BorderedGrid,
        rng: &mut R,
    ) -> Option<Direction> {
        match self.mode {
            GameMode::WaitingForPress => {
                let direction = decode(sample)?;
                if moves::apply(grid, direction) {
                    moves::spawn_tile(grid, rng);
                }
                self.mode = GameMode::WaitingForRelease;
                Some(direction)
            }
            GameMode::WaitingForRelease => {
                if sample & SWITCH_MASK == SWITCH_MASK {
                    self.mode = GameMode::WaitingForPress;
                }
                None
            }
        }
    }
}

impl Default for InputStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
