use crate::moves::Direction;

/// Number of playable rows on the board.
pub const GRID_ROWS: usize = 4;
/// Number of playable columns on the board.
pub const GRID_COLS: usize = 4;

/// Largest tile exponent the board can hold (value 2^13 = 8192).
pub const MAX_EXPONENT: u8 = 13;

/// Distance in buffer cells between the same column of two adjacent rows.
/// Each row carries one trailing sentinel, so the stride is C+1.
const STRIDE: usize = GRID_COLS + 1;

/// Buffer length: R rows of C cells plus one shared sentinel each, then one
/// full sentinel row terminating the board. No sentinel row is stored above
/// row 0; offsets before the buffer start read as `Sentinel` instead.
const BUFFER_LEN: usize = (GRID_ROWS + 1) * STRIDE;

/// A single board cell.
///
/// `Tile(n)` represents the tile of value 2^n; `Sentinel` is the impassable
/// border marker that surrounds the playable area.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Tile(u8),
    Sentinel,
}

impl Cell {
    /// Byte code for the sentinel. Strictly greater than any tile code, so a
    /// single comparison distinguishes border from board.
    pub const SENTINEL_CODE: u8 = 0xFF;

    /// The byte stored in the grid buffer for this cell.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Tile(n) => n,
            Cell::Sentinel => Self::SENTINEL_CODE,
        }
    }

    /// Decode a buffer byte back into a cell.
    pub fn from_code(code: u8) -> Self {
        debug_assert!(
            code <= MAX_EXPONENT || code == Self::SENTINEL_CODE,
            "invalid cell code {code:#04x}"
        );
        match code {
            0 => Cell::Empty,
            Self::SENTINEL_CODE => Cell::Sentinel,
            n => Cell::Tile(n),
        }
    }

    /// True for any cell a tile could occupy or move through. This single
    /// comparison is the only boundary check movement logic ever performs;
    /// there are no row/column range checks anywhere.
    pub fn is_in_bounds(self) -> bool {
        self.code() != Self::SENTINEL_CODE
    }
}

/// The logical board: a 4x4 cell area wrapped in a one-cell sentinel border,
/// collapsed into a flat byte buffer where each row's trailing sentinel
/// doubles as the next row's leading border.
///
/// Allocated once and mutated in place for the life of the process.
pub struct BorderedGrid {
    cells: [u8; BUFFER_LEN],
}

impl BorderedGrid {
    /// Create a fully initialized grid: border sentinels in place, interior
    /// empty.
    pub fn new() -> Self {
        let mut grid = BorderedGrid {
            cells: [Cell::SENTINEL_CODE; BUFFER_LEN],
        };
        grid.initialize();
        grid
    }

    /// Fill the whole buffer with sentinels, then clear the interior.
    /// Idempotent; also used by tests to reset a board.
    pub fn initialize(&mut self) {
        self.cells.fill(Cell::SENTINEL_CODE);
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                self.cells[Self::index(row, col)] = Cell::Empty.code();
            }
        }
    }

    fn index(row: usize, col: usize) -> usize {
        row * STRIDE + col
    }

    /// Read an interior cell. Border coordinates are not addressable.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        debug_assert!(row < GRID_ROWS && col < GRID_COLS);
        Cell::from_code(self.cells[Self::index(row, col)])
    }

    /// Write an interior cell. Border coordinates are not addressable.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        debug_assert!(row < GRID_ROWS && col < GRID_COLS);
        debug_assert!(cell != Cell::Sentinel, "sentinels are never written by callers");
        self.cells[Self::index(row, col)] = cell.code();
    }

    /// Probe the neighbor of an interior cell in the given direction.
    ///
    /// Steps by the row stride (up/down) or one cell (left/right) exactly as
    /// the buffer layout dictates. Any offset before the buffer start reads
    /// as `Sentinel`, which closes the border ring above row 0 without
    /// storing a leading sentinel row.
    pub fn step(&self, row: usize, col: usize, direction: Direction) -> Cell {
        debug_assert!(row < GRID_ROWS && col < GRID_COLS);
        let from = Self::index(row, col) as isize;
        let to = from
            + match direction {
                Direction::Up => -(STRIDE as isize),
                Direction::Down => STRIDE as isize,
                Direction::Left => -1,
                Direction::Right => 1,
            };
        if to < 0 || to as usize >= BUFFER_LEN {
            Cell::Sentinel
        } else {
            Cell::from_code(self.cells[to as usize])
        }
    }

    /// True while `row` starts with a data cell. The painter uses this probe
    /// on the next row's leading cell to detect the end of the grid: the
    /// trailing sentinel row terminates the scan.
    pub fn row_exists(&self, row: usize) -> bool {
        row <= GRID_ROWS && self.cells[Self::index(row, 0)] != Cell::SENTINEL_CODE
    }
}
