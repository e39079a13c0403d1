use rand::Rng;

use crate::grid::{BorderedGrid, Cell, GRID_COLS, GRID_ROWS, MAX_EXPONENT};

/// A recognized directional gesture, decoded once from the controller sample
/// and dispatched from here on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Slide and merge every line of the board toward the given edge.
///
/// Each line is scanned from its near edge outward: non-empty tiles compact
/// toward the edge, and two adjacent equal tiles merge into one of exponent
/// n+1. A freshly merged tile takes no further part in the same pass, and
/// tiles already at the maximum exponent never merge. Writes stay strictly
/// inside the data cells; the sentinel border is never touched.
///
/// Returns true if any tile moved or merged. When nothing can move the board
/// is left untouched and the caller should reject the gesture.
pub fn apply(grid: &mut BorderedGrid, direction: Direction) -> bool {
    let mut changed = false;
    match direction {
        Direction::Left | Direction::Right => {
            for row in 0..GRID_ROWS {
                let mut coords = [(0usize, 0usize); GRID_COLS];
                for (i, slot) in coords.iter_mut().enumerate() {
                    *slot = match direction {
                        Direction::Left => (row, i),
                        _ => (row, GRID_COLS - 1 - i),
                    };
                }
                changed |= compact_line(grid, &coords);
            }
        }
        Direction::Up | Direction::Down => {
            for col in 0..GRID_COLS {
                let mut coords = [(0usize, 0usize); GRID_ROWS];
                for (i, slot) in coords.iter_mut().enumerate() {
                    *slot = match direction {
                        Direction::Up => (i, col),
                        _ => (GRID_ROWS - 1 - i, col),
                    };
                }
                changed |= compact_line(grid, &coords);
            }
        }
    }
    changed
}

/// Compact one line of cells, given in near-edge-first order.
fn compact_line(grid: &mut BorderedGrid, coords: &[(usize, usize)]) -> bool {
    let mut line = [0u8; GRID_COLS];
    for (i, &(row, col)) in coords.iter().enumerate() {
        line[i] = grid.get(row, col).code();
    }

    let compacted = compact_codes(line);
    if compacted == line {
        return false;
    }
    for (i, &(row, col)) in coords.iter().enumerate() {
        grid.set(row, col, Cell::from_code(compacted[i]));
    }
    true
}

/// Slide tile codes toward index 0, merging adjacent equal pairs once.
fn compact_codes(line: [u8; GRID_COLS]) -> [u8; GRID_COLS] {
    let mut out = [0u8; GRID_COLS];
    let mut write = 0;
    // Index of the most recent tile still eligible to merge.
    let mut open: Option<usize> = None;

    for &code in line.iter() {
        if code == 0 {
            continue;
        }
        if let Some(idx) = open {
            if out[idx] == code && code < MAX_EXPONENT {
                out[idx] += 1;
                open = None;
                continue;
            }
        }
        out[write] = code;
        open = Some(write);
        write += 1;
    }
    out
}

/// Insert one new tile in a uniformly chosen empty cell: exponent 1 (a "2")
/// nine times out of ten, otherwise exponent 2 (a "4").
///
/// Returns false if the board has no empty cell.
pub fn spawn_tile<R: Rng + ?Sized>(grid: &mut BorderedGrid, rng: &mut R) -> bool {
    let mut empty = Vec::with_capacity(GRID_ROWS * GRID_COLS);
    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            if grid.get(row, col) == Cell::Empty {
                empty.push((row, col));
            }
        }
    }
    if empty.is_empty() {
        return false;
    }
    let (row, col) = empty[rng.random_range(0..empty.len())];
    let exponent = if rng.random_range(0..10) < 9 { 1 } else { 2 };
    grid.set(row, col, Cell::Tile(exponent));
    true
}

/// True if at least one gesture could still change the board: an empty cell
/// exists, or two equal tiles sit next to each other.
pub fn has_any_move(grid: &BorderedGrid) -> bool {
    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            let cell = grid.get(row, col);
            if cell == Cell::Empty {
                return true;
            }
            // Checking right and down covers every adjacent pair once.
            if grid.step(row, col, Direction::Right) == cell
                || grid.step(row, col, Direction::Down) == cell
            {
                return true;
            }
        }
    }
    false
}
