//! Rule evaluation: B3/S23 over a read-only snapshot.
//!
//! These are pure functions. Many worker threads call them concurrently
//! against the same shared snapshot, so nothing here takes `&mut Grid`.

use super::{Grid, ALIVE, DEAD};

/// Count the live cells among the 8 toroidally-wrapped neighbours of
/// (x, y).
pub fn live_neighbours(grid: &Grid, x: usize, y: usize) -> u8 {
    let x = x as isize;
    let y = y as isize;
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if (dx != 0 || dy != 0) && grid.wrapped(x + dx, y + dy) == ALIVE {
                count += 1;
            }
        }
    }
    count
}

/// Compute the next state of the cell at (x, y).
///
/// A live cell survives with 2 or 3 live neighbours; a dead cell is born
/// with exactly 3. Everything else is dead.
pub fn next_state(grid: &Grid, x: usize, y: usize) -> u8 {
    let neighbours = live_neighbours(grid, x, y);
    let alive = grid.get(x, y) == ALIVE;
    if neighbours == 3 || (alive && neighbours == 2) {
        ALIVE
    } else {
        DEAD
    }
}

/// Compute the next-state rows for the band `[start_y, end_y)`.
///
/// This is the worker kernel: it reads only the snapshot (neighbour
/// lookups may wrap outside the band) and returns the band's row-major
/// byte block.
pub fn step_rows(grid: &Grid, start_y: usize, end_y: usize) -> Vec<u8> {
    debug_assert!(start_y <= end_y && end_y <= grid.height());
    let width = grid.width();
    let mut rows = Vec::with_capacity((end_y - start_y) * width);
    for y in start_y..end_y {
        for x in 0..width {
            rows.push(next_state(grid, x, y));
        }
    }
    rows
}

/// Compute a whole next generation on the calling thread.
///
/// The single-threaded reference for the parallel turn: the coordinator
/// must produce exactly this grid no matter how many workers it uses.
pub fn step(grid: &Grid) -> Grid {
    let rows = step_rows(grid, 0, grid.height());
    Grid::from_cells(grid.width(), grid.height(), rows)
}
