//! Cell diffing: find the cells that changed between two generations.
//!
//! The coordinator turns the result directly into `CellFlipped` events,
//! so the returned order (row-major) is the order flips are published in.

use super::{Cell, Grid};

/// Collect the coordinates of every cell whose state differs between
/// `old` and `new`, in row-major order.
///
/// The grids must have the same dimensions.
pub fn changed_cells(old: &Grid, new: &Grid) -> Vec<Cell> {
    debug_assert_eq!(old.width(), new.width());
    debug_assert_eq!(old.height(), new.height());

    let width = old.width();
    let mut changed = Vec::new();
    for (idx, (a, b)) in old.cells().iter().zip(new.cells()).enumerate() {
        if a != b {
            changed.push(Cell::new(idx % width, idx / width));
        }
    }
    changed
}
