//! Line clearing: settle a piece, then drop full rows out of the grid.

use crate::grid::Grid;
use crate::piece::ShapeKind;

/// Turn the piece's cells into Filled cells and clear any rows that completes.
/// Returns the number of rows cleared.
pub fn settle(grid: &mut Grid, cells: &[usize], shape: ShapeKind) -> usize {
    grid.set_filled(cells, shape);
    clear_full_rows(grid)
}

/// Single bottom-to-top pass: each surviving row moves down by the number
/// of full rows found beneath it, and the vacated top rows become Empty.
/// A grid with no full row is left untouched.
pub fn clear_full_rows(grid: &mut Grid) -> usize {
    let rows = grid.rows();
    let mut cleared = 0;
    for row in 0..rows {
        if grid.is_row_full(row) {
            cleared += 1;
        } else if cleared > 0 {
            grid.copy_row(row, row - cleared);
        }
    }
    for row in rows - cleared..rows {
        grid.reset_row(row);
    }
    cleared
}
