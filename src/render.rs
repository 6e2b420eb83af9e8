//! Render seam: the board asks a `BoardRenderer` to draw, it never draws itself.

use crate::grid::{Grid, Occupancy};
use crate::piece::ShapeKind;

/// Drawing primitives a front end provides. Row 0 is the bottom row.
pub trait BoardRenderer {
    fn draw_background(&mut self, columns: usize, rows: usize);
    fn draw_filled(&mut self, column: usize, row: usize, shape: ShapeKind);
    fn draw_moving(&mut self, column: usize, row: usize, shape: ShapeKind);
}

/// Draw the background, then every Filled and Moving cell.
/// Cells without a shape tag are skipped.
pub fn render_board<R: BoardRenderer + ?Sized>(grid: &Grid, renderer: &mut R) {
    renderer.draw_background(grid.columns(), grid.rows());
    for cell in grid.cells() {
        let Some(shape) = cell.shape else {
            continue;
        };
        match cell.occupancy {
            Occupancy::Filled => renderer.draw_filled(cell.column, cell.row, shape),
            Occupancy::Moving => renderer.draw_moving(cell.column, cell.row, shape),
            Occupancy::Empty => {}
        }
    }
}
