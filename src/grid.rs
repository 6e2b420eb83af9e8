//! Cell grid: fixed-size row-major board, row 0 at the bottom.

use crate::piece::{Offset, ShapeKind};
use thiserror::Error;

/// What a cell currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occupancy {
    #[default]
    Empty,
    /// Part of a settled piece.
    Filled,
    /// Part of the active piece.
    Moving,
}

/// One grid cell. `column`/`row` always equal the cell's position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub column: usize,
    pub row: usize,
    pub occupancy: Occupancy,
    pub shape: Option<ShapeKind>,
}

impl Cell {
    fn empty(column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            occupancy: Occupancy::Empty,
            shape: None,
        }
    }

    fn reset(&mut self) {
        self.occupancy = Occupancy::Empty;
        self.shape = None;
    }
}

/// A placement the grid refuses. Nothing is written when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("anchor ({column}, {row}) lies outside the grid")]
    AnchorOutside { column: i32, row: i32 },
    #[error("cell index {index} lies outside the grid")]
    OutOfBounds { index: isize },
    #[error("cell index {index} wraps into column {actual}, expected column {expected}")]
    RowWrap {
        index: usize,
        expected: isize,
        actual: usize,
    },
    #[error("cell ({column}, {row}) is already filled")]
    Collision { column: usize, row: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Zero dimensions are raised to 1.
    pub fn new(columns: usize, rows: usize) -> Self {
        let (columns, rows) = (columns.max(1), rows.max(1));
        let cells = (0..columns * rows)
            .map(|i| Cell::empty(i % columns, i / columns))
            .collect();
        Self {
            columns,
            rows,
            cells,
        }
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Linear index for `(column, row)`, or `None` outside the grid.
    #[inline]
    pub fn index_of(&self, column: i32, row: i32) -> Option<usize> {
        if column < 0 || row < 0 {
            return None;
        }
        let (c, r) = (column as usize, row as usize);
        (c < self.columns && r < self.rows).then_some(r * self.columns + c)
    }

    #[cfg(test)]
    pub fn get(&self, column: usize, row: usize) -> Option<&Cell> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }

    /// True if `(column, row)` is Filled. Positions outside the grid count as occupied.
    pub fn is_occupied(&self, column: i32, row: i32) -> bool {
        match self.index_of(column, row) {
            Some(i) => self.cells[i].occupancy == Occupancy::Filled,
            None => true,
        }
    }

    pub fn set_filled(&mut self, indices: &[usize], shape: ShapeKind) {
        self.mark(indices, Occupancy::Filled, shape);
    }

    pub fn set_moving(&mut self, indices: &[usize], shape: ShapeKind) {
        self.mark(indices, Occupancy::Moving, shape);
    }

    fn mark(&mut self, indices: &[usize], occupancy: Occupancy, shape: ShapeKind) {
        for &i in indices {
            if let Some(cell) = self.cells.get_mut(i) {
                cell.occupancy = occupancy;
                cell.shape = Some(shape);
            }
        }
    }

    /// Reset every Moving cell to Empty.
    pub fn clear_moving(&mut self) {
        for cell in &mut self.cells {
            if cell.occupancy == Occupancy::Moving {
                cell.reset();
            }
        }
    }

    #[cfg(test)]
    pub fn moving_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.occupancy == Occupancy::Moving)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn count(&self, occupancy: Occupancy) -> usize {
        self.cells.iter().filter(|c| c.occupancy == occupancy).count()
    }

    /// Resolve a 4-cell pattern against `anchor` into linear indices.
    ///
    /// Every resolved index must lie inside the grid and land in the column
    /// `anchor_column + offset.dx`; a linear offset that spills into the
    /// neighbouring row is rejected as a wrap.
    pub fn resolve_pattern(
        &self,
        pattern: &[Offset; 4],
        anchor: usize,
    ) -> Result<[usize; 4], PlacementError> {
        if anchor >= self.len() {
            return Err(PlacementError::OutOfBounds {
                index: anchor as isize,
            });
        }
        let anchor_column = (anchor % self.columns) as isize;
        let mut out = [0usize; 4];
        for (slot, offset) in out.iter_mut().zip(pattern) {
            let index = anchor as isize + offset.linear(self.columns);
            if index < 0 || index >= self.len() as isize {
                return Err(PlacementError::OutOfBounds { index });
            }
            let index = index as usize;
            let expected = anchor_column + offset.dx as isize;
            let actual = index % self.columns;
            if expected != actual as isize {
                return Err(PlacementError::RowWrap {
                    index,
                    expected,
                    actual,
                });
            }
            *slot = index;
        }
        Ok(out)
    }

    /// Validate `pattern` at `anchor` and make it the moving piece.
    ///
    /// Fails if any target is outside the grid, wraps a row, or is Filled.
    /// Target cells that are currently Moving belong to the same piece and
    /// are free to reuse.
    pub fn fill_from_pattern(
        &mut self,
        pattern: &[Offset; 4],
        anchor: usize,
        shape: ShapeKind,
    ) -> Result<[usize; 4], PlacementError> {
        let indices = self.resolve_pattern(pattern, anchor)?;
        if let Some(cell) = indices
            .iter()
            .map(|&i| &self.cells[i])
            .find(|c| self.is_occupied(c.column as i32, c.row as i32))
        {
            return Err(PlacementError::Collision {
                column: cell.column,
                row: cell.row,
            });
        }
        self.clear_moving();
        self.set_moving(&indices, shape);
        Ok(indices)
    }

    /// True if every cell in `row` is Filled.
    pub fn is_row_full(&self, row: usize) -> bool {
        row < self.rows && self.row_slice(row).iter().all(|c| c.occupancy == Occupancy::Filled)
    }

    fn row_slice(&self, row: usize) -> &[Cell] {
        let start = row * self.columns;
        &self.cells[start..start + self.columns]
    }

    /// Copy the contents (not the identity) of row `from` into row `to`.
    pub(crate) fn copy_row(&mut self, from: usize, to: usize) {
        for column in 0..self.columns {
            let src = self.cells[from * self.columns + column];
            let dst = &mut self.cells[to * self.columns + column];
            dst.occupancy = src.occupancy;
            dst.shape = src.shape;
        }
    }

    pub(crate) fn reset_row(&mut self, row: usize) {
        let start = row * self.columns;
        for cell in &mut self.cells[start..start + self.columns] {
            cell.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Orientation;

    #[test]
    fn test_cells_carry_their_position() {
        let grid = Grid::new(10, 16);
        assert_eq!(grid.len(), 160);
        for (i, cell) in grid.cells().iter().enumerate() {
            assert_eq!(cell.row * 10 + cell.column, i);
            assert_eq!(cell.occupancy, Occupancy::Empty);
        }
    }

    #[test]
    fn test_zero_sized_grid_has_one_cell() {
        let grid = Grid::new(0, 0);
        assert_eq!((grid.columns(), grid.rows(), grid.len()), (1, 1, 1));
        assert!(!grid.is_occupied(0, 0));
        let grid = Grid::new(3, 0);
        assert_eq!((grid.columns(), grid.rows()), (3, 1));
        assert_eq!(grid.cells()[2].column, 2);
    }

    #[test]
    fn test_is_occupied_treats_outside_as_wall() {
        let mut grid = Grid::new(10, 16);
        assert!(!grid.is_occupied(0, 0));
        assert!(grid.is_occupied(-1, 0));
        assert!(grid.is_occupied(10, 0));
        assert!(grid.is_occupied(0, 16));
        grid.set_filled(&[12], ShapeKind::Square);
        assert!(grid.is_occupied(2, 1));
        grid.set_moving(&[13], ShapeKind::Square);
        assert!(!grid.is_occupied(3, 1));
    }

    #[test]
    fn test_clear_moving_keeps_filled() {
        let mut grid = Grid::new(10, 16);
        grid.set_filled(&[0, 1], ShapeKind::Line);
        grid.set_moving(&[20, 21], ShapeKind::Square);
        grid.clear_moving();
        assert_eq!(grid.count(Occupancy::Moving), 0);
        assert_eq!(grid.count(Occupancy::Filled), 2);
        assert_eq!(grid.get(0, 2).and_then(|c| c.shape), None);
    }

    #[test]
    fn test_resolve_rejects_row_wrap() {
        let grid = Grid::new(10, 16);
        let pattern = ShapeKind::ZBlock.pattern(Orientation::Vertical);
        // Column 0: the `columns - 1` offset lands on column 9 of the same row.
        let err = grid.resolve_pattern(pattern, 30).unwrap_err();
        assert!(matches!(err, PlacementError::RowWrap { expected: -1, actual: 9, .. }));
        assert!(grid.resolve_pattern(pattern, 31).is_ok());
    }

    #[test]
    fn test_resolve_rejects_out_of_bounds() {
        let grid = Grid::new(10, 16);
        let pattern = ShapeKind::Line.pattern(Orientation::Vertical);
        // Row 14: +2 rows and +3 rows leave the grid.
        let err = grid.resolve_pattern(pattern, 140).unwrap_err();
        assert!(matches!(err, PlacementError::OutOfBounds { index: 160 }));
        // Horizontal line from column 7 would spill into the next row.
        let pattern = ShapeKind::Line.pattern(Orientation::Horizontal);
        assert!(matches!(
            grid.resolve_pattern(pattern, 7),
            Err(PlacementError::RowWrap { .. })
        ));
    }

    #[test]
    fn test_fill_from_pattern_rejects_filled_without_writing() {
        let mut grid = Grid::new(10, 16);
        grid.set_moving(&[50], ShapeKind::Line);
        grid.set_filled(&[11], ShapeKind::Square);
        let before = grid.clone();
        let err = grid
            .fill_from_pattern(ShapeKind::Square.pattern(Orientation::Horizontal), 0, ShapeKind::Square)
            .unwrap_err();
        assert_eq!(err, PlacementError::Collision { column: 1, row: 1 });
        assert_eq!(grid, before);
    }

    #[test]
    fn test_fill_from_pattern_replaces_moving_cells() {
        let mut grid = Grid::new(10, 16);
        let pattern = ShapeKind::Square.pattern(Orientation::Horizontal);
        grid.fill_from_pattern(pattern, 44, ShapeKind::Square).unwrap();
        let indices = grid.fill_from_pattern(pattern, 34, ShapeKind::Square).unwrap();
        assert_eq!(indices, [34, 35, 44, 45]);
        assert_eq!(grid.moving_indices(), vec![34, 35, 44, 45]);
    }
}
