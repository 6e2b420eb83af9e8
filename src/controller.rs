//! Piece controller: the active piece's anchor, shape and orientation.

use crate::grid::{Grid, PlacementError};
use crate::piece::{Orientation, ShapeKind};
use log::debug;

/// Lifecycle of the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceState {
    /// Placed this tick; has not fallen yet.
    Spawned,
    Falling,
    /// Could not fall; its cells are about to become Filled.
    Settled,
}

/// Horizontal move direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Left,
    Right,
}

impl Shift {
    fn delta(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// The piece currently moving on the grid. Its 4 cells are the grid's Moving cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    pub shape: ShapeKind,
    pub orientation: Orientation,
    pub column: i32,
    pub row: i32,
    pub state: PieceState,
    cells: [usize; 4],
}

impl ActivePiece {
    /// Place `shape` at its spawn point and mark its cells Moving.
    pub fn spawn(grid: &mut Grid, shape: ShapeKind) -> Result<Self, PlacementError> {
        let spawn = shape.spawn_point(grid.columns(), grid.rows());
        let cells = place(grid, shape, spawn.orientation, spawn.column, spawn.row)?;
        Ok(Self {
            shape,
            orientation: spawn.orientation,
            column: spawn.column,
            row: spawn.row,
            state: PieceState::Spawned,
            cells,
        })
    }

    /// Indices of the piece's cells.
    pub fn cells(&self) -> [usize; 4] {
        self.cells
    }

    /// Move one row down. On failure the piece is `Settled` and the grid is untouched.
    pub fn fall(&mut self, grid: &mut Grid) -> Result<(), PlacementError> {
        match place(grid, self.shape, self.orientation, self.column, self.row - 1) {
            Ok(cells) => {
                self.row -= 1;
                self.cells = cells;
                self.state = PieceState::Falling;
                Ok(())
            }
            Err(err) => {
                self.state = PieceState::Settled;
                Err(err)
            }
        }
    }

    /// Move one column left or right; rejected moves leave the anchor unchanged.
    pub fn shift(&mut self, grid: &mut Grid, shift: Shift) -> Result<(), PlacementError> {
        let target = self.column + shift.delta();
        let (min, max) = self.shape.column_bounds(self.orientation, grid.columns());
        if target < min || target > max {
            debug!("{:?} at column {} cannot shift {:?}", self.shape, self.column, shift);
            return Err(PlacementError::AnchorOutside {
                column: target,
                row: self.row,
            });
        }
        self.cells = place(grid, self.shape, self.orientation, target, self.row)?;
        self.column = target;
        Ok(())
    }

    /// Flip between horizontal and vertical. Square has nothing to flip.
    pub fn toggle_orientation(&mut self, grid: &mut Grid) -> Result<bool, PlacementError> {
        if !self.shape.has_orientation() {
            return Ok(false);
        }
        let orientation = self.orientation.toggled();
        self.cells = place(grid, self.shape, orientation, self.column, self.row)?;
        self.orientation = orientation;
        Ok(true)
    }
}

/// The one placement path for spawn, fall, shift and toggle.
fn place(
    grid: &mut Grid,
    shape: ShapeKind,
    orientation: Orientation,
    column: i32,
    row: i32,
) -> Result<[usize; 4], PlacementError> {
    let anchor = grid
        .index_of(column, row)
        .ok_or(PlacementError::AnchorOutside { column, row })?;
    grid.fill_from_pattern(shape.pattern(orientation), anchor, shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Occupancy;

    fn moving_columns(grid: &Grid, row: usize) -> Vec<usize> {
        (0..grid.columns())
            .filter(|&c| grid.get(c, row).unwrap().occupancy == Occupancy::Moving)
            .collect()
    }

    #[test]
    fn test_line_spawns_horizontal_at_top() {
        let mut grid = Grid::new(10, 16);
        let piece = ActivePiece::spawn(&mut grid, ShapeKind::Line).unwrap();
        assert_eq!(piece.state, PieceState::Spawned);
        assert_eq!(piece.orientation, Orientation::Horizontal);
        assert_eq!(moving_columns(&grid, 15), vec![3, 4, 5, 6]);
        assert_eq!(grid.count(Occupancy::Moving), 4);
    }

    #[test]
    fn test_fall_into_empty_row() {
        let mut grid = Grid::new(10, 16);
        let mut piece = ActivePiece::spawn(&mut grid, ShapeKind::ZBlock).unwrap();
        piece.fall(&mut grid).unwrap();
        assert_eq!((piece.column, piece.row), (4, 13));
        assert_eq!(piece.shape, ShapeKind::ZBlock);
        assert_eq!(piece.orientation, Orientation::Horizontal);
        assert_eq!(piece.state, PieceState::Falling);
        assert_eq!(moving_columns(&grid, 13), vec![4, 5]);
        assert_eq!(moving_columns(&grid, 14), vec![5, 6]);
        assert_eq!(moving_columns(&grid, 15), Vec::<usize>::new());
    }

    #[test]
    fn test_fall_blocked_by_filled_settles() {
        let mut grid = Grid::new(10, 16);
        let mut piece = ActivePiece::spawn(&mut grid, ShapeKind::Square).unwrap();
        let below = grid.index_of(5, 13).unwrap();
        grid.set_filled(&[below], ShapeKind::Line);
        let before = grid.clone();
        assert!(matches!(
            piece.fall(&mut grid),
            Err(PlacementError::Collision { column: 5, row: 13 })
        ));
        assert_eq!(piece.state, PieceState::Settled);
        assert_eq!(piece.row, 14);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_fall_off_bottom_settles() {
        let mut grid = Grid::new(10, 4);
        let mut piece = ActivePiece::spawn(&mut grid, ShapeKind::Line).unwrap();
        for _ in 0..3 {
            piece.fall(&mut grid).unwrap();
        }
        assert_eq!(piece.row, 0);
        assert!(piece.fall(&mut grid).is_err());
        assert_eq!(piece.state, PieceState::Settled);
        assert_eq!(moving_columns(&grid, 0), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_shift_respects_column_bounds() {
        let mut grid = Grid::new(10, 16);
        let mut piece = ActivePiece::spawn(&mut grid, ShapeKind::Square).unwrap();
        for _ in 0..10 {
            let _ = piece.shift(&mut grid, Shift::Right);
        }
        assert_eq!(piece.column, 8);
        assert!(piece.shift(&mut grid, Shift::Right).is_err());
        assert_eq!(piece.column, 8);
        assert_eq!(moving_columns(&grid, 14), vec![8, 9]);
        for _ in 0..10 {
            let _ = piece.shift(&mut grid, Shift::Left);
        }
        assert_eq!(piece.column, 0);
    }

    #[test]
    fn test_shift_blocked_by_filled_cell() {
        let mut grid = Grid::new(10, 16);
        let mut piece = ActivePiece::spawn(&mut grid, ShapeKind::Line).unwrap();
        let wall = grid.index_of(7, 15).unwrap();
        grid.set_filled(&[wall], ShapeKind::Square);
        assert!(matches!(
            piece.shift(&mut grid, Shift::Right),
            Err(PlacementError::Collision { column: 7, row: 15 })
        ));
        assert_eq!(piece.column, 3);
        assert_eq!(moving_columns(&grid, 15), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_zblock_vertical_cannot_reach_column_zero() {
        let mut grid = Grid::new(10, 16);
        let mut piece = ActivePiece::spawn(&mut grid, ShapeKind::ZBlock).unwrap();
        piece.fall(&mut grid).unwrap();
        assert!(piece.toggle_orientation(&mut grid).unwrap());
        assert_eq!(piece.orientation, Orientation::Vertical);
        for _ in 0..10 {
            let _ = piece.shift(&mut grid, Shift::Left);
        }
        assert_eq!(piece.column, 1);
        assert_eq!(grid.count(Occupancy::Moving), 4);
    }

    #[test]
    fn test_toggle_rejected_near_top() {
        let mut grid = Grid::new(10, 16);
        let mut piece = ActivePiece::spawn(&mut grid, ShapeKind::Line).unwrap();
        // A vertical line at row 15 would need rows 16..18.
        assert!(piece.toggle_orientation(&mut grid).is_err());
        assert_eq!(piece.orientation, Orientation::Horizontal);
        assert_eq!(moving_columns(&grid, 15), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_square_ignores_toggle() {
        let mut grid = Grid::new(10, 16);
        let mut piece = ActivePiece::spawn(&mut grid, ShapeKind::Square).unwrap();
        assert_eq!(piece.toggle_orientation(&mut grid), Ok(false));
        assert_eq!(piece.orientation, Orientation::Horizontal);
    }
}
