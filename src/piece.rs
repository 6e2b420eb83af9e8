//! Piece catalog: shapes, orientation patterns, spawn points.

/// The three shapes the game drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Square,
    Line,
    ZBlock,
}

/// One bit of orientation. Square ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Cell offset from the anchor: `dx` columns right, `dy` rows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub dx: i8,
    pub dy: i8,
}

impl Offset {
    const fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }

    /// Offset in a row-major grid with `columns` cells per row.
    #[inline]
    pub fn linear(self, columns: usize) -> isize {
        self.dy as isize * columns as isize + self.dx as isize
    }
}

const SQUARE: [Offset; 4] = [
    Offset::new(0, 0),
    Offset::new(1, 0),
    Offset::new(0, 1),
    Offset::new(1, 1),
];
const LINE_VERTICAL: [Offset; 4] = [
    Offset::new(0, 0),
    Offset::new(0, 1),
    Offset::new(0, 2),
    Offset::new(0, 3),
];
const LINE_HORIZONTAL: [Offset; 4] = [
    Offset::new(0, 0),
    Offset::new(1, 0),
    Offset::new(2, 0),
    Offset::new(3, 0),
];
const ZBLOCK_VERTICAL: [Offset; 4] = [
    Offset::new(0, 0),
    Offset::new(0, 1),
    Offset::new(-1, 1),
    Offset::new(-1, 2),
];
const ZBLOCK_HORIZONTAL: [Offset; 4] = [
    Offset::new(0, 0),
    Offset::new(1, 0),
    Offset::new(1, 1),
    Offset::new(2, 1),
];

/// Where a new piece appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPoint {
    pub column: i32,
    pub row: i32,
    pub orientation: Orientation,
}

impl ShapeKind {
    pub const ALL: [Self; 3] = [Self::Square, Self::Line, Self::ZBlock];

    /// The 4 cells of this shape in `orientation`, relative to the anchor.
    /// This table is the only shape definition in the game.
    pub fn pattern(self, orientation: Orientation) -> &'static [Offset; 4] {
        match (self, orientation) {
            (Self::Square, _) => &SQUARE,
            (Self::Line, Orientation::Vertical) => &LINE_VERTICAL,
            (Self::Line, Orientation::Horizontal) => &LINE_HORIZONTAL,
            (Self::ZBlock, Orientation::Vertical) => &ZBLOCK_VERTICAL,
            (Self::ZBlock, Orientation::Horizontal) => &ZBLOCK_HORIZONTAL,
        }
    }

    pub fn has_orientation(self) -> bool {
        !matches!(self, Self::Square)
    }

    /// Spawn anchor for a `columns x rows` grid: columns 4 (Square, ZBlock)
    /// and 3 (Line) on a 10-wide grid, near the top, always horizontal.
    pub fn spawn_point(self, columns: usize, rows: usize) -> SpawnPoint {
        let mid = (columns / 2) as i32;
        let top = rows as i32 - 1;
        let (column, row) = match self {
            Self::Square | Self::ZBlock => (mid - 1, top - 1),
            Self::Line => (mid - 2, top),
        };
        SpawnPoint {
            column,
            row,
            orientation: Orientation::Horizontal,
        }
    }

    /// Inclusive range of anchor columns that keep the whole pattern on a
    /// `columns`-wide grid.
    pub fn column_bounds(self, orientation: Orientation, columns: usize) -> (i32, i32) {
        let pattern = self.pattern(orientation);
        let min_dx = pattern.iter().map(|o| o.dx as i32).min().unwrap_or(0);
        let max_dx = pattern.iter().map(|o| o.dx as i32).max().unwrap_or(0);
        (-min_dx, columns as i32 - 1 - max_dx)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Square => "Square",
            Self::Line => "Line",
            Self::ZBlock => "Z-block",
        }
    }
}
