//! Grid primitives: cell coordinates, bounds checks, 4-neighbourhoods, and
//! conversions between nested rows and [`Field`] matrices.

pub mod diff;

pub use diff::{backward_diff, forward_diff, neg_laplacian, neg_second_diff, pad_edge, Axis};

use std::fmt::Display;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::error::SegmentError;

/// Real-valued 2-D grid, indexed `(row, col)`.
pub type Field = DMatrix<f64>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Tsify, Serialize, Deserialize)]
pub struct Pixel {
    pub row: usize,
    pub col: usize,
}

impl Pixel {
    pub fn new(row: usize, col: usize) -> Self {
        Pixel { row, col }
    }

    /// Neighbour one step in `dir`, if it lies on a grid of the given shape.
    pub fn step(&self, dir: Direction, shape: (usize, usize)) -> Option<Pixel> {
        let (dr, dc) = dir.offset();
        let row = self.row as isize + dr;
        let col = self.col as isize + dc;
        in_shape(shape, row, col).then(|| Pixel::new(row as usize, col as usize))
    }

    pub fn idx(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}

impl From<(usize, usize)> for Pixel {
    fn from((row, col): (usize, usize)) -> Self {
        Pixel { row, col }
    }
}

impl Display for Pixel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 4-connected neighbour directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Down,
    Right,
    Up,
    Left,
}

impl Direction {
    /// Enumeration order used by [`neighbors4`] and the frontier test.
    pub const ALL: [Direction; 4] =
        [Direction::Down, Direction::Right, Direction::Up, Direction::Left];

    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::Down => (1, 0),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
        }
    }
}

/// Whether `(row, col)` lies on a `rows x cols` grid.
pub fn in_shape((rows, cols): (usize, usize), row: isize, col: isize) -> bool {
    row >= 0 && col >= 0 && (row as usize) < rows && (col as usize) < cols
}

/// In-grid 4-neighbours of `pixel`, in [`Direction::ALL`] order.
pub fn neighbors4(pixel: Pixel, shape: (usize, usize)) -> Vec<Pixel> {
    Direction::ALL.iter().filter_map(|dir| pixel.step(*dir, shape)).collect()
}

/// Whether any of the four neighbour positions of `pixel` falls off the grid.
pub fn touches_edge(pixel: Pixel, shape: (usize, usize)) -> bool {
    Direction::ALL.iter().any(|dir| pixel.step(*dir, shape).is_none())
}

/// Build a field from nested rows, rejecting empty or ragged input.
pub fn from_rows(rows: &[Vec<f64>]) -> Result<Field, SegmentError> {
    let nrows = rows.len();
    let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
    if nrows == 0 || ncols == 0 {
        return Err(SegmentError::InvalidShape { rows: nrows, cols: ncols });
    }
    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(SegmentError::RaggedRows { row, expected: ncols, found: r.len() });
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(nrows, ncols, &flat))
}

pub fn to_rows(field: &Field) -> Vec<Vec<f64>> {
    field.row_iter().map(|r| r.iter().copied().collect()).collect()
}

/// Reject fields with a zero-length axis.
pub fn check_nonempty(field: &Field) -> Result<(), SegmentError> {
    let (rows, cols) = field.shape();
    if rows == 0 || cols == 0 {
        Err(SegmentError::InvalidShape { rows, cols })
    } else {
        Ok(())
    }
}

pub fn check_same_shape(expected: &Field, found: &Field) -> Result<(), SegmentError> {
    if expected.shape() != found.shape() {
        Err(SegmentError::ShapeMismatch { expected: expected.shape(), found: found.shape() })
    } else {
        Ok(())
    }
}

/// Row-major iterator over every cell of a `rows x cols` grid.
pub fn cells((rows, cols): (usize, usize)) -> impl Iterator<Item = Pixel> {
    itertools::iproduct!(0..rows, 0..cols).map(Pixel::from)
}
