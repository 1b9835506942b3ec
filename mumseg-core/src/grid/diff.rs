//! Periodic finite differences.
//!
//! Neighbour indices wrap modulo the axis length (toroidal topology), so
//! [`forward_diff`] and [`backward_diff`] are negative adjoints of each other:
//! `Σ forward(f)·g = −Σ f·backward(g)`.

use nalgebra::DMatrix;

use super::Field;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Along the row index (vertical).
    Row,
    /// Along the column index (horizontal).
    Col,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Row, Axis::Col];
}

/// `f[i+1] − f[i]`, wrapping at the last index.
pub fn forward_diff(f: &Field, axis: Axis) -> Field {
    let (rows, cols) = f.shape();
    DMatrix::from_fn(rows, cols, |i, j| match axis {
        Axis::Row => f[((i + 1) % rows, j)] - f[(i, j)],
        Axis::Col => f[(i, (j + 1) % cols)] - f[(i, j)],
    })
}

/// `f[i] − f[i−1]`, wrapping at index 0.
pub fn backward_diff(f: &Field, axis: Axis) -> Field {
    let (rows, cols) = f.shape();
    DMatrix::from_fn(rows, cols, |i, j| match axis {
        Axis::Row => f[(i, j)] - f[((i + rows - 1) % rows, j)],
        Axis::Col => f[(i, j)] - f[(i, (j + cols - 1) % cols)],
    })
}

/// Per-axis negative second difference `−backward(forward(f))`, i.e.
/// `2·f[i] − f[i+1] − f[i−1]` with periodic wrap.
pub fn neg_second_diff(f: &Field, axis: Axis) -> Field {
    -backward_diff(&forward_diff(f, axis), axis)
}

/// Discrete negative Laplacian, summed over both axes.
pub fn neg_laplacian(f: &Field) -> Field {
    neg_second_diff(f, Axis::Row) + neg_second_diff(f, Axis::Col)
}

/// Pad by `n` cells on every side, replicating the nearest edge value.
pub fn pad_edge(f: &Field, n: usize) -> Field {
    let (rows, cols) = f.shape();
    DMatrix::from_fn(rows + 2 * n, cols + 2 * n, |i, j| {
        let r = i.saturating_sub(n).min(rows - 1);
        let c = j.saturating_sub(n).min(cols - 1);
        f[(r, c)]
    })
}
