//! Gradients of the Mumford–Shah energy with respect to the reconstruction
//! field `w` and the level-set field `phi`.

use log::trace;

use crate::analysis::Frontier;
use crate::error::SegmentError;
use crate::grid::{
    cells, check_same_shape, neg_laplacian, neg_second_diff, neighbors4, pad_edge, Axis, Field,
};
use crate::math::Heaviside;

/// `λ·S + μ·2·(w − u)`, where `S = 2·(−Δw)` is zeroed on every frontier cell.
pub fn w_gradient(
    w: &Field,
    u: &Field,
    lambda: f64,
    mu: f64,
    frontier: &Frontier,
) -> Result<Field, SegmentError> {
    check_same_shape(u, w)?;
    if frontier.shape() != u.shape() {
        return Err(SegmentError::ShapeMismatch { expected: u.shape(), found: frontier.shape() });
    }
    let data = (w - u) * 2.;
    let mut smooth = neg_laplacian(w) * 2.;
    for pixel in frontier.iter() {
        smooth[pixel.idx()] = 0.;
    }
    Ok(smooth * lambda + data * mu)
}

/// Per-cell boundary length weight: `1 − (Lx² + Ly²)`, where `Lx`, `Ly` are
/// the per-axis negative second differences of the edge-padded `w`.
///
/// The weight for cell `(i, j)` is read at `(i, j)` of the padded grid, i.e.
/// one cell up and to the left of the cell itself.
pub fn boundary_weight(w: &Field) -> Field {
    let padded = pad_edge(w, 1);
    let lx = neg_second_diff(&padded, Axis::Row);
    let ly = neg_second_diff(&padded, Axis::Col);
    let (rows, cols) = w.shape();
    Field::from_fn(rows, cols, |i, j| 1. - (lx[(i, j)].powi(2) + ly[(i, j)].powi(2)))
}

/// Variation of the boundary energy with respect to `phi`:
/// `Σ_e weight[i,j] · H'(phi[i,j]) · (1 − 2·H(phi[e]))` over in-grid 4-neighbours `e`.
///
/// Vanishes wherever `phi` lies outside the Heaviside transition band.
pub fn phi_gradient(phi: &Field, w: &Field, heaviside: &Heaviside) -> Result<Field, SegmentError> {
    check_same_shape(phi, w)?;
    let shape = phi.shape();
    let weight = boundary_weight(w);
    let mut grad = Field::zeros(shape.0, shape.1);
    let mut in_band = 0;
    for pixel in cells(shape) {
        let idx = pixel.idx();
        let d = heaviside.derivative(phi[idx]);
        if heaviside.in_band(phi[idx]) {
            in_band += 1;
        }
        grad[idx] = neighbors4(pixel, shape)
            .into_iter()
            .map(|e| weight[idx] * d * (1. - 2. * heaviside.value(phi[e.idx()])))
            .sum();
    }
    trace!(
        "phi gradient: {} of {} cells in band (eps {})",
        in_band,
        shape.0 * shape.1,
        heaviside.eps()
    );
    Ok(grad)
}
