//! Alternating gradient descent over the reconstruction field `w` and the
//! level-set field `phi`.
//!
//! Each iteration:
//! 1. steps `w` against its gradient (smoothness masked on the frontier),
//! 2. steps `phi` against its gradient, evaluated on the updated `w`,
//! 3. re-derives the foreground and frontier from the new `phi`,
//! 4. records `‖∇phi‖`, `‖∇w‖` and the Mumford–Shah energy.
//!
//! `phi` starts as a copy of the image rather than a signed distance function,
//! and is never re-initialized; flat regions of `phi` can stall the boundary.

use log::debug;
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::analysis::{mumford_shah, Energy, Foreground, Frontier};
use crate::error::SegmentError;
use crate::grid::{check_nonempty, check_same_shape, to_rows, Field, Pixel};
use crate::math::Heaviside;
use super::gradient::{phi_gradient, w_gradient};
use super::observer::{Observer, Progress, Report};
use super::params::{Mode, Params};
use super::trace::Traces;

/// Fields evolved by the descent. `omega` and `frontier` are only ever
/// derived from the current `phi`.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    w: Field,
    phi: Field,
    omega: Foreground,
    frontier: Frontier,
}

/// Gradient norms of one iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepNorms {
    pub grad_w: f64,
    pub grad_phi: f64,
}

impl State {
    pub fn new(u: &Field) -> State {
        let phi = u.clone();
        let omega = Foreground::from_phi(&phi);
        let frontier = Frontier::extract(&omega, &phi);
        State { w: u.clone(), phi, omega, frontier }
    }

    pub fn w(&self) -> &Field {
        &self.w
    }

    pub fn phi(&self) -> &Field {
        &self.phi
    }

    pub fn omega(&self) -> &Foreground {
        &self.omega
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    fn set_phi(&mut self, phi: Field) {
        self.omega = Foreground::from_phi(&phi);
        self.frontier = Frontier::extract(&self.omega, &phi);
        self.phi = phi;
    }

    /// One iteration of [`Mode::Standard`] descent.
    pub fn step(
        &mut self,
        u: &Field,
        params: &Params,
        heaviside: &Heaviside,
    ) -> Result<StepNorms, SegmentError> {
        let grad_w = w_gradient(&self.w, u, params.lambda, params.mu, &self.frontier)?;
        self.w -= &grad_w * params.step_w;

        let grad_phi = phi_gradient(&self.phi, &self.w, heaviside)?;
        let phi = &self.phi - &grad_phi * params.step_phi;
        self.set_phi(phi);

        Ok(StepNorms { grad_w: grad_w.norm(), grad_phi: grad_phi.norm() })
    }

    pub fn into_segmentation(self, traces: Traces) -> Segmentation {
        Segmentation {
            w: self.w,
            phi: self.phi,
            omega: self.omega,
            frontier: self.frontier,
            traces,
        }
    }
}

/// Final fields and traces of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Segmentation {
    pub w: Field,
    pub phi: Field,
    pub omega: Foreground,
    pub frontier: Frontier,
    pub traces: Traces,
}

impl Segmentation {
    /// `phi` thresholded for display: 1 where `phi > 0`, else 0.
    pub fn binarized_phi(&self) -> Field {
        self.phi.map(|v| if v > 0. { 1. } else { 0. })
    }

    /// Energy breakdown of the final state against the input image.
    pub fn energy(&self, u: &Field) -> Result<Energy, SegmentError> {
        check_same_shape(u, &self.w)?;
        Ok(Energy::new(&self.w, u, &self.frontier))
    }
}

/// Serializable form of a [`Segmentation`], with fields as nested rows.
#[derive(Clone, Debug, PartialEq, Tsify, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationOutput {
    pub w: Vec<Vec<f64>>,
    pub phi: Vec<Vec<f64>>,
    pub omega: Vec<Pixel>,
    pub frontier: Vec<Pixel>,
    pub traces: Traces,
}

impl From<&Segmentation> for SegmentationOutput {
    fn from(s: &Segmentation) -> Self {
        SegmentationOutput {
            w: to_rows(&s.w),
            phi: to_rows(&s.phi),
            omega: s.omega.0.clone(),
            frontier: s.frontier.cells().to_vec(),
            traces: s.traces.clone(),
        }
    }
}

/// Run `params.iterations` descent steps from `u`, logging progress.
pub fn run(u: &Field, params: &Params) -> Result<Segmentation, SegmentError> {
    run_observed(u, params, &mut Progress { verbose: params.verbose })
}

/// Like [`run`], reporting each iteration to `observer` instead of logging.
///
/// Non-finite values are not caught here; pass a
/// [`DivergenceGuard`](super::observer::DivergenceGuard) to abort on them.
pub fn run_observed<O: Observer>(
    u: &Field,
    params: &Params,
    observer: &mut O,
) -> Result<Segmentation, SegmentError> {
    check_nonempty(u)?;
    let heaviside = params.validate()?;
    run_with(u, params, &heaviside, observer)
}

/// Descent loop proper, for callers that already hold the [`Heaviside`]
/// model returned by [`Params::validate`].
///
/// `heaviside` is used as given; `params.eps` and `params.scaling` are not
/// consulted again.
pub fn run_with<O: Observer>(
    u: &Field,
    params: &Params,
    heaviside: &Heaviside,
    observer: &mut O,
) -> Result<Segmentation, SegmentError> {
    check_nonempty(u)?;
    let iterations = params.iterations;
    let (rows, cols) = u.shape();
    debug!("segmenting {}x{} image: {:?}", rows, cols, params);

    let mut state = State::new(u);
    let mut traces = Traces::with_capacity(iterations);
    for iteration in 0..iterations {
        let norms = match params.mode {
            Mode::Standard => state.step(u, params, heaviside)?,
        };
        let functional = mumford_shah(&state.w, u, &state.frontier);
        traces.push(norms.grad_phi, norms.grad_w, functional);
        observer.observe(&Report {
            iteration,
            iterations,
            norm_grad_w: norms.grad_w,
            norm_grad_phi: norms.grad_phi,
            functional,
            frontier_len: state.frontier.len(),
        })?;
    }
    debug!("done: {} foreground cells, {} frontier cells", state.omega.len(), state.frontier.len());
    Ok(state.into_segmentation(traces))
}
