//! Per-iteration observation hooks.
//!
//! Observers see a [`Report`] after every iteration. They cannot touch the
//! fields; returning an error aborts the run and propagates the error to the
//! caller.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::error::SegmentError;

/// Summary of one completed iteration.
#[derive(Clone, Copy, Debug, PartialEq, Tsify, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Zero-based index of the iteration that just finished
    pub iteration: usize,
    pub iterations: usize,
    pub norm_grad_w: f64,
    pub norm_grad_phi: f64,
    pub functional: f64,
    pub frontier_len: usize,
}

impl Report {
    pub fn is_finite(&self) -> bool {
        self.norm_grad_w.is_finite()
            && self.norm_grad_phi.is_finite()
            && self.functional.is_finite()
    }
}

pub trait Observer {
    fn observe(&mut self, report: &Report) -> Result<(), SegmentError>;
}

impl Observer for () {
    fn observe(&mut self, _report: &Report) -> Result<(), SegmentError> {
        Ok(())
    }
}

impl<A: Observer, B: Observer> Observer for (A, B) {
    fn observe(&mut self, report: &Report) -> Result<(), SegmentError> {
        self.0.observe(report)?;
        self.1.observe(report)
    }
}

/// Adapts a closure into an [`Observer`] that never aborts.
pub struct Callback<F>(pub F);

impl<F: FnMut(&Report)> Observer for Callback<F> {
    fn observe(&mut self, report: &Report) -> Result<(), SegmentError> {
        (self.0)(report);
        Ok(())
    }
}

/// Logs progress: norms and energy at `info` when verbose, otherwise at `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Progress {
    pub verbose: bool,
}

impl Observer for Progress {
    fn observe(&mut self, r: &Report) -> Result<(), SegmentError> {
        debug!("iteration {}/{}", r.iteration + 1, r.iterations);
        if self.verbose {
            info!("iteration {}: |grad w| {}", r.iteration, r.norm_grad_w);
            info!("iteration {}: |grad phi| {}", r.iteration, r.norm_grad_phi);
            info!(
                "iteration {}: functional {} ({} frontier cells)",
                r.iteration, r.functional, r.frontier_len
            );
        } else {
            debug!(
                "  |grad w| {}, |grad phi| {}, functional {}",
                r.norm_grad_w, r.norm_grad_phi, r.functional
            );
        }
        Ok(())
    }
}

/// Aborts with [`SegmentError::NumericDivergence`] on the first non-finite trace value.
#[derive(Clone, Copy, Debug, Default)]
pub struct DivergenceGuard;

impl Observer for DivergenceGuard {
    fn observe(&mut self, r: &Report) -> Result<(), SegmentError> {
        if r.is_finite() {
            return Ok(());
        }
        warn!("non-finite trace at iteration {}: {:?}", r.iteration, r);
        Err(SegmentError::NumericDivergence {
            iteration: r.iteration,
            norm_grad_w: r.norm_grad_w,
            norm_grad_phi: r.norm_grad_phi,
            functional: r.functional,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn report(functional: f64) -> Report {
        Report {
            iteration: 3,
            iterations: 10,
            norm_grad_w: 1.,
            norm_grad_phi: 0.5,
            functional,
            frontier_len: 4,
        }
    }

    #[test]
    fn guard() {
        let mut guard = DivergenceGuard;
        assert_eq!(guard.observe(&report(2.)), Ok(()));
        assert!(matches!(
            guard.observe(&report(f64::NAN)),
            Err(SegmentError::NumericDivergence { iteration: 3, .. })
        ));
        assert!(guard.observe(&report(f64::INFINITY)).is_err());
    }

    #[test]
    fn chained() {
        let mut seen = Vec::new();
        {
            let callback = Callback(|r: &Report| seen.push(r.iteration));
            let mut observer = (Progress { verbose: true }, callback);
            observer.observe(&report(1.)).unwrap();
            observer.observe(&report(2.)).unwrap();
        }
        assert_eq!(seen, vec![3, 3]);

        let mut count = 0;
        let mut observer = (DivergenceGuard, Callback(|_: &Report| count += 1));
        assert!(observer.observe(&report(f64::NAN)).is_err());
        assert_eq!(count, 0);
    }
}
