//! Parallel λ sweeps: one independent segmentation per smoothness weight.

use std::time::Instant;

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use mumseg_core::{Field, Params, SegmentError, Segmenter};

/// Summary of one run in a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResult {
    pub lambda: f64,
    pub final_functional: Option<f64>,
    pub min_functional: Option<f64>,
    pub min_iteration: Option<usize>,
    pub foreground_len: usize,
    pub frontier_len: usize,
    /// First iteration with a non-finite trace value, if any
    pub diverged_at: Option<usize>,
    pub time_ms: u64,
}

fn sweep_one(u: &Field, base: &Params, lambda: f64) -> Result<SweepResult, SegmentError> {
    let start = Instant::now();
    let segmenter = Segmenter::new(Params { lambda, ..base.clone() })?;
    let seg = segmenter.segment(u)?;
    let min = seg.traces.min_functional();
    Ok(SweepResult {
        lambda,
        final_functional: seg.traces.functional.last().copied(),
        min_functional: min.map(|(_, v)| v),
        min_iteration: min.map(|(idx, _)| idx),
        foreground_len: seg.omega.len(),
        frontier_len: seg.frontier.len(),
        diverged_at: seg.traces.first_non_finite(),
        time_ms: start.elapsed().as_millis() as u64,
    })
}

/// Run every λ in parallel. Results keep the order of `lambdas`.
pub fn sweep(u: &Field, base: &Params, lambdas: &[f64]) -> Vec<Result<SweepResult, SegmentError>> {
    info!("sweeping {} lambda values over a {:?} image", lambdas.len(), u.shape());
    lambdas.par_iter().map(|&lambda| sweep_one(u, base, lambda)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{noisy_disk, DiskConfig};
    use test_log::test;

    #[test]
    fn ordered_results() {
        let config = DiskConfig { rows: 12, cols: 12, noise: 0.05, ..DiskConfig::default() };
        let u = noisy_disk(&config);
        let base = Params { iterations: 3, ..Params::default() };
        let lambdas = [0., 0.5, 1., 2.];
        let results = sweep(&u, &base, &lambdas);
        assert_eq!(results.len(), 4);
        for (result, lambda) in results.iter().zip(lambdas) {
            let result = result.as_ref().unwrap();
            assert_eq!(result.lambda, lambda);
            assert!(result.final_functional.is_some());
            assert_eq!(result.diverged_at, None);
        }
    }

    #[test]
    fn invalid_params_per_run() {
        let u = noisy_disk(&DiskConfig { rows: 4, cols: 4, ..DiskConfig::default() });
        let results = sweep(&u, &Params { lambda: 1., ..Params::default() }, &[1., f64::NAN]);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SegmentError::InvalidParameter { name: "lambda", .. })));
    }
}
