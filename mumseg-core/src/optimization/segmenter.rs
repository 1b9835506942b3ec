use log::info;

use crate::error::SegmentError;
use crate::grid::Field;
use crate::math::Heaviside;
use super::descent::{run_with, Segmentation};
use super::observer::{Observer, Progress};
use super::params::Params;

/// Optimizer parameters bundled for repeated use on several images.
///
/// Parameters are validated once, at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Segmenter {
    params: Params,
    heaviside: Heaviside,
}

impl Segmenter {
    pub fn new(params: Params) -> Result<Segmenter, SegmentError> {
        let heaviside = params.validate()?;
        Ok(Segmenter { params, heaviside })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn heaviside(&self) -> &Heaviside {
        &self.heaviside
    }

    pub fn segment(&self, u: &Field) -> Result<Segmentation, SegmentError> {
        let mut progress = Progress { verbose: self.params.verbose };
        let segmentation = self.segment_observed(u, &mut progress)?;
        if let Some((idx, min)) = segmentation.traces.min_functional() {
            info!(
                "segmented {}x{}: {} foreground, {} frontier cells; min functional {} at iteration {}",
                u.nrows(),
                u.ncols(),
                segmentation.omega.len(),
                segmentation.frontier.len(),
                min,
                idx,
            );
        }
        Ok(segmentation)
    }

    /// Like [`segment`](Segmenter::segment), reporting to `observer` instead of logging.
    pub fn segment_observed<O: Observer>(
        &self,
        u: &Field,
        observer: &mut O,
    ) -> Result<Segmentation, SegmentError> {
        run_with(u, &self.params, &self.heaviside, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::DerivativeScaling;
    use crate::optimization::descent::run;
    use crate::optimization::observer::DivergenceGuard;
    use nalgebra::DMatrix;
    use test_log::test;

    #[test]
    fn rejects_invalid_params() {
        let params = Params { eps: -1., ..Params::default() };
        assert!(matches!(
            Segmenter::new(params),
            Err(SegmentError::InvalidParameter { name: "eps", .. })
        ));
    }

    #[test]
    fn matches_free_run() {
        let params =
            Params { iterations: 3, scaling: DerivativeScaling::Literal, ..Params::default() };
        let segmenter = Segmenter::new(params.clone()).unwrap();
        assert_eq!(segmenter.heaviside().scaling(), DerivativeScaling::Literal);
        let u = DMatrix::from_fn(6, 6, |i, j| if (i + j) % 2 == 0 { 0.3 } else { -0.2 });
        assert_eq!(segmenter.segment(&u).unwrap(), run(&u, &params).unwrap());
    }

    #[test]
    fn reusable_across_images() {
        let segmenter = Segmenter::new(Params { iterations: 2, ..Params::default() }).unwrap();
        assert_eq!(segmenter.heaviside().eps(), 0.5);
        for n in [3, 5, 8] {
            let u = DMatrix::from_fn(n, n, |i, j| {
                (if i < n / 2 { 1. } else { -1. }) + 0.1 * (j as f64)
            });
            let result = segmenter.segment(&u).unwrap();
            assert_eq!(result.traces.len(), 2);
            assert_eq!(result.w.shape(), (n, n));
            let guarded = segmenter.segment_observed(&u, &mut DivergenceGuard).unwrap();
            assert_eq!(guarded, result);
        }
    }
}
