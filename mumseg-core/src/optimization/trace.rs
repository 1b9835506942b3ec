//! Per-iteration traces recorded by a segmentation run.

use serde::{Deserialize, Serialize};
use tsify::Tsify;

/// Gradient norms and Mumford–Shah energy, one entry per iteration.
///
/// Purely observational: the descent never reads these back.
#[derive(Clone, Debug, Default, PartialEq, Tsify, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traces {
    pub norm_grad_phi: Vec<f64>,
    pub norm_grad_w: Vec<f64>,
    pub functional: Vec<f64>,
}

impl Traces {
    pub fn with_capacity(n: usize) -> Self {
        Traces {
            norm_grad_phi: Vec::with_capacity(n),
            norm_grad_w: Vec::with_capacity(n),
            functional: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, norm_grad_phi: f64, norm_grad_w: f64, functional: f64) {
        self.norm_grad_phi.push(norm_grad_phi);
        self.norm_grad_w.push(norm_grad_w);
        self.functional.push(functional);
    }

    pub fn len(&self) -> usize {
        self.functional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functional.is_empty()
    }

    /// Index of the first iteration with a non-finite value in any trace.
    pub fn first_non_finite(&self) -> Option<usize> {
        (0..self.len()).find(|&idx| {
            !(self.norm_grad_phi[idx].is_finite()
                && self.norm_grad_w[idx].is_finite()
                && self.functional[idx].is_finite())
        })
    }

    /// Iteration with the lowest (finite) energy.
    pub fn min_functional(&self) -> Option<(usize, f64)> {
        self.functional
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn push_and_scan() {
        let mut traces = Traces::with_capacity(4);
        assert!(traces.is_empty());
        assert_eq!(traces.min_functional(), None);
        traces.push(1., 2., 10.);
        traces.push(0.5, 1., 7.);
        traces.push(0.7, 1.5, 8.);
        assert_eq!(traces.len(), 3);
        assert_eq!(traces.first_non_finite(), None);
        assert_eq!(traces.min_functional(), Some((1, 7.)));

        traces.push(f64::NAN, 1., 6.);
        traces.push(0.1, 0.1, f64::NEG_INFINITY);
        assert_eq!(traces.first_non_finite(), Some(3));
        assert_eq!(traces.min_functional(), Some((3, 6.)));
    }

    #[test]
    fn json_keys() {
        let mut traces = Traces::default();
        traces.push(1., 2., 3.);
        assert_eq!(
            serde_json::to_string(&traces).unwrap(),
            r#"{"normGradPhi":[1.0],"normGradW":[2.0],"functional":[3.0]}"#,
        );
    }
}
