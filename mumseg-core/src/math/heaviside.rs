//! Smoothed Heaviside step `H_eps` and its derivative.
//!
//! `H_eps` is exactly 0 below `-eps`, exactly 1 from `eps` upward, and
//! interpolates smoothly across the band `[-eps, eps]`:
//!
//! ```text
//! H_eps(t) = ½·(1 + t/eps + sin(π·t/eps)/π)
//! ```

use std::fmt::Display;

use num_traits::{Float, FloatConst};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::error::SegmentError;

/// Normalization constant applied to `1 + cos(π·t/eps)` inside the band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Tsify, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivativeScaling {
    /// `1 / (2·eps)`: the analytic derivative of [`heaviside`].
    Normalized,
    /// `eps / 2`: the constant as historically transcribed. Only agrees with
    /// the analytic derivative when `eps == 1`.
    Literal,
}

impl Default for DerivativeScaling {
    fn default() -> Self {
        DerivativeScaling::Normalized
    }
}

impl DerivativeScaling {
    pub fn constant<T: Float>(&self, eps: T) -> T {
        let two = T::one() + T::one();
        match self {
            DerivativeScaling::Normalized => (two * eps).recip(),
            DerivativeScaling::Literal => eps / two,
        }
    }
}

impl Display for DerivativeScaling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DerivativeScaling::Normalized => write!(f, "normalized"),
            DerivativeScaling::Literal => write!(f, "literal"),
        }
    }
}

impl std::str::FromStr for DerivativeScaling {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normalized" => Ok(DerivativeScaling::Normalized),
            "literal" => Ok(DerivativeScaling::Literal),
            _ => Err(format!(
                "unknown derivative scaling {:?} (expected \"normalized\" or \"literal\")",
                s
            )),
        }
    }
}

pub fn heaviside<T: Float + FloatConst>(t: T, eps: T) -> T {
    if t >= eps {
        T::one()
    } else if t < -eps {
        T::zero()
    } else {
        let half = (T::one() + T::one()).recip();
        let x = t / eps;
        half * (T::one() + x + (T::PI() * x).sin() / T::PI())
    }
}

pub fn heaviside_derivative<T: Float + FloatConst>(t: T, eps: T, scaling: DerivativeScaling) -> T {
    if t >= eps || t < -eps {
        T::zero()
    } else {
        scaling.constant(eps) * (T::one() + (T::PI() * t / eps).cos())
    }
}

/// [`heaviside`] and [`heaviside_derivative`] bound to a validated band half-width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heaviside {
    eps: f64,
    scaling: DerivativeScaling,
}

impl Heaviside {
    pub fn new(eps: f64, scaling: DerivativeScaling) -> Result<Heaviside, SegmentError> {
        if !eps.is_finite() || eps <= 0. {
            return Err(SegmentError::InvalidParameter {
                name: "eps",
                value: eps,
                reason: "band half-width must be finite and positive",
            });
        }
        Ok(Heaviside { eps, scaling })
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn scaling(&self) -> DerivativeScaling {
        self.scaling
    }

    #[inline]
    pub fn value(&self, t: f64) -> f64 {
        heaviside(t, self.eps)
    }

    #[inline]
    pub fn derivative(&self, t: f64) -> f64 {
        heaviside_derivative(t, self.eps, self.scaling)
    }

    /// Whether `t` lies inside the transition band, where the derivative may be non-zero.
    pub fn in_band(&self, t: f64) -> bool {
        t >= -self.eps && t < self.eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn samples(eps: f64, n: usize) -> impl Iterator<Item = f64> {
        (0..=n).map(move |k| -2. * eps + 4. * eps * (k as f64) / (n as f64))
    }

    #[test]
    fn boundary_values() {
        for eps in [0.1, 0.5, 1., 3.] {
            assert_eq!(heaviside(eps, eps), 1.);
            assert_eq!(heaviside(-2. * eps, eps), 0.);
            assert_relative_eq!(heaviside(0., eps), 0.5);
            // Continuous at both ends of the band
            assert_abs_diff_eq!(heaviside(eps - 1e-12, eps), 1., epsilon = 1e-9);
            assert_abs_diff_eq!(heaviside(-eps, eps), 0., epsilon = 1e-12);
            assert_abs_diff_eq!(heaviside(-eps + 1e-12, eps), 0., epsilon = 1e-9);
        }
    }

    #[test]
    fn monotone() {
        for eps in [0.1, 0.5, 2.] {
            let values: Vec<f64> = samples(eps, 400).map(|t| heaviside(t, eps)).collect();
            for pair in values.windows(2) {
                assert!(pair[1] >= pair[0] - 1e-15, "not monotone: {:?}", pair);
            }
        }
    }

    #[test]
    fn derivative_vanishes_outside_band() {
        for scaling in [DerivativeScaling::Normalized, DerivativeScaling::Literal] {
            for eps in [0.1, 0.5, 2.] {
                for t in [eps, 1.01 * eps, 5. * eps, -1.01 * eps, -5. * eps] {
                    assert_eq!(heaviside_derivative(t, eps, scaling), 0., "t {} eps {}", t, eps);
                }
                assert!(heaviside_derivative(0., eps, scaling) > 0.);
            }
        }
    }

    fn max_central_diff_error(eps: f64, scaling: DerivativeScaling) -> f64 {
        let h = eps * 1e-6;
        samples(eps, 200)
            .filter(|t| t.abs() < eps - 2. * h)
            .map(|t| {
                let numeric = (heaviside(t + h, eps) - heaviside(t - h, eps)) / (2. * h);
                (numeric - heaviside_derivative(t, eps, scaling)).abs()
            })
            .fold(0., f64::max)
    }

    #[test]
    fn normalized_derivative_matches_numeric() {
        for eps in [0.1, 0.5, 1., 3.] {
            let err = max_central_diff_error(eps, DerivativeScaling::Normalized);
            assert!(err < 1e-5 / eps, "eps {}: max error {}", eps, err);
        }
    }

    #[test]
    fn literal_derivative_diverges_unless_unit_band() {
        assert!(max_central_diff_error(1., DerivativeScaling::Literal) < 1e-5);
        for eps in [0.1, 0.5, 3.] {
            let err = max_central_diff_error(eps, DerivativeScaling::Literal);
            assert!(err > 0.1, "eps {}: max error {}", eps, err);
        }
    }

    #[test]
    fn generic_over_f32() {
        assert_eq!(heaviside(1f32, 0.5), 1.);
        assert_relative_eq!(heaviside(0f32, 0.5), 0.5);
        assert_relative_eq!(heaviside_derivative(0f32, 0.5, DerivativeScaling::Normalized), 2.);
    }

    #[test]
    fn validated_eps() {
        assert!(Heaviside::new(0.5, DerivativeScaling::default()).is_ok());
        for eps in [0., -1., f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Heaviside::new(eps, DerivativeScaling::default()),
                Err(SegmentError::InvalidParameter { name: "eps", .. })
            ));
        }
    }

    #[test]
    fn scaling_names() {
        assert_eq!("literal".parse::<DerivativeScaling>(), Ok(DerivativeScaling::Literal));
        assert_eq!(DerivativeScaling::Normalized.to_string(), "normalized");
        assert!("half".parse::<DerivativeScaling>().is_err());
        assert_eq!(serde_json::to_string(&DerivativeScaling::Literal).unwrap(), "\"literal\"");
    }
}
