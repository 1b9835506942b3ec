use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::error::SegmentError;
use crate::math::{DerivativeScaling, Heaviside};

/// Descent strategy. Only plain alternating gradient descent is implemented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Tsify, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Standard,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Standard
    }
}

impl FromStr for Mode {
    type Err = SegmentError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Mode::Standard),
            _ => Err(SegmentError::UnsupportedMode(s.to_string())),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Standard => write!(f, "standard"),
        }
    }
}

/// Parameters of a segmentation run.
#[derive(Clone, Debug, PartialEq, Tsify, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    /// Fixed step applied to the `w` gradient
    #[serde(default = "default_step")]
    pub step_w: f64,
    /// Fixed step applied to the `phi` gradient
    #[serde(default = "default_step")]
    pub step_phi: f64,
    /// Half-width of the Heaviside transition band
    #[serde(default = "default_eps")]
    pub eps: f64,
    /// Weight of the smoothness term in the `w` gradient
    #[serde(default = "default_weight")]
    pub lambda: f64,
    /// Weight of the data-fidelity term in the `w` gradient
    #[serde(default = "default_weight")]
    pub mu: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Log per-iteration norms and energy at `info` level
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub scaling: DerivativeScaling,
}

fn default_step() -> f64 {
    0.1
}

fn default_eps() -> f64 {
    0.5
}

fn default_weight() -> f64 {
    1.
}

fn default_iterations() -> usize {
    10
}

impl Default for Params {
    fn default() -> Self {
        Params {
            step_w: default_step(),
            step_phi: default_step(),
            eps: default_eps(),
            lambda: default_weight(),
            mu: default_weight(),
            iterations: default_iterations(),
            verbose: false,
            mode: Mode::default(),
            scaling: DerivativeScaling::default(),
        }
    }
}

impl Params {
    /// Entry validation, run once before the loop starts.
    pub fn validate(&self) -> Result<Heaviside, SegmentError> {
        for (name, value) in [("step_w", self.step_w), ("step_phi", self.step_phi)] {
            if !value.is_finite() || value <= 0. {
                return Err(SegmentError::InvalidParameter {
                    name,
                    value,
                    reason: "step must be finite and positive",
                });
            }
        }
        for (name, value) in [("lambda", self.lambda), ("mu", self.mu)] {
            if !value.is_finite() {
                return Err(SegmentError::InvalidParameter {
                    name,
                    value,
                    reason: "weight must be finite",
                });
            }
        }
        Heaviside::new(self.eps, self.scaling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn parse_mode() {
        assert_eq!("standard".parse::<Mode>(), Ok(Mode::Standard));
        assert_eq!(
            "momentum".parse::<Mode>(),
            Err(SegmentError::UnsupportedMode("momentum".to_string()))
        );
        assert_eq!(Mode::Standard.to_string(), "standard");
    }

    #[test]
    fn defaults_from_json() {
        let params: Params = serde_json::from_str(r#"{ "stepW": 0.2, "iterations": 3 }"#).unwrap();
        assert_eq!(params, Params { step_w: 0.2, iterations: 3, ..Params::default() });
        let params: Params =
            serde_json::from_str(r#"{ "mode": "standard", "scaling": "literal" }"#).unwrap();
        assert_eq!(params.scaling, DerivativeScaling::Literal);
        assert!(serde_json::from_str::<Params>(r#"{ "mode": "momentum" }"#).is_err());
        assert!(serde_json::from_str::<Params>(r#"{ "iterations": -1 }"#).is_err());
    }

    #[test]
    fn validation() {
        assert!(Params::default().validate().is_ok());
        let invalid = [
            Params { eps: 0., ..Params::default() },
            Params { eps: -0.5, ..Params::default() },
            Params { step_w: 0., ..Params::default() },
            Params { step_phi: f64::NAN, ..Params::default() },
            Params { lambda: f64::INFINITY, ..Params::default() },
        ];
        for params in invalid {
            assert!(
                matches!(params.validate(), Err(SegmentError::InvalidParameter { .. })),
                "{:?}",
                params
            );
        }
        // Negative weights are allowed
        assert!(Params { lambda: -1., mu: 0., ..Params::default() }.validate().is_ok());
    }
}
