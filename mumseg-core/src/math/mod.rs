pub mod heaviside;

pub use heaviside::{heaviside, heaviside_derivative, DerivativeScaling, Heaviside};
