pub mod energy;
pub mod frontier;

pub use energy::{data_term, h1, mumford_shah, perimeter, Energy};
pub use frontier::{is_foreground, Foreground, Frontier};
