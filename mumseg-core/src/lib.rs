//! Image segmentation by minimizing a discrete Mumford–Shah functional.
//!
//! A reconstruction field `w` and a level-set field `phi` are updated by
//! alternating gradient descent; the foreground is `phi ≥ 0` and its discrete
//! boundary is the frontier. See [`optimization::descent`] for the loop.

#[cfg_attr(not(test), allow(unused_imports))]
#[macro_use]
extern crate approx;

pub mod analysis;
pub mod error;
pub mod grid;
pub mod math;
pub mod optimization;

pub use analysis::energy;
pub use analysis::frontier;
pub use math::heaviside;
pub use optimization::descent;
pub use optimization::gradient;
pub use optimization::observer;
pub use optimization::params;
pub use optimization::segmenter;
pub use optimization::trace;

// Re-export key types for external use
pub use analysis::{Energy, Foreground, Frontier};
pub use descent::{run, run_observed, run_with, Segmentation, SegmentationOutput, State};
pub use error::SegmentError;
pub use grid::{from_rows, to_rows, Field, Pixel};
pub use math::{DerivativeScaling, Heaviside};
pub use nalgebra::DMatrix;
pub use observer::{Callback, DivergenceGuard, Observer, Progress, Report};
pub use params::{Mode, Params};
pub use segmenter::Segmenter;
pub use trace::Traces;

/// Parse a log level string into LevelFilter.
pub fn parse_log_level(level: Option<&str>) -> log::LevelFilter {
    match level {
        Some("error") => log::LevelFilter::Error,
        Some("warn") => log::LevelFilter::Warn,
        Some("info") | Some("") | None => log::LevelFilter::Info,
        Some("debug") => log::LevelFilter::Debug,
        Some("trace") => log::LevelFilter::Trace,
        Some("off") => log::LevelFilter::Off,
        Some(level) => {
            log::warn!("invalid log level {:?}, using info", level);
            log::LevelFilter::Info
        }
    }
}
