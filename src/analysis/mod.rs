//! Luminance analysis
//!
//! - Luminance extraction from decoded arrays (luminance.rs)
//! - The seven-field QC statistics record (stats.rs)
//! - 256-bin luminance histogram (histogram.rs)

use thiserror::Error;

pub mod histogram;
pub mod luminance;
pub mod stats;

pub use histogram::LuminanceHistogram;
pub use luminance::Luminance;
pub use stats::{analyze, QcStats};

/// Faults in an otherwise decoded array. Each one aborts the current pass.
#[derive(Debug, Error, PartialEq)]
pub enum AnalyzeError {
    #[error("cannot compute statistics of an empty image")]
    Empty,
    #[error("color image has {channels} channels, luminance needs at least 3")]
    MissingChannels { channels: usize },
    #[error("histogram range [{lower}, {upper}] is not finite")]
    NonFiniteRange { lower: f64, upper: f64 },
}
