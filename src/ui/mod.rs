//! Widgets and views
//!
//! - Per-file report sections (report.rs)
//! - Luminance histogram canvas (histogram.rs)

pub mod histogram;
pub mod report;
