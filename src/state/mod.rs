//! State management module
//!
//! This module handles all review state, including:
//! - Uploaded files and per-file reports (data.rs)
//! - Ratings and the aggregate ratings table (ratings.rs)
//! - The review pass the UI re-runs on every interaction (session.rs)

pub mod data;
pub mod ratings;
pub mod session;
