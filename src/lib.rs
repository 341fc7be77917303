//! fMoW Scorer
//!
//! Offline evaluation of bounding-box classification for the Functional Map
//! of the World dataset. Ground truth comes from per-image JSON metadata
//! (or the TOC cache built from it), predictions from a `boxId,category`
//! file, and the score is a category-weighted mean of per-category F-scores.
//!
//! Module layout:
//! - `categories`: Category vocabulary and weights
//! - `ingest/`: Truth discovery (directory scan, metadata parsing, sample cap)
//! - `toc_cache`: Tab-separated cache of the truth index
//! - `solution`: Prediction file loading and validation
//! - `scorer`: Per-category counts and the weighted overall score
//! - `report`: Text rendering of scores and scenes
//! - `capture_view`: One capture prepared for display

pub mod capture_view;
pub mod categories;
pub mod config;
pub mod data;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod scorer;
pub mod solution;
pub mod toc_cache;

#[cfg(test)]
mod test_utils;

/// Numeric box identifier, unique across the whole dataset
pub type BoxId = i64;

// Re-export commonly used types
pub use capture_view::{CaptureView, ViewBox};
pub use categories::CategoryRegistry;
pub use config::{Imagery, RunConfig};
pub use data::{Scene, TruthBox, TruthData};
pub use error::{Result, ScoringError};
pub use metrics::CategoryMetrics;
pub use pipeline::{run, Evaluation, RunOutcome};
pub use scorer::{ScoreOutcome, ScoreReport, ScoringEngine, SkipReason};
pub use solution::{Predictions, SolutionLoader};
