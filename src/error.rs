//! Error taxonomy for truth ingestion, solution loading and scoring
//!
//! Every variant here is fatal: the run stops before any metrics are reported.
//! Skip-and-log conditions (missing companion image, filtered scene) never
//! surface as errors.

use crate::BoxId;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("Data folder does not exist: {0:?}")]
    MissingDataDir(PathBuf),

    #[error("Invalid scene filter '{pattern}': {source}")]
    InvalidSceneFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid category table: {0}")]
    InvalidCategoryTable(String),

    #[error("Error reading meta data from {path:?}: {reason}")]
    Metadata { path: PathBuf, reason: String },

    #[error("Failed while traversing truth directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Malformed TOC line {line_no}: {reason}")]
    MalformedTocLine { line_no: usize, reason: String },

    #[error("Wrong format at line {line_no} : {line}")]
    MalformedSolutionLine { line_no: usize, line: String },

    #[error("Unknown category at line {line_no} : {category}")]
    UnknownCategory { line_no: usize, category: String },

    #[error("No prediction found for: {0}")]
    MissingPrediction(BoxId),

    #[error("Scene '{scene_id}' has no temporal capture {temporal_index}")]
    UnknownCapture { scene_id: String, temporal_index: u32 },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScoringError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScoringError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
