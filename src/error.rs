//! Error kinds surfaced by corpus loading and feature extraction.

use std::io;

use thiserror::Error;

/// Fatal errors of a feature-extraction run.
///
/// Degenerate inputs (empty token streams, constant columns) are not errors;
/// they are resolved where they occur.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
    #[error("record {index}: extractor `{extractor}` failed: {source}")]
    Extraction {
        index: i64,
        extractor: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("worker pool failure: {0}")]
    Worker(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = FeatureError> = std::result::Result<T, E>;
