use std::path::PathBuf;

use thiserror::Error;

use super::index::IndexError;
use crate::core::errors::ApiError;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("FAQ corpus is empty")]
    EmptyCorpus,
    #[error("embedding for row {row} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("embedding request failed: {0}")]
    Embedding(#[source] ApiError),
    #[error(transparent)]
    Index(#[from] IndexError),
}
