use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::rag::RagError;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Index or metadata not found at {0}. Run build-index first.")]
    MissingArtifact(PathBuf),

    #[error("Failed to load FAQ artifacts: {0}")]
    Artifacts(#[from] RagError),

    #[error("Index has {index_rows} vectors but metadata has {metadata_rows} records. Rebuild both with build-index.")]
    ArtifactMismatch {
        index_rows: usize,
        metadata_rows: usize,
    },
}
