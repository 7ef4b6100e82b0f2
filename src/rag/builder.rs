//! Offline index construction.
//!
//! Embeds every FAQ record, normalizes the vectors and produces the index
//! together with the metadata array whose position `i` describes row `i`.
//! Both artifacts must always be written as a pair.

use std::fs;
use std::path::Path;

use ndarray::Array2;

use super::error::RagError;
use super::index::FlatIpIndex;
use super::metadata::{metadata_from_faqs, metadata_to_json, FaqRecord, MetadataRecord};
use crate::core::config::AppPaths;
use crate::llm::provider::{embed_text, Embedder};
use crate::vector_math::normalize_rows;

/// Output of a build: the index and its position-aligned metadata.
#[derive(Debug, Clone)]
pub struct IndexArtifacts {
    pub index: FlatIpIndex,
    pub metadata: Vec<MetadataRecord>,
}

pub async fn build(faqs: &[FaqRecord], embedder: &dyn Embedder) -> Result<IndexArtifacts, RagError> {
    if faqs.is_empty() {
        return Err(RagError::EmptyCorpus);
    }

    let mut dim = 0;
    let mut flat: Vec<f32> = Vec::new();
    for (row, faq) in faqs.iter().enumerate() {
        let vector = embed_text(embedder, &faq.embedding_text())
            .await
            .map_err(RagError::Embedding)?;

        if row == 0 {
            dim = vector.len();
            flat.reserve(dim * faqs.len());
        }
        if vector.len() != dim || dim == 0 {
            return Err(RagError::DimensionMismatch {
                row,
                expected: dim,
                found: vector.len(),
            });
        }
        flat.extend_from_slice(&vector);
        tracing::debug!("Embedded FAQ #{} ({} dims)", row, dim);
    }

    let mut matrix = Array2::from_shape_vec((faqs.len(), dim), flat).map_err(|e| RagError::Index(e.into()))?;
    normalize_rows(&mut matrix);

    let index = FlatIpIndex::from_matrix(matrix)?;
    let metadata = metadata_from_faqs(faqs);

    Ok(IndexArtifacts { index, metadata })
}

/// Writes the index and metadata to their well-known paths, replacing any
/// previous pair. Each file is renamed into place from a temporary sibling.
pub fn persist(artifacts: &IndexArtifacts, paths: &AppPaths) -> Result<(), RagError> {
    let metadata_json = metadata_to_json(&artifacts.metadata).map_err(|source| RagError::Json {
        path: paths.metadata_path.clone(),
        source,
    })?;

    write_replacing(&paths.index_path, &artifacts.index.to_bytes())?;
    write_replacing(&paths.metadata_path, &metadata_json)?;

    tracing::info!(
        "Saved index to {}, metadata to {}",
        paths.index_path.display(),
        paths.metadata_path.display()
    );
    Ok(())
}

fn write_replacing(path: &Path, contents: &[u8]) -> Result<(), RagError> {
    let io_err = |source| RagError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}
