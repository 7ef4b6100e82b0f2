//! FAQ source records and the position-aligned metadata array.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::RagError;

/// One entry of the FAQ source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

impl FaqRecord {
    /// Text sent to the embedding provider: question and answer separated
    /// by a blank line.
    pub fn embedding_text(&self) -> String {
        format!("{}\n\n{}", self.question, self.answer)
    }
}

/// Metadata for index row `id`. The array position, the `id` and the index
/// row are the same number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub id: usize,
    pub question: String,
    pub answer: String,
}

pub fn metadata_from_faqs(faqs: &[FaqRecord]) -> Vec<MetadataRecord> {
    faqs.iter()
        .enumerate()
        .map(|(id, faq)| MetadataRecord {
            id,
            question: faq.question.clone(),
            answer: faq.answer.clone(),
        })
        .collect()
}

pub fn load_faqs(path: &Path) -> Result<Vec<FaqRecord>, RagError> {
    read_json(path)
}

pub fn load_metadata(path: &Path) -> Result<Vec<MetadataRecord>, RagError> {
    read_json(path)
}

pub fn metadata_to_json(metadata: &[MetadataRecord]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(metadata)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, RagError> {
    let contents = fs::read_to_string(path).map_err(|source| RagError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| RagError::Json {
        path: path.to_path_buf(),
        source,
    })
}
