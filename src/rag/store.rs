//! SimilaritySearch trait: the query-time view of a vector index.
//!
//! The service only ever reads the index, so the trait is limited to
//! lookups. `FlatIpIndex` in the `index` module is the production
//! implementation; tests may substitute their own.

use serde::{Deserialize, Serialize};

use super::index::IndexError;

/// One search result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Row position in the index, and therefore in the metadata array.
    pub row: usize,
    /// Inner product with the query (cosine similarity for unit vectors).
    pub score: f32,
}

pub trait SimilaritySearch: Send + Sync {
    /// Dimension every stored vector and every query must have.
    fn dim(&self) -> usize;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns up to `k` rows ordered by descending score.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, IndexError>;
}
