//! Exact inner-product vector index.
//!
//! Vectors are held as rows of a dense ndarray matrix and every search
//! scores all rows. Callers are expected to L2-normalize both stored rows
//! and queries so that the inner product equals cosine similarity.
//!
//! On-disk format (all integers and floats little-endian):
//!
//! ```text
//! b"FAQIDX01" | dim: u32 | rows: u64 | rows * dim f32
//! ```

use std::fs;
use std::path::Path;

use ndarray::{Array2, ArrayView1, Axis};
use thiserror::Error;

use super::store::{SearchHit, SimilaritySearch};

const MAGIC: &[u8; 8] = b"FAQIDX01";
const HEADER_LEN: usize = MAGIC.len() + 4 + 8;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("vector dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("index dimension must be non-zero")]
    ZeroDimension,
    #[error("invalid index file: {0}")]
    InvalidFormat(String),
    #[error("index shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("index I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct FlatIpIndex {
    vectors: Array2<f32>,
}

impl FlatIpIndex {
    pub fn new(dim: usize) -> Result<Self, IndexError> {
        if dim == 0 {
            return Err(IndexError::ZeroDimension);
        }
        Ok(Self {
            vectors: Array2::zeros((0, dim)),
        })
    }

    /// Wraps an already assembled `rows x dim` matrix.
    pub fn from_matrix(vectors: Array2<f32>) -> Result<Self, IndexError> {
        if vectors.ncols() == 0 {
            return Err(IndexError::ZeroDimension);
        }
        Ok(Self { vectors })
    }

    /// Appends rows in order; row `i` of the input becomes row `len() + i`.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<(), IndexError> {
        let dim = self.vectors.ncols();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(IndexError::DimensionMismatch {
                expected: dim,
                found: bad.len(),
            });
        }
        for vector in vectors {
            self.vectors.push_row(ArrayView1::from(vector))?;
        }
        Ok(())
    }

    pub fn row(&self, row: usize) -> Option<ArrayView1<'_, f32>> {
        (row < self.vectors.nrows()).then(|| self.vectors.row(row))
    }

    /// Iterates over stored rows in order.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, f32>> {
        self.vectors.axis_iter(Axis(0))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let dim = self.vectors.ncols() as u32;
        let rows = self.vectors.nrows() as u64;

        let mut bytes = Vec::with_capacity(HEADER_LEN + self.vectors.len() * 4);
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&dim.to_le_bytes());
        bytes.extend_from_slice(&rows.to_le_bytes());
        bytes.extend(self.vectors.iter().flat_map(|f| f.to_le_bytes()));
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IndexError> {
        if bytes.len() < HEADER_LEN || &bytes[..MAGIC.len()] != MAGIC {
            return Err(IndexError::InvalidFormat("missing index header".to_string()));
        }

        let mut dim_bytes = [0u8; 4];
        dim_bytes.copy_from_slice(&bytes[8..12]);
        let mut rows_bytes = [0u8; 8];
        rows_bytes.copy_from_slice(&bytes[12..HEADER_LEN]);

        let dim = u32::from_le_bytes(dim_bytes) as usize;
        let rows = usize::try_from(u64::from_le_bytes(rows_bytes))
            .map_err(|_| IndexError::InvalidFormat("row count overflows".to_string()))?;
        if dim == 0 {
            return Err(IndexError::ZeroDimension);
        }

        let payload = &bytes[HEADER_LEN..];
        let expected = rows
            .checked_mul(dim)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| IndexError::InvalidFormat("index size overflows".to_string()))?;
        if payload.len() != expected {
            return Err(IndexError::InvalidFormat(format!(
                "expected {} payload bytes for {} x {}, found {}",
                expected,
                rows,
                dim,
                payload.len()
            )));
        }

        let data: Vec<f32> = payload
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        let vectors = Array2::from_shape_vec((rows, dim), data)?;
        Ok(Self { vectors })
    }

    pub fn write(&self, path: &Path) -> Result<(), IndexError> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self, IndexError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl SimilaritySearch for FlatIpIndex {
    fn dim(&self) -> usize {
        self.vectors.ncols()
    }

    fn len(&self) -> usize {
        self.vectors.nrows()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, IndexError> {
        if query.len() != self.dim() {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim(),
                found: query.len(),
            });
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let scores = self.vectors.dot(&ArrayView1::from(query));
        let mut hits: Vec<SearchHit> = scores
            .iter()
            .enumerate()
            .map(|(row, &score)| SearchHit { row, score })
            .collect();

        // stable sort keeps the lower row first on equal scores
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> FlatIpIndex {
        let mut index = FlatIpIndex::new(2).unwrap();
        index
            .add(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![0.6, 0.8]])
            .unwrap();
        index
    }

    #[test]
    fn search_orders_by_inner_product() {
        let index = sample_index();
        let hits = index.search(&[1.0, 0.0], 3).unwrap();

        let rows: Vec<usize> = hits.iter().map(|h| h.row).collect();
        assert_eq!(rows, vec![0, 2, 1]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert!((hits[1].score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn k_larger_than_corpus_returns_everything() {
        let index = sample_index();
        assert_eq!(index.search(&[0.0, 1.0], 10).unwrap().len(), 3);
    }

    #[test]
    fn ties_prefer_lower_rows() {
        let mut index = FlatIpIndex::new(2).unwrap();
        index
            .add(&[vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 0.0]])
            .unwrap();
        let hits = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].row, 1);
        assert_eq!(hits[1].row, 2);
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let mut index = sample_index();
        assert!(matches!(
            index.add(&[vec![1.0, 0.0, 0.0]]),
            Err(IndexError::DimensionMismatch { expected: 2, found: 3 })
        ));
        assert!(matches!(
            index.search(&[1.0], 1),
            Err(IndexError::DimensionMismatch { expected: 2, found: 1 })
        ));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn file_round_trip_preserves_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("faq_index.bin");
        let index = sample_index();
        index.write(&path).unwrap();

        let loaded = FlatIpIndex::read(&path).unwrap();
        assert_eq!(loaded.dim(), 2);
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.row(2).unwrap().to_vec(), vec![0.6, 0.8]);
    }

    #[test]
    fn truncated_file_is_rejected() {
        let mut bytes = sample_index().to_bytes();
        bytes.truncate(bytes.len() - 2);
        assert!(matches!(
            FlatIpIndex::from_bytes(&bytes),
            Err(IndexError::InvalidFormat(_))
        ));
        assert!(matches!(
            FlatIpIndex::from_bytes(b"not an index"),
            Err(IndexError::InvalidFormat(_))
        ));
    }
}
