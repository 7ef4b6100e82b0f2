//! FAQ retrieval storage.
//!
//! This module provides:
//! - `FlatIpIndex`: exact inner-product vector index with a binary file format
//! - `SimilaritySearch`: the read-only search interface used at query time
//! - `builder`: offline construction of the index and its metadata

pub mod builder;
pub mod error;
pub mod index;
pub mod metadata;
pub mod store;

pub use error::RagError;
pub use index::{FlatIpIndex, IndexError};
pub use metadata::{FaqRecord, MetadataRecord};
pub use store::{SearchHit, SimilaritySearch};
