//! Chat answering: retrieval over the FAQ index and grounded generation.

pub mod pipeline;
pub mod prompt;

pub use pipeline::{ChatAnswer, PipelineOptions, QueryPipeline};
