use async_trait::async_trait;

use crate::core::errors::ApiError;
use super::types::ChatRequest;

/// Turns text into fixed-dimension vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input, in input order.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError>;
}

/// Chat completion (non-streaming).
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, ApiError>;
}

/// Embeds a single text. Index building and queries both go through here so
/// they hit the provider the same way.
pub async fn embed_text(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>, ApiError> {
    embedder
        .embed(&[text.to_string()])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Upstream("embedding response contained no vectors".to_string()))
}
