//! Query-time retrieval and answer generation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::prompt::{build_messages, format_context};
use crate::core::config::settings::{GenerationSettings, Settings};
use crate::core::errors::ApiError;
use crate::llm::provider::{embed_text, Completion, Embedder};
use crate::llm::types::ChatRequest;
use crate::rag::metadata::MetadataRecord;
use crate::rag::store::SimilaritySearch;
use crate::vector_math::l2_normalize;

/// Substrings of a lowercased reply that mark it as a non-answer.
pub const UNCERTAINTY_PHRASES: [&str; 5] = [
    "i don't",
    "don't have",
    "i do not",
    "not sure",
    "can't find",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub reply: String,
    pub sources: Vec<usize>,
    pub lead_required: bool,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub top_k: usize,
    pub generation: GenerationSettings,
    pub assistant_name: String,
}

impl From<&Settings> for PipelineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            top_k: settings.retrieval.top_k,
            generation: settings.generation.clone(),
            assistant_name: settings.assistant.name.clone(),
        }
    }
}

/// Embed, retrieve, prompt, generate.
///
/// Holds the index and metadata loaded at startup; neither is modified
/// afterwards, so one pipeline is shared by all requests.
pub struct QueryPipeline {
    embedder: Arc<dyn Embedder>,
    completion: Arc<dyn Completion>,
    index: Arc<dyn SimilaritySearch>,
    metadata: Vec<MetadataRecord>,
    options: PipelineOptions,
}

impl QueryPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        completion: Arc<dyn Completion>,
        index: Arc<dyn SimilaritySearch>,
        metadata: Vec<MetadataRecord>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            embedder,
            completion,
            index,
            metadata,
            options,
        }
    }

    pub fn faq_count(&self) -> usize {
        self.metadata.len()
    }

    pub fn dimension(&self) -> usize {
        self.index.dim()
    }

    pub async fn answer(&self, query: &str) -> Result<ChatAnswer, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::BadRequest("Empty message".to_string()));
        }

        let mut vector = embed_text(self.embedder.as_ref(), query).await?;
        l2_normalize(&mut vector);

        let hits = self
            .index
            .search(&vector, self.options.top_k)
            .map_err(ApiError::internal)?;

        // Row i of the index is metadata[i]; nothing here can tell if they drifted.
        let matches = hits
            .iter()
            .map(|hit| {
                self.metadata.get(hit.row).ok_or_else(|| {
                    ApiError::Internal(format!("index row {} has no metadata", hit.row))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let context = format_context(&matches);
        let sources: Vec<usize> = matches.iter().map(|m| m.id).collect();

        let request = ChatRequest::new(build_messages(
            &self.options.assistant_name,
            &context,
            query,
        ))
        .with_generation(&self.options.generation);

        let reply = self.completion.complete(request).await?.trim().to_string();
        let lead_required = needs_lead_capture(&reply);

        tracing::info!(
            query_chars = query.chars().count(),
            ?sources,
            lead_required,
            "Answered chat message"
        );

        Ok(ChatAnswer {
            reply,
            sources,
            lead_required,
        })
    }
}

pub fn needs_lead_capture(reply: &str) -> bool {
    let lowered = reply.to_lowercase();
    UNCERTAINTY_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}
