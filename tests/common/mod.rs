#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use faqbot_backend::chat::{PipelineOptions, QueryPipeline};
use faqbot_backend::core::config::{AppPaths, Settings};
use faqbot_backend::core::errors::ApiError;
use faqbot_backend::llm::{ChatRequest, Completion, Embedder};
use faqbot_backend::rag::builder;
use faqbot_backend::rag::metadata::load_metadata;
use faqbot_backend::rag::{FaqRecord, FlatIpIndex};
use faqbot_backend::state::AppState;

pub const DIM: usize = 64;

/// Bag-of-words embedder: every lowercased word is hashed (FNV-1a) into one
/// of `DIM` buckets. Deterministic and deliberately unnormalized.
#[derive(Default)]
pub struct HashEmbedder {
    pub calls: AtomicUsize,
}

impl HashEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; DIM];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hash: u64 = 0xcbf29ce484222325;
            for byte in word.to_lowercase().bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(0x100000001b3);
            }
            v[(hash % DIM as u64) as usize] += 1.0;
        }
        v
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(inputs.iter().map(|text| Self::vector(text)).collect())
    }
}

/// Replies with the first context entry, or with a fixed reply if one is set.
#[derive(Default)]
pub struct EchoCompletion {
    pub fixed: Option<String>,
    pub calls: AtomicUsize,
}

impl EchoCompletion {
    pub fn fixed(reply: &str) -> Self {
        Self {
            fixed: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Completion for EchoCompletion {
    async fn complete(&self, request: ChatRequest) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reply) = &self.fixed {
            return Ok(reply.clone());
        }
        let user = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let first_entry = user
            .strip_prefix("CONTEXT:\n")
            .and_then(|rest| rest.lines().next())
            .unwrap_or_default();
        Ok(format!("From the FAQ: {}", first_entry))
    }
}

pub fn sample_faqs() -> Vec<FaqRecord> {
    [
        ("What are your opening hours?", "We are open Monday to Friday from nine until five."),
        ("Do you ship internationally?", "Yes, parcels ship worldwide via courier."),
        ("How can I reset my password?", "Click the forgot password link on the login page."),
        ("What is your refund policy?", "Refunds are issued within thirty days of purchase."),
        ("Where is your office located?", "Our office is downtown near the central station."),
        ("Which payment methods do you accept?", "We accept credit cards and bank transfer."),
    ]
    .into_iter()
    .map(|(question, answer)| FaqRecord {
        question: question.to_string(),
        answer: answer.to_string(),
    })
    .collect()
}

pub struct Harness {
    pub state: Arc<AppState>,
    pub embedder: Arc<HashEmbedder>,
    pub completion: Arc<EchoCompletion>,
    pub paths: AppPaths,
}

/// Builds and persists artifacts for `faqs` under `dir`, then loads them back
/// the way the service does at startup.
pub async fn harness(dir: &Path, faqs: &[FaqRecord], completion: EchoCompletion) -> Harness {
    let paths = AppPaths::with_data_dir(dir);
    let artifacts = builder::build(faqs, &HashEmbedder::default()).await.unwrap();
    builder::persist(&artifacts, &paths).unwrap();

    let index = FlatIpIndex::read(&paths.index_path).unwrap();
    let metadata = load_metadata(&paths.metadata_path).unwrap();

    let settings = Settings::default();
    let embedder = Arc::new(HashEmbedder::default());
    let completion = Arc::new(completion);
    let pipeline = QueryPipeline::new(
        embedder.clone(),
        completion.clone(),
        Arc::new(index),
        metadata,
        PipelineOptions::from(&settings),
    );
    let state = AppState::new(Arc::new(paths.clone()), settings, pipeline);

    Harness {
        state,
        embedder,
        completion,
        paths,
    }
}
