use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::chat::{PipelineOptions, QueryPipeline};
use crate::core::config::{api_key_from_env, AppPaths, Settings};
use crate::leads::LeadStore;
use crate::llm::OpenAiProvider;
use crate::rag::metadata::load_metadata;
use crate::rag::{FlatIpIndex, SimilaritySearch};

pub mod error;

use error::InitializationError;

/// Application state shared by every request handler.
///
/// Built once at startup. The index and metadata inside the pipeline are
/// never modified afterwards.
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub pipeline: QueryPipeline,
    pub leads: LeadStore,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(paths: Arc<AppPaths>, settings: Settings, pipeline: QueryPipeline) -> Arc<Self> {
        let leads = LeadStore::new(paths.leads_path.clone());
        Arc::new(AppState {
            paths,
            settings,
            pipeline,
            leads,
            started_at: Utc::now(),
        })
    }

    /// Initializes the application state.
    ///
    /// This process includes:
    /// 1. Loading settings and the provider API key
    /// 2. Reading the index and metadata produced by `build-index`
    /// 3. Wiring the OpenAI provider into the query pipeline
    ///
    /// Any failure here means the service must not start.
    pub fn initialize(paths: AppPaths, settings: Settings) -> Result<Arc<Self>, InitializationError> {
        let api_key = api_key_from_env()?;
        Self::with_api_key(paths, settings, api_key)
    }

    pub fn with_api_key(
        paths: AppPaths,
        settings: Settings,
        api_key: String,
    ) -> Result<Arc<Self>, InitializationError> {
        for path in [&paths.index_path, &paths.metadata_path] {
            if !path.exists() {
                return Err(InitializationError::MissingArtifact(path.clone()));
            }
        }

        let index = FlatIpIndex::read(&paths.index_path).map_err(|e| InitializationError::Artifacts(e.into()))?;
        let metadata = load_metadata(&paths.metadata_path)?;
        if index.len() != metadata.len() {
            return Err(InitializationError::ArtifactMismatch {
                index_rows: index.len(),
                metadata_rows: metadata.len(),
            });
        }

        tracing::info!(
            "Loaded {} FAQ vectors (dim {}) from {}",
            index.len(),
            index.dim(),
            paths.index_path.display()
        );

        let provider = Arc::new(OpenAiProvider::new(&settings.provider, api_key));
        let pipeline = QueryPipeline::new(
            provider.clone(),
            provider,
            Arc::new(index),
            metadata,
            PipelineOptions::from(&settings),
        );

        Ok(Self::new(Arc::new(paths), settings, pipeline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::metadata::{metadata_to_json, MetadataRecord};

    fn write_artifacts(paths: &AppPaths, rows: usize, records: usize) {
        let mut index = FlatIpIndex::new(2).unwrap();
        index.add(&vec![vec![1.0, 0.0]; rows]).unwrap();
        index.write(&paths.index_path).unwrap();

        let metadata: Vec<MetadataRecord> = (0..records)
            .map(|id| MetadataRecord {
                id,
                question: format!("q{}", id),
                answer: format!("a{}", id),
            })
            .collect();
        std::fs::write(&paths.metadata_path, metadata_to_json(&metadata).unwrap()).unwrap();
    }

    #[test]
    fn refuses_to_start_without_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::with_data_dir(tmp.path());

        let result = AppState::with_api_key(paths, Settings::default(), "sk-test".into());
        assert!(matches!(result, Err(InitializationError::MissingArtifact(_))));
    }

    #[test]
    fn refuses_to_start_with_misaligned_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::with_data_dir(tmp.path());
        write_artifacts(&paths, 3, 2);

        let result = AppState::with_api_key(paths, Settings::default(), "sk-test".into());
        assert!(matches!(
            result,
            Err(InitializationError::ArtifactMismatch { index_rows: 3, metadata_rows: 2 })
        ));
    }

    #[test]
    fn loads_aligned_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::with_data_dir(tmp.path());
        write_artifacts(&paths, 3, 3);

        let state = AppState::with_api_key(paths, Settings::default(), "sk-test".into()).unwrap();
        assert_eq!(state.pipeline.faq_count(), 3);
        assert_eq!(state.pipeline.dimension(), 2);
        assert_eq!(state.leads.path(), tmp.path().join("leads.csv"));
    }
}
