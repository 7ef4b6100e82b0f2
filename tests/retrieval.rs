mod common;

use std::sync::atomic::Ordering;

use common::{sample_faqs, HashEmbedder};
use faqbot_backend::core::config::AppPaths;
use faqbot_backend::rag::builder;
use faqbot_backend::rag::metadata::load_metadata;
use faqbot_backend::rag::{FlatIpIndex, SimilaritySearch};
use faqbot_backend::vector_math::{l2_norm, l2_normalize};

#[tokio::test]
async fn built_index_is_aligned_and_normalized() {
    let tmp = tempfile::tempdir().unwrap();
    let paths = AppPaths::with_data_dir(tmp.path());
    let faqs = sample_faqs();
    let embedder = HashEmbedder::default();

    let artifacts = builder::build(&faqs, &embedder).await.unwrap();
    builder::persist(&artifacts, &paths).unwrap();
    assert_eq!(embedder.calls.load(Ordering::SeqCst), faqs.len());

    let index = FlatIpIndex::read(&paths.index_path).unwrap();
    let metadata = load_metadata(&paths.metadata_path).unwrap();

    assert_eq!(index.len(), faqs.len());
    assert_eq!(metadata.len(), faqs.len());
    for (i, (record, faq)) in metadata.iter().zip(&faqs).enumerate() {
        assert_eq!(record.id, i);
        assert_eq!(record.question, faq.question);
        assert_eq!(record.answer, faq.answer);
    }
    for row in index.rows() {
        assert!((l2_norm(row) - 1.0).abs() < 1e-5);
    }
}

#[tokio::test]
async fn every_question_retrieves_its_own_entry() {
    let faqs = sample_faqs();
    let artifacts = builder::build(&faqs, &HashEmbedder::default()).await.unwrap();

    for (i, faq) in faqs.iter().enumerate() {
        let mut query = HashEmbedder::vector(&faq.question);
        l2_normalize(&mut query);

        let hits = artifacts.index.search(&query, 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert!(
            hits.iter().any(|hit| hit.row == i),
            "question {} not in top 3: {:?}",
            i,
            hits
        );
        assert_eq!(artifacts.metadata[hits[0].row].id, hits[0].row);
    }
}

#[tokio::test]
async fn stored_row_is_its_own_nearest_neighbour() {
    let faqs = sample_faqs();
    let artifacts = builder::build(&faqs, &HashEmbedder::default()).await.unwrap();

    for (i, row) in artifacts.index.rows().enumerate() {
        let query: Vec<f32> = row.to_vec();
        let hits = artifacts.index.search(&query, 1).unwrap();
        assert_eq!(hits[0].row, i);
        assert!((hits[0].score - 1.0).abs() < 1e-5);
    }
}
