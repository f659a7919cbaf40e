use std::sync::Arc;

use super::*;
use crate::index::CacheEntry;

async fn seeded_index() -> Arc<SemanticIndex> {
    let index = Arc::new(SemanticIndex::in_memory());
    index
        .insert(CacheEntry::curated(
            vec![1.0, 0.0, 0.0],
            "exact curated",
            "answer a",
            "http://a",
        ))
        .await
        .unwrap();
    index
        .insert(CacheEntry::curated(
            vec![0.9, 0.4359, 0.0],
            "close curated",
            "answer b",
            "http://b",
        ))
        .await
        .unwrap();
    index
        .insert(CacheEntry::generated(
            vec![0.95, 0.3122, 0.0],
            "close generated",
            "answer c",
            "http://c",
        ))
        .await
        .unwrap();
    index
        .insert(CacheEntry::curated(
            vec![0.0, 1.0, 0.0],
            "orthogonal",
            "answer d",
            "http://d",
        ))
        .await
        .unwrap();
    index
}

#[tokio::test]
async fn test_context_ranked_by_descending_relevance() {
    let engine = RetrievalEngine::new(seeded_index().await, 5, 0.5);

    let context = engine.get_context(&[1.0, 0.0, 0.0], true).await.unwrap();

    assert_eq!(context.len(), 3);
    assert_eq!(context[0].question, "exact curated");
    assert!((context[0].relevance - 1.0).abs() < 1e-5);
    for pair in context.windows(2) {
        assert!(pair[0].relevance >= pair[1].relevance);
    }
}

#[tokio::test]
async fn test_relevance_floor_filters() {
    let engine = RetrievalEngine::new(seeded_index().await, 5, 0.99);

    let context = engine.get_context(&[1.0, 0.0, 0.0], true).await.unwrap();

    assert_eq!(context.len(), 1);
    assert_eq!(context[0].question, "exact curated");
}

#[tokio::test]
async fn test_exclude_generated_entries() {
    let engine = RetrievalEngine::new(seeded_index().await, 5, 0.5);

    let context = engine.get_context(&[1.0, 0.0, 0.0], false).await.unwrap();

    assert_eq!(context.len(), 2);
    assert!(context.iter().all(|f| !f.provenance.is_generated()));
}

#[tokio::test]
async fn test_empty_result_is_ok_not_error() {
    let engine = RetrievalEngine::new(Arc::new(SemanticIndex::in_memory()), 5, 0.7);

    let context = engine.get_context(&[1.0, 0.0, 0.0], true).await.unwrap();
    assert!(context.is_empty());
}

#[tokio::test]
async fn test_dimension_mismatch_is_error() {
    let engine = RetrievalEngine::new(seeded_index().await, 5, 0.7);

    let err = engine.get_context(&[1.0, 0.0], true).await.unwrap_err();
    assert!(matches!(err, RetrievalError::Index(_)));
}

#[tokio::test]
async fn test_duplicate_references_not_deduplicated() {
    let index = Arc::new(SemanticIndex::in_memory());
    for question in ["q1", "q2"] {
        index
            .insert(CacheEntry::curated(
                vec![1.0, 0.0],
                question,
                "answer",
                "http://same",
            ))
            .await
            .unwrap();
    }
    let engine = RetrievalEngine::new(index, 5, 0.5);

    let context = engine.get_context(&[1.0, 0.0], true).await.unwrap();
    assert_eq!(context.len(), 2);
    assert_eq!(context[0].reference, context[1].reference);
}
