use super::*;

fn curated(question: &str, embedding: Vec<f32>) -> CacheEntry {
    CacheEntry::curated(embedding, question, format!("{question} answer"), "http://a")
}

#[tokio::test]
async fn test_insert_then_query_returns_entry_as_top_match() {
    let index = SemanticIndex::in_memory();
    let entry = curated("what is x?", vec![0.6, 0.8, 0.0]);
    let embedding = entry.embedding.clone();

    index.insert(entry).await.unwrap();

    let results = index.query(&embedding, 1).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].entry.question, "what is x?");
    assert!(results[0].distance.abs() < 1e-6);
}

#[tokio::test]
async fn test_query_orders_by_ascending_distance() {
    let index = SemanticIndex::in_memory();
    index
        .insert(curated("far", vec![0.0, 1.0, 0.0]))
        .await
        .unwrap();
    index
        .insert(curated("near", vec![1.0, 0.1, 0.0]))
        .await
        .unwrap();
    index
        .insert(curated("exact", vec![1.0, 0.0, 0.0]))
        .await
        .unwrap();

    let results = index.query(&[1.0, 0.0, 0.0], 3).await.unwrap();
    let questions: Vec<&str> = results.iter().map(|r| r.entry.question.as_str()).collect();
    assert_eq!(questions, vec!["exact", "near", "far"]);
}

#[tokio::test]
async fn test_query_ties_preserve_insertion_order() {
    let index = SemanticIndex::in_memory();
    // Same direction, different magnitude: identical cosine distance.
    index
        .insert(curated("first", vec![1.0, 1.0, 0.0]))
        .await
        .unwrap();
    index
        .insert(curated("second", vec![2.0, 2.0, 0.0]))
        .await
        .unwrap();

    let results = index.query(&[1.0, 1.0, 0.0], 2).await.unwrap();
    assert_eq!(results[0].entry.question, "first");
    assert_eq!(results[1].entry.question, "second");
}

#[tokio::test]
async fn test_query_truncates_to_k() {
    let index = SemanticIndex::in_memory();
    for i in 0..10 {
        index
            .insert(curated(&format!("q{i}"), vec![1.0, i as f32, 0.0]))
            .await
            .unwrap();
    }

    let results = index.query(&[1.0, 0.0, 0.0], 3).await.unwrap();
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_query_empty_index_returns_empty() {
    let index = SemanticIndex::in_memory();
    let results = index.query(&[1.0, 0.0], 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_insert_dimension_mismatch() {
    let index = SemanticIndex::in_memory();
    index.insert(curated("a", vec![1.0, 0.0, 0.0])).await.unwrap();

    let err = index
        .insert(curated("b", vec![1.0, 0.0]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        IndexError::DimensionMismatch {
            expected: 3,
            actual: 2
        }
    ));
}

#[tokio::test]
async fn test_query_dimension_mismatch() {
    let index = SemanticIndex::in_memory();
    index.insert(curated("a", vec![1.0, 0.0, 0.0])).await.unwrap();

    let err = index.query(&[1.0, 0.0], 1).await.unwrap_err();
    assert!(matches!(err, IndexError::DimensionMismatch { .. }));
}

#[tokio::test]
async fn test_insert_duplicate_id_rejected() {
    let index = SemanticIndex::in_memory();
    let entry = curated("a", vec![1.0, 0.0]);
    let duplicate = entry.clone();

    index.insert(entry).await.unwrap();
    let err = index.insert(duplicate).await.unwrap_err();
    assert!(matches!(err, IndexError::DuplicateId { .. }));
}

#[tokio::test]
async fn test_entry_ids_are_unique() {
    let a = CacheEntry::curated(vec![1.0], "q", "a", "r");
    let b = CacheEntry::curated(vec![1.0], "q", "a", "r");
    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn test_counts_by_provenance() {
    let index = SemanticIndex::in_memory();
    index.insert(curated("a", vec![1.0, 0.0])).await.unwrap();
    index.insert(curated("b", vec![0.0, 1.0])).await.unwrap();
    index
        .insert(CacheEntry::generated(vec![1.0, 1.0], "c", "ans", "ref"))
        .await
        .unwrap();

    let counts = index.counts().await;
    assert_eq!(counts.total, 3);
    assert_eq!(counts.generated, 1);
    assert_eq!(counts.curated(), 2);
}

#[tokio::test]
async fn test_rebuild_keeping_drops_generated() {
    let index = SemanticIndex::in_memory();
    index.insert(curated("a", vec![1.0, 0.0])).await.unwrap();
    index
        .insert(CacheEntry::generated(vec![0.0, 1.0], "b", "ans", "ref"))
        .await
        .unwrap();

    let removed = index
        .rebuild_keeping(|e| !e.provenance.is_generated())
        .await
        .unwrap();

    assert_eq!(removed, 1);
    let counts = index.counts().await;
    assert_eq!(counts.total, 1);
    assert_eq!(counts.generated, 0);
}

#[tokio::test]
async fn test_rebuild_to_empty_resets_dimension() {
    let index = SemanticIndex::in_memory();
    index.insert(curated("a", vec![1.0, 0.0, 0.0])).await.unwrap();

    index.rebuild_keeping(|_| false).await.unwrap();
    assert!(index.is_empty().await);

    // A fresh dimension can now be established.
    index.insert(curated("b", vec![1.0, 0.0])).await.unwrap();
    assert_eq!(index.count().await, 1);
}

#[tokio::test]
async fn test_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");

    let entries = vec![
        curated("a", vec![1.0, 0.0]),
        CacheEntry::generated(vec![0.0, 1.0], "b", "ans", "http://b"),
    ];
    let index = SemanticIndex::build(&path, entries).unwrap();
    index.insert(curated("c", vec![1.0, 1.0])).await.unwrap();

    let reopened = SemanticIndex::open(&path).unwrap();
    let counts = reopened.counts().await;
    assert_eq!(counts.total, 3);
    assert_eq!(counts.generated, 1);

    let results = reopened.query(&[0.0, 1.0], 1).await.unwrap();
    assert_eq!(results[0].entry.question, "b");
}

#[tokio::test]
async fn test_rebuild_persists_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");

    let index = SemanticIndex::build(
        &path,
        vec![
            curated("a", vec![1.0, 0.0]),
            CacheEntry::generated(vec![0.0, 1.0], "b", "ans", "ref"),
        ],
    )
    .unwrap();

    index
        .rebuild_keeping(|e| !e.provenance.is_generated())
        .await
        .unwrap();

    let reopened = SemanticIndex::open(&path).unwrap();
    assert_eq!(reopened.counts().await.total, 1);
}

#[test]
fn test_open_missing_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let err = SemanticIndex::open(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, IndexError::SnapshotNotFound { .. }));
}

#[test]
fn test_open_corrupt_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    std::fs::write(&path, b"not json").unwrap();

    let err = SemanticIndex::open(&path).unwrap_err();
    assert!(matches!(err, IndexError::SnapshotCorrupt { .. }));
}

#[test]
fn test_build_rejects_mixed_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let err = SemanticIndex::build(
        dir.path().join("index.json"),
        vec![curated("a", vec![1.0, 0.0]), curated("b", vec![1.0])],
    )
    .unwrap_err();
    assert!(matches!(err, IndexError::DimensionMismatch { .. }));
}

#[test]
fn test_cosine_distance_identical_vectors() {
    let v = vec![0.3, -0.4, 0.5];
    assert!(cosine_distance(&v, &v).abs() < 1e-6);
}

#[test]
fn test_cosine_distance_orthogonal_vectors() {
    let d = cosine_distance(&[1.0, 0.0], &[0.0, 1.0]);
    assert!((d - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_distance_opposite_vectors() {
    let d = cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]);
    assert!((d - 2.0).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_zero_vector() {
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
}
