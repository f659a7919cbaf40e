use std::io::Write;
use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::embedding::MockEmbeddingClient;
use crate::index::Provenance;

fn write_dataset(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("dataset.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[tokio::test]
async fn test_load_builds_curated_index() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(
        &dir,
        r#"{"question": "what is a widget?", "answer": "a small part", "reference": "http://a"}
{"question": "how do gears mesh?", "answer": "tooth by tooth", "reference": "http://b"}
"#,
    );
    let embedder = Arc::new(MockEmbeddingClient::new(4));

    let (index, report) = load_dataset(&dataset, dir.path().join("index.json"), embedder, 4_000)
        .await
        .unwrap();

    assert_eq!(report, LoadReport { indexed: 2, dropped: 0 });
    let counts = index.counts().await;
    assert_eq!(counts.total, 2);
    assert_eq!(counts.generated, 0);
}

#[tokio::test]
async fn test_load_persists_snapshot() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(
        &dir,
        r#"{"question": "q", "answer": "a", "reference": "r"}"#,
    );
    let snapshot = dir.path().join("index.json");
    let embedder = Arc::new(MockEmbeddingClient::new(4));

    load_dataset(&dataset, &snapshot, embedder, 4_000)
        .await
        .unwrap();

    let reopened = crate::index::SemanticIndex::open(&snapshot).unwrap();
    assert_eq!(reopened.count().await, 1);
}

#[tokio::test]
async fn test_load_drops_malformed_rows() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(
        &dir,
        r#"{"question": "ok", "answer": "fine", "reference": "r"}
not json at all
{"answer": "missing question"}
"#,
    );
    let embedder = Arc::new(MockEmbeddingClient::new(4));

    let (_, report) = load_dataset(&dataset, dir.path().join("index.json"), embedder, 4_000)
        .await
        .unwrap();

    assert_eq!(report, LoadReport { indexed: 1, dropped: 2 });
}

#[tokio::test]
async fn test_load_drops_rows_that_fail_to_embed() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(
        &dir,
        r#"{"question": "q", "answer": "a", "reference": "r"}"#,
    );
    let embedder = Arc::new(MockEmbeddingClient::new(4));
    embedder.set_fail(true);

    let (index, report) = load_dataset(&dataset, dir.path().join("index.json"), embedder, 4_000)
        .await
        .unwrap();

    assert_eq!(report, LoadReport { indexed: 0, dropped: 1 });
    assert!(index.is_empty().await);
}

#[tokio::test]
async fn test_load_skips_blank_lines() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(
        &dir,
        "\n{\"question\": \"q\", \"answer\": \"a\", \"reference\": \"r\"}\n\n",
    );
    let embedder = Arc::new(MockEmbeddingClient::new(4));

    let (_, report) = load_dataset(&dataset, dir.path().join("index.json"), embedder, 4_000)
        .await
        .unwrap();

    assert_eq!(report, LoadReport { indexed: 1, dropped: 0 });
}

#[tokio::test]
async fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let embedder = Arc::new(MockEmbeddingClient::new(4));

    let result = load_dataset(
        dir.path().join("nope.jsonl"),
        dir.path().join("index.json"),
        embedder,
        4_000,
    )
    .await;

    assert!(matches!(result, Err(LoaderError::DatasetIo { .. })));
}

#[tokio::test]
async fn test_load_defaults_missing_reference_to_empty() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(&dir, r#"{"question": "q", "answer": "a"}"#);
    let embedder = Arc::new(MockEmbeddingClient::new(4));

    let (index, _) = load_dataset(&dataset, dir.path().join("index.json"), embedder.clone(), 4_000)
        .await
        .unwrap();

    let vector = embedder.embed("q").await.unwrap();
    let results = index.query(&vector, 1).await.unwrap();
    assert_eq!(results[0].entry.reference, "");
    assert_eq!(results[0].entry.provenance, Provenance::Curated);
}
