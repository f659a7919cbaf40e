//! Bulk dataset loading.
//!
//! Reads a JSON-lines dataset of question/answer/reference rows, embeds each
//! question, and builds a fresh curated index snapshot in one pass. Rows that
//! fail to parse or embed are dropped with a warning rather than aborting the
//! whole load.

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::embedding::EmbeddingClient;
use crate::hashing::normalize_query;
use crate::index::{CacheEntry, IndexError, SemanticIndex};

/// One dataset row. `reference` may be omitted for entries without a source
/// URL.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRow {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub reference: String,
}

/// Outcome of one bulk load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub indexed: usize,
    pub dropped: usize,
}

#[derive(Debug, Error)]
pub enum LoaderError {
    /// The dataset file could not be read at all.
    #[error("failed to read dataset '{path}': {source}")]
    DatasetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Building the index from the embedded rows failed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Reads `dataset_path`, embeds every parseable row, and builds a fresh
/// curated index persisted at `snapshot_path`. Any existing snapshot there is
/// replaced.
#[instrument(skip_all, fields(dataset = %dataset_path.as_ref().display()))]
pub async fn load_dataset<E: EmbeddingClient>(
    dataset_path: impl AsRef<Path>,
    snapshot_path: impl AsRef<Path>,
    embedder: Arc<E>,
    max_input_chars: usize,
) -> Result<(SemanticIndex, LoadReport), LoaderError> {
    let dataset_path = dataset_path.as_ref();
    let raw = tokio::fs::read_to_string(dataset_path)
        .await
        .map_err(|source| LoaderError::DatasetIo {
            path: dataset_path.display().to_string(),
            source,
        })?;

    let mut entries = Vec::new();
    let mut dropped = 0usize;

    for (line_no, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let row: DatasetRow = match serde_json::from_str(line) {
            Ok(row) => row,
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "Dropped unparseable dataset row");
                dropped += 1;
                continue;
            }
        };

        let normalized = normalize_query(&row.question, max_input_chars);
        let embedding = match embedder.embed(&normalized).await {
            Ok(v) => v,
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "Dropped row that failed to embed");
                dropped += 1;
                continue;
            }
        };

        entries.push(CacheEntry::curated(
            embedding,
            row.question,
            row.answer,
            row.reference,
        ));
    }

    let indexed = entries.len();
    let index = SemanticIndex::build(snapshot_path, entries)?;

    info!(indexed, dropped, "Dataset loaded");
    Ok((index, LoadReport { indexed, dropped }))
}
