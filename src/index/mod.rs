//! In-process semantic index with snapshot persistence.
//!
//! The index owns the full collection of [`CacheEntry`] values behind a
//! single read-write lock. Mutations (`insert`, `rebuild_keeping`) take the
//! write half, queries take the read half, so an insert that has returned is
//! observable by every subsequent query and readers never see a
//! partially-rebuilt index.

pub mod error;
pub mod model;

mod store;

#[cfg(test)]
mod tests;

pub use error::{IndexError, IndexResult};
pub use model::{CacheEntry, Provenance, ScoredEntry, cosine_distance, cosine_similarity};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use store::Snapshot;

#[derive(Debug)]
struct IndexState {
    /// Fixed at first insert; `None` while the index is empty.
    dimension: Option<usize>,
    entries: Vec<CacheEntry>,
}

impl IndexState {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            dimension: self.dimension,
            entries: self.entries.clone(),
        }
    }
}

/// Entry counts by provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexCounts {
    pub total: usize,
    pub generated: usize,
}

impl IndexCounts {
    pub fn curated(&self) -> usize {
        self.total - self.generated
    }
}

/// Persistent store of `(vector, text, metadata)` entries with
/// nearest-neighbor query under cosine distance.
#[derive(Debug)]
pub struct SemanticIndex {
    state: RwLock<IndexState>,
    snapshot_path: Option<PathBuf>,
}

impl SemanticIndex {
    /// Creates an empty index with no on-disk snapshot. Used in tests and by
    /// callers that manage persistence themselves.
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(IndexState {
                dimension: None,
                entries: Vec::new(),
            }),
            snapshot_path: None,
        }
    }

    /// Opens an index from an existing snapshot. A missing or corrupt
    /// snapshot is an error; at startup the caller treats it as fatal.
    pub fn open(path: impl AsRef<Path>) -> IndexResult<Self> {
        let path = path.as_ref();
        let snapshot = store::read_snapshot(path)?;

        debug!(
            path = %path.display(),
            entries = snapshot.entries.len(),
            "Index snapshot loaded"
        );

        Ok(Self {
            state: RwLock::new(IndexState {
                dimension: snapshot.dimension,
                entries: snapshot.entries,
            }),
            snapshot_path: Some(path.to_path_buf()),
        })
    }

    /// Builds a fresh index from `entries` and writes its snapshot once.
    /// Entry dimensions and ids are validated as a unit before anything is
    /// persisted.
    pub fn build(path: impl AsRef<Path>, entries: Vec<CacheEntry>) -> IndexResult<Self> {
        let path = path.as_ref();

        let mut dimension = None;
        let mut seen_ids = HashSet::new();
        for entry in &entries {
            match dimension {
                None => dimension = Some(entry.embedding.len()),
                Some(expected) if expected != entry.embedding.len() => {
                    return Err(IndexError::DimensionMismatch {
                        expected,
                        actual: entry.embedding.len(),
                    });
                }
                Some(_) => {}
            }
            if !seen_ids.insert(entry.id.as_str()) {
                return Err(IndexError::DuplicateId {
                    id: entry.id.clone(),
                });
            }
        }

        let state = IndexState { dimension, entries };
        store::write_snapshot(path, &state.snapshot())?;

        Ok(Self {
            state: RwLock::new(state),
            snapshot_path: Some(path.to_path_buf()),
        })
    }

    /// Inserts one fully-populated entry and persists the snapshot before
    /// returning. The entry's dimension must match the index-wide dimension
    /// (fixed here on first insert) and its id must be unused.
    #[instrument(skip(self, entry), fields(id = %entry.id, provenance = entry.provenance.as_str()))]
    pub async fn insert(&self, entry: CacheEntry) -> IndexResult<String> {
        let mut state = self.state.write().await;

        if let Some(expected) = state.dimension {
            if entry.embedding.len() != expected {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: entry.embedding.len(),
                });
            }
        }

        if state.entries.iter().any(|e| e.id == entry.id) {
            return Err(IndexError::DuplicateId { id: entry.id });
        }

        let id = entry.id.clone();
        let dimension = entry.embedding.len();
        state.dimension.get_or_insert(dimension);
        state.entries.push(entry);

        if let Some(path) = &self.snapshot_path {
            if let Err(e) = store::write_snapshot(path, &state.snapshot()) {
                // Roll back so the in-memory index never outruns the snapshot.
                state.entries.pop();
                if state.entries.is_empty() {
                    state.dimension = None;
                }
                return Err(e);
            }
        }

        debug!(total = state.entries.len(), "Entry inserted");
        Ok(id)
    }

    /// Returns the `k` nearest entries ordered by ascending cosine distance.
    /// Ties keep insertion order (the sort is stable). An empty index yields
    /// an empty list, not an error.
    pub async fn query(&self, vector: &[f32], k: usize) -> IndexResult<Vec<ScoredEntry>> {
        let state = self.state.read().await;

        if let Some(expected) = state.dimension {
            if vector.len() != expected {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
        }

        let mut scored: Vec<ScoredEntry> = state
            .entries
            .iter()
            .map(|entry| ScoredEntry {
                distance: cosine_distance(vector, &entry.embedding),
                entry: entry.clone(),
            })
            .collect();

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(k);

        Ok(scored)
    }

    pub async fn count(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// Entry counts by provenance, taken under one read lock.
    pub async fn counts(&self) -> IndexCounts {
        let state = self.state.read().await;
        let generated = state
            .entries
            .iter()
            .filter(|e| e.provenance.is_generated())
            .count();
        IndexCounts {
            total: state.entries.len(),
            generated,
        }
    }

    /// Constructs a fresh index containing only entries satisfying
    /// `predicate`, persists it, then swaps it in. Returns the number of
    /// entries dropped. Readers block on the write lock for the duration, so
    /// no reader ever observes the rebuild in progress.
    #[instrument(skip(self, predicate))]
    pub async fn rebuild_keeping<P>(&self, predicate: P) -> IndexResult<usize>
    where
        P: Fn(&CacheEntry) -> bool,
    {
        let mut state = self.state.write().await;

        let kept: Vec<CacheEntry> = state
            .entries
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect();
        let removed = state.entries.len() - kept.len();

        let rebuilt = IndexState {
            dimension: if kept.is_empty() {
                None
            } else {
                state.dimension
            },
            entries: kept,
        };

        if let Some(path) = &self.snapshot_path {
            store::write_snapshot(path, &rebuilt.snapshot())?;
        }

        *state = rebuilt;

        debug!(removed, remaining = state.entries.len(), "Index rebuilt");
        Ok(removed)
    }
}
