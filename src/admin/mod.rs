//! Administrative operations over the semantic index.
//!
//! Exposes entry statistics by provenance and a prune that evicts generated
//! entries while preserving the curated knowledge base.


use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::index::{IndexResult, SemanticIndex};

/// Entry counts broken down by provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub curated: usize,
    pub generated: usize,
}

/// Result of a prune request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneOutcome {
    /// Generated entries evicted; curated entries untouched.
    Removed(usize),
    /// Pruning would have emptied the index and was not confirmed.
    Refused { total: usize },
}

pub struct CacheAdmin {
    index: Arc<SemanticIndex>,
}

impl CacheAdmin {
    pub fn new(index: Arc<SemanticIndex>) -> Self {
        Self { index }
    }

    /// Reports current entry counts. Read-only; never mutates the index.
    pub async fn stats(&self) -> CacheStats {
        let counts = self.index.counts().await;
        CacheStats {
            total: counts.total,
            curated: counts.curated(),
            generated: counts.generated,
        }
    }

    /// Evicts every generated entry. When the index holds no curated entries
    /// at all, pruning would leave nothing behind; that is refused unless
    /// `confirm_empty` is set.
    #[instrument(skip(self))]
    pub async fn prune_generated(&self, confirm_empty: bool) -> IndexResult<PruneOutcome> {
        let counts = self.index.counts().await;
        if counts.total > 0 && counts.curated() == 0 && !confirm_empty {
            warn!(
                total = counts.total,
                "Prune refused: nothing curated would remain"
            );
            return Ok(PruneOutcome::Refused {
                total: counts.total,
            });
        }

        let removed = self
            .index
            .rebuild_keeping(|entry| !entry.provenance.is_generated())
            .await?;
        info!(removed, "Generated entries pruned");
        Ok(PruneOutcome::Removed(removed))
    }
}

impl std::fmt::Debug for CacheAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAdmin").finish_non_exhaustive()
    }
}
