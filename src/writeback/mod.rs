//! Write-back cache manager.
//!
//! Persists synthesized answers into the semantic index so future similar
//! queries become direct hits, and serializes the synthesize-and-insert
//! section per query fingerprint so concurrent identical questions produce
//! exactly one generated entry.


use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument, warn};

use crate::index::{CacheEntry, IndexResult, SemanticIndex};
use crate::synthesis::SynthesisOutput;

pub struct WritebackManager {
    index: Arc<SemanticIndex>,
    locks: parking_lot::Mutex<HashMap<u64, Arc<Mutex<()>>>>,
}

impl WritebackManager {
    pub fn new(index: Arc<SemanticIndex>) -> Self {
        Self {
            index,
            locks: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    /// Acquires the lock for `fingerprint`. The returned guard must be held
    /// across restricted retrieval, synthesis and the insert; dropping it
    /// releases the fingerprint.
    pub async fn lock_fingerprint(&self, fingerprint: u64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            // Sweep fingerprints nobody holds anymore; the registry stays
            // bounded by the number of in-flight write-backs.
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            Arc::clone(locks.entry(fingerprint).or_default())
        };

        lock.lock_owned().await
    }

    /// Number of registered fingerprints, including idle ones not yet swept.
    pub fn registered_fingerprints(&self) -> usize {
        self.locks.lock().len()
    }

    /// Persists a synthesized answer. The embedding is the one already
    /// computed for retrieval; re-embedding `question` here could silently
    /// diverge from the vector that selected the context.
    #[instrument(skip_all, fields(question_len = question.len()))]
    pub async fn persist(
        &self,
        embedding: Vec<f32>,
        question: &str,
        output: &SynthesisOutput,
    ) -> IndexResult<String> {
        let entry = CacheEntry::generated(
            embedding,
            question,
            output.answer.clone(),
            output.reference.clone(),
        );

        let id = self.index.insert(entry).await?;
        debug!(id = %id, "Synthesized answer written back");
        Ok(id)
    }

    /// Like [`persist`](Self::persist) but demotes failure to a warning:
    /// the user still gets the synthesized answer even when the write-back
    /// cannot be stored.
    pub async fn persist_best_effort(
        &self,
        embedding: Vec<f32>,
        question: &str,
        output: &SynthesisOutput,
    ) -> Option<String> {
        match self.persist(embedding, question, output).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "Write-back failed; answer served without caching");
                None
            }
        }
    }
}

impl std::fmt::Debug for WritebackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WritebackManager")
            .field("registered_fingerprints", &self.registered_fingerprints())
            .finish()
    }
}
