//! Retrieval engine: query embedding in, ranked context fragments out.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::index::{IndexError, Provenance, SemanticIndex};

#[derive(Debug, Error)]
/// Errors returned by context retrieval.
pub enum RetrievalError {
    /// The underlying index failed; distinct from "no knowledge found",
    /// which is an empty (and successful) result.
    #[error("index query failed: {0}")]
    Index(#[from] IndexError),
}

/// One matched entry with its computed relevance, ready for ranking into a
/// synthesis context block or for a direct answer.
#[derive(Debug, Clone, Serialize)]
pub struct ContextFragment {
    pub entry_id: String,
    pub question: String,
    pub answer: String,
    pub reference: String,
    pub relevance: f32,
    pub provenance: Provenance,
}

/// Turns a query embedding into a ranked, threshold-filtered candidate list.
#[derive(Debug, Clone)]
pub struct RetrievalEngine {
    index: Arc<SemanticIndex>,
    top_k: usize,
    min_relevance: f32,
}

impl RetrievalEngine {
    pub fn new(index: Arc<SemanticIndex>, top_k: usize, min_relevance: f32) -> Self {
        Self {
            index,
            top_k,
            min_relevance,
        }
    }

    /// Retrieves the `top_k` nearest entries, computes
    /// `relevance = 1 - distance`, drops generated entries when
    /// `include_generated` is false and drops everything below the relevance
    /// floor. The index returns neighbors by ascending distance and the
    /// filter is order-preserving, so the result is sorted by descending
    /// relevance with ties in the index's native neighbor order.
    ///
    /// Duplicate source URIs across fragments are left intact; deduplication
    /// is the synthesis contract's concern.
    #[instrument(skip(self, query_embedding), fields(top_k = self.top_k, include_generated))]
    pub async fn get_context(
        &self,
        query_embedding: &[f32],
        include_generated: bool,
    ) -> Result<Vec<ContextFragment>, RetrievalError> {
        let neighbors = self.index.query(query_embedding, self.top_k).await?;

        let mut fragments = Vec::with_capacity(neighbors.len());
        for scored in neighbors {
            let relevance = 1.0 - scored.distance;
            let entry = scored.entry;

            if !include_generated && entry.provenance.is_generated() {
                debug!(relevance, question = %entry.question, "Skipped generated entry");
                continue;
            }
            if relevance < self.min_relevance {
                debug!(relevance, question = %entry.question, "Skipped below relevance floor");
                continue;
            }

            debug!(relevance, question = %entry.question, "Added to context");
            fragments.push(ContextFragment {
                entry_id: entry.id,
                question: entry.question,
                answer: entry.answer,
                reference: entry.reference,
                relevance,
                provenance: entry.provenance,
            });
        }

        Ok(fragments)
    }
}
