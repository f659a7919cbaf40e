use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::embedding::EmbeddingClient;
use crate::hashing::{fingerprint_query, normalize_query};
use crate::index::SemanticIndex;
use crate::retrieval::{ContextFragment, RetrievalEngine};
use crate::synthesis::Synthesizer;
use crate::writeback::WritebackManager;

use super::error::EngineError;
use super::types::{AnswerOutcome, Decision, RelevanceThresholds, classify};

/// Orchestrates one request through embed, retrieval, classification and the
/// chosen response path. Holds no per-request state; all requests share the
/// one index behind its lock.
pub struct AnswerEngine<E: EmbeddingClient, S: Synthesizer> {
    index: Arc<SemanticIndex>,
    retrieval: RetrievalEngine,
    embedder: Arc<E>,
    synthesizer: Arc<S>,
    writeback: WritebackManager,
    thresholds: RelevanceThresholds,
    max_input_chars: usize,
}

impl<E: EmbeddingClient, S: Synthesizer> AnswerEngine<E, S> {
    pub fn new(
        index: Arc<SemanticIndex>,
        embedder: Arc<E>,
        synthesizer: Arc<S>,
        thresholds: RelevanceThresholds,
        top_k: usize,
        max_input_chars: usize,
    ) -> Self {
        let retrieval = RetrievalEngine::new(Arc::clone(&index), top_k, thresholds.min_relevance);
        let writeback = WritebackManager::new(Arc::clone(&index));

        Self {
            index,
            retrieval,
            embedder,
            synthesizer,
            writeback,
            thresholds,
            max_input_chars,
        }
    }

    pub fn thresholds(&self) -> RelevanceThresholds {
        self.thresholds
    }

    /// Answers one query end to end.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn answer(&self, query: &str) -> Result<AnswerOutcome, EngineError> {
        if self.index.is_empty().await {
            debug!("Index is empty; miss without collaborator calls");
            return Ok(AnswerOutcome::Miss);
        }

        let normalized = normalize_query(query, self.max_input_chars);
        let embedding = self.embedder.embed(&normalized).await?;

        self.answer_with_embedding(query, &normalized, embedding)
            .await
    }

    /// Answers a query whose embedding is already known. The embedding is
    /// carried through retrieval and write-back; it is never recomputed.
    pub async fn answer_with_embedding(
        &self,
        query: &str,
        normalized: &str,
        embedding: Vec<f32>,
    ) -> Result<AnswerOutcome, EngineError> {
        let mut context = self.retrieval.get_context(&embedding, true).await?;
        let best = context.first().map(|f| f.relevance);

        match (classify(best, &self.thresholds), context.is_empty()) {
            (Decision::Direct, false) => {
                let top = context.swap_remove(0);
                info!(
                    relevance = top.relevance,
                    provenance = top.provenance.as_str(),
                    "Direct hit"
                );
                Ok(direct_outcome(top))
            }
            (Decision::Synthesize, _) => {
                info!(best, "Synthesize band");
                self.synthesize_and_cache(query, normalized, embedding).await
            }
            _ => {
                info!(best, "Miss");
                Ok(AnswerOutcome::Miss)
            }
        }
    }

    /// The SYNTHESIZE path, serialized per query fingerprint so concurrent
    /// identical questions produce at most one generated entry.
    async fn synthesize_and_cache(
        &self,
        query: &str,
        normalized: &str,
        embedding: Vec<f32>,
    ) -> Result<AnswerOutcome, EngineError> {
        let fingerprint = fingerprint_query(normalized);
        let _guard = self.writeback.lock_fingerprint(fingerprint).await;

        // A concurrent holder may have written this answer back while we
        // waited on the lock; reclassify before paying for generation.
        let mut context = self.retrieval.get_context(&embedding, true).await?;
        match (
            classify(context.first().map(|f| f.relevance), &self.thresholds),
            context.is_empty(),
        ) {
            (Decision::Direct, false) => {
                let top = context.swap_remove(0);
                info!(
                    relevance = top.relevance,
                    "Direct hit after write-back lock; skipping synthesis"
                );
                return Ok(direct_outcome(top));
            }
            (Decision::Synthesize, _) => {}
            _ => return Ok(AnswerOutcome::Miss),
        }

        // Curated-only context: a generated answer must never seed another
        // generated answer.
        let curated = self.retrieval.get_context(&embedding, false).await?;
        if curated.is_empty() {
            info!("No curated context in band; degrading to miss");
            return Ok(AnswerOutcome::Miss);
        }

        let output = self.synthesizer.synthesize(query, &curated).await?;

        self.writeback
            .persist_best_effort(embedding, query, &output)
            .await;

        Ok(AnswerOutcome::Synthesized {
            answer: output.answer,
            reference: output.reference,
        })
    }
}

fn direct_outcome(top: ContextFragment) -> AnswerOutcome {
    AnswerOutcome::Direct {
        answer: top.answer,
        reference: top.reference,
        provenance: top.provenance,
        relevance: top.relevance,
    }
}

impl<E: EmbeddingClient, S: Synthesizer> std::fmt::Debug for AnswerEngine<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerEngine")
            .field("thresholds", &self.thresholds)
            .field("writeback", &self.writeback)
            .finish_non_exhaustive()
    }
}
