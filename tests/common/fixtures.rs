//! Shared engine fixtures built on the mock collaborators.

use std::sync::Arc;

use recall::index::CacheEntry;
use recall::{
    AnswerEngine, MockEmbeddingClient, MockSynthesizer, RelevanceThresholds, SemanticIndex,
};

/// Embedding dimension used by every fixture.
pub const DIM: usize = 3;

pub struct EngineFixture {
    pub engine: Arc<AnswerEngine<MockEmbeddingClient, MockSynthesizer>>,
    pub embedder: Arc<MockEmbeddingClient>,
    pub synthesizer: Arc<MockSynthesizer>,
    pub index: Arc<SemanticIndex>,
}

pub fn thresholds() -> RelevanceThresholds {
    RelevanceThresholds::new(0.7, 0.98).unwrap()
}

/// Engine over `index` with a default always-succeeding synthesizer.
pub fn engine(index: Arc<SemanticIndex>) -> EngineFixture {
    engine_with(
        index,
        Arc::new(MockSynthesizer::with_output(
            "synthesized answer",
            "http://synth",
        )),
    )
}

pub fn engine_with(
    index: Arc<SemanticIndex>,
    synthesizer: Arc<MockSynthesizer>,
) -> EngineFixture {
    let embedder = Arc::new(MockEmbeddingClient::new(DIM));

    let engine = Arc::new(AnswerEngine::new(
        Arc::clone(&index),
        Arc::clone(&embedder),
        Arc::clone(&synthesizer),
        thresholds(),
        5,
        4_000,
    ));

    EngineFixture {
        engine,
        embedder,
        synthesizer,
        index,
    }
}

/// Index holding one curated entry embedded at `[1, 0, 0]`.
pub async fn seeded_index() -> Arc<SemanticIndex> {
    let index = Arc::new(SemanticIndex::in_memory());
    index
        .insert(CacheEntry::curated(
            vec![1.0, 0.0, 0.0],
            "what is a widget?",
            "a small part",
            "http://docs/widget",
        ))
        .await
        .unwrap();
    index
}

/// A vector whose cosine similarity to `[1, 0, 0]` lands between the two
/// thresholds (about 0.89).
pub fn mid_band_vector() -> Vec<f32> {
    vec![0.89, 0.458, 0.0]
}
