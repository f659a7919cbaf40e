//! Request and response bodies plus outbound message rendering.

use serde::{Deserialize, Serialize};

use crate::admin::{CacheStats, PruneOutcome};
use crate::constants::MAX_MESSAGE_CHUNK;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Decision taken: `direct`, `synthesized`, `miss` or `fallback`.
    pub status: &'static str,

    /// Provenance of the served answer, when one was served.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<&'static str>,

    /// Relevance of the top match for direct answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f32>,

    /// Rendered answer text split into transport-sized chunks, in order.
    pub chunks: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total: usize,
    pub curated: usize,
    pub generated: usize,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            total: stats.total,
            curated: stats.curated,
            generated: stats.generated,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PruneRequest {
    /// Confirms a prune that would leave the index empty.
    #[serde(default)]
    pub confirm_empty: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PruneResponse {
    Removed { removed: usize },
    Refused { total: usize },
}

impl From<PruneOutcome> for PruneResponse {
    fn from(outcome: PruneOutcome) -> Self {
        match outcome {
            PruneOutcome::Removed(removed) => PruneResponse::Removed { removed },
            PruneOutcome::Refused { total } => PruneResponse::Refused { total },
        }
    }
}

/// Renders the outbound answer text. A non-empty reference block is appended
/// under a fixed heading; an empty one leaves the answer untouched.
pub fn render_answer(answer: &str, reference: &str) -> String {
    if reference.trim().is_empty() {
        answer.to_string()
    } else {
        format!("{answer}\n\nSources:\n{reference}")
    }
}

/// Splits `text` into sequential chunks of at most [`MAX_MESSAGE_CHUNK`]
/// characters, never splitting inside a character. Empty text yields one
/// empty chunk so the caller always has something to send.
pub fn chunk_message(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;

    for ch in text.chars() {
        if count == MAX_MESSAGE_CHUNK {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    chunks.push(current);

    chunks
}
