use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::index::Provenance;

/// Configuration pair driving the three-way classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelevanceThresholds {
    /// Floor for any use of an entry.
    pub min_relevance: f32,
    /// Floor for skipping generation entirely.
    pub direct_answer_relevance: f32,
}

#[derive(Debug, Error)]
#[error(
    "invalid relevance thresholds: min_relevance={min} direct_answer_relevance={direct} \
     (both must lie in [0, 1] with min_relevance <= direct_answer_relevance)"
)]
/// Threshold pair violates its range or ordering invariant.
pub struct ThresholdsError {
    pub min: f32,
    pub direct: f32,
}

impl RelevanceThresholds {
    /// Validates `0 <= min_relevance <= direct_answer_relevance <= 1`.
    /// Called once at startup; request paths assume a valid pair.
    pub fn new(min_relevance: f32, direct_answer_relevance: f32) -> Result<Self, ThresholdsError> {
        let in_range = (0.0..=1.0).contains(&min_relevance)
            && (0.0..=1.0).contains(&direct_answer_relevance);
        if !in_range || min_relevance > direct_answer_relevance {
            return Err(ThresholdsError {
                min: min_relevance,
                direct: direct_answer_relevance,
            });
        }

        Ok(Self {
            min_relevance,
            direct_answer_relevance,
        })
    }
}

/// Response path for one request. Stateless and per-request; no state machine
/// spans queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No usable knowledge; fixed "insufficient knowledge" response.
    Miss,
    /// Mid-band best match; synthesize from curated context and write back.
    Synthesize,
    /// Best match clears the direct threshold; serve its stored answer.
    Direct,
}

/// Classifies the best relevance into a response path. Pure function of
/// `(best, thresholds)`; `None` means the ranked context was empty.
pub fn classify(best: Option<f32>, thresholds: &RelevanceThresholds) -> Decision {
    match best {
        None => Decision::Miss,
        Some(r) if r < thresholds.min_relevance => Decision::Miss,
        Some(r) if r >= thresholds.direct_answer_relevance => Decision::Direct,
        Some(_) => Decision::Synthesize,
    }
}

/// Final outcome of answering one query.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// Nothing relevant enough in the knowledge base.
    Miss,
    /// Top entry's stored answer returned verbatim, annotated with its
    /// provenance for trust signaling.
    Direct {
        answer: String,
        reference: String,
        provenance: Provenance,
        relevance: f32,
    },
    /// Freshly synthesized from curated context (and written back).
    Synthesized { answer: String, reference: String },
}
