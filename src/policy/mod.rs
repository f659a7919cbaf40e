//! Tiered decision policy.
//!
//! Classifies the best retrieval relevance into one of three response paths
//! (miss, synthesize, direct) and orchestrates the chosen path end to end.

mod engine;
pub mod error;
mod types;

#[cfg(test)]
mod tests;

pub use engine::AnswerEngine;
pub use error::EngineError;
pub use types::{AnswerOutcome, Decision, RelevanceThresholds, ThresholdsError, classify};
