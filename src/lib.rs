//! Recall library crate (used by the server binary and integration tests).
//!
//! Recall is a tiered question-answering cache: a semantic index of curated
//! and previously generated answers sits in front of an LLM synthesizer, and
//! a relevance-based policy decides per query whether to serve a stored
//! answer verbatim, synthesize a new one from curated context, or report that
//! the knowledge base cannot answer.
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`SemanticIndex`], [`CacheEntry`], [`Provenance`] - Index and its entries
//! - [`RetrievalEngine`], [`ContextFragment`] - Ranked context retrieval
//! - [`AnswerEngine`], [`AnswerOutcome`], [`RelevanceThresholds`] - Decision
//!   policy and orchestration
//! - [`HttpEmbeddingClient`], [`HttpSynthesizer`] - Model collaborators
//! - [`WritebackManager`] - Generated-answer caching
//! - [`CacheAdmin`], [`CacheStats`], [`PruneOutcome`] - Administration
//! - [`load_dataset`] - Bulk dataset ingestion
//!
//! Mock collaborators are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod admin;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod index;
pub mod loader;
pub mod policy;
pub mod retrieval;
pub mod synthesis;
pub mod writeback;

pub use admin::{CacheAdmin, CacheStats, PruneOutcome};
pub use config::{Config, ConfigError};
pub use embedding::{EmbeddingClient, EmbeddingError, HttpEmbeddingClient};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingClient;
pub use hashing::{fingerprint_query, normalize_query};
pub use index::{CacheEntry, IndexError, Provenance, ScoredEntry, SemanticIndex};
pub use loader::{LoadReport, LoaderError, load_dataset};
pub use policy::{
    AnswerEngine, AnswerOutcome, Decision, EngineError, RelevanceThresholds, classify,
};
pub use retrieval::{ContextFragment, RetrievalEngine, RetrievalError};
pub use synthesis::{HttpSynthesizer, SynthesisError, SynthesisOutput, Synthesizer};
#[cfg(any(test, feature = "mock"))]
pub use synthesis::MockSynthesizer;
pub use writeback::WritebackManager;
