//! Cross-cutting, shared constants.
//!
//! Runtime-tunable values live in [`crate::config::Config`]; these are the
//! defaults and the fixed protocol-level limits.

/// Nearest neighbors requested from the index per retrieval.
pub const DEFAULT_TOP_K: usize = 5;

/// Relevance floor below which an entry is never used.
pub const DEFAULT_MIN_RELEVANCE: f32 = 0.7;

/// Relevance at which the top entry's stored answer is returned verbatim.
pub const DEFAULT_DIRECT_ANSWER_RELEVANCE: f32 = 0.98;

/// Character budget applied to query text before it is embedded.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 4_000;

/// Maximum size of a single outbound message unit. Longer responses are
/// split into sequential chunks at the transport boundary.
pub const MAX_MESSAGE_CHUNK: usize = 4_096;

/// Delimiter between source URIs in a serialized `reference` field.
pub const REFERENCE_DELIMITER: &str = "\n";

/// Response header carrying the decision taken for a request.
pub const RECALL_STATUS_HEADER: &str = "x-recall-status";

/// Header value for a healthy service.
pub const RECALL_STATUS_HEALTHY: &str = "ok";

/// Header value when a stored answer was served verbatim.
pub const RECALL_STATUS_DIRECT: &str = "direct";

/// Header value when the answer was synthesized from curated context.
pub const RECALL_STATUS_SYNTHESIZED: &str = "synthesized";

/// Header value when no sufficiently relevant knowledge exists.
pub const RECALL_STATUS_MISS: &str = "miss";

/// Header value when a collaborator failure degraded to the fixed apology.
pub const RECALL_STATUS_FALLBACK: &str = "fallback";

/// Fixed response when no sufficiently relevant knowledge exists.
pub const INSUFFICIENT_KNOWLEDGE_MESSAGE: &str = "Sorry, the knowledge base does \
not contain enough relevant information to answer your question. Please try \
rephrasing it.";

/// Fixed response when a collaborator call fails or returns malformed output.
pub const SYNTHESIS_FAILURE_MESSAGE: &str = "Sorry, a technical error occurred \
while preparing your answer. Please try again.";
