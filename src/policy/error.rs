use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::retrieval::RetrievalError;
use crate::synthesis::SynthesisError;

#[derive(Debug, Error)]
/// Errors surfaced while answering one query.
pub enum EngineError {
    /// Embedding collaborator failed; the query cannot be retrieved.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Generation collaborator failed or violated its output contract.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// The index itself failed; unlike collaborator failures this is not a
    /// user-facing fallback case.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

impl EngineError {
    /// True for failures answered with the generic apology rather than an
    /// internal error: the collaborators are external and expected to flake.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, EngineError::Embedding(_) | EngineError::Synthesis(_))
    }
}
