use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the embedding collaborator.
pub enum EmbeddingError {
    /// Network or authentication failure reaching the service.
    #[error("embedding service unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// The service replied but the vector could not be extracted.
    #[error("malformed embedding response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },
}

/// Convenience result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;
