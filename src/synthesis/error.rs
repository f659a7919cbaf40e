use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the answer synthesizer.
pub enum SynthesisError {
    /// Network or authentication failure reaching the service.
    #[error("generation service unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// The service replied but violated the structured output contract.
    #[error("malformed synthesis output: {message}")]
    MalformedOutput {
        /// Contract violation description.
        message: String,
    },
}

/// Convenience result type for synthesis operations.
pub type SynthesisResult<T> = Result<T, SynthesisError>;
