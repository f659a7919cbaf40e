use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by semantic index operations.
pub enum IndexError {
    /// A vector's dimension disagrees with the index-wide dimension.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension fixed at first insert.
        expected: usize,
        /// Dimension of the offending vector.
        actual: usize,
    },

    /// An entry with this id already exists.
    #[error("duplicate entry id: {id}")]
    DuplicateId {
        /// Colliding id.
        id: String,
    },

    /// No snapshot exists at the configured path.
    #[error("index snapshot not found: {path}")]
    SnapshotNotFound {
        /// Snapshot path.
        path: PathBuf,
    },

    /// Snapshot could not be read or written.
    #[error("index snapshot i/o failed at '{path}': {source}")]
    SnapshotIo {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Snapshot exists but could not be decoded.
    #[error("index snapshot corrupt at '{path}': {message}")]
    SnapshotCorrupt {
        /// Snapshot path.
        path: PathBuf,
        /// Decode error message.
        message: String,
    },
}

/// Convenience result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;
