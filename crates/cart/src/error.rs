//! Cart storage error types.

use thiserror::Error;

/// Errors raised by a `CartStorage` backend.
///
/// These never reach cart callers: the store logs them and keeps going.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Another holder of the shared slots panicked mid-write.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for cart storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
