//! Error types for the storage backends.

use thiserror::Error;

/// Errors that can occur while reading or replacing the record array.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure, surfaced unmodified.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file content could not be parsed as JSON, or an array
    /// element could not be decoded as an object.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file parses as JSON but the top-level value is not an array.
    #[error("file content is not a JSON array")]
    NotAnArray,
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, StoreError>;
