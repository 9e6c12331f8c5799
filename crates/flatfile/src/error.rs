//! Error types for the collection facade.

use flatfile_core::RecordError;
use flatfile_store::StoreError;
use thiserror::Error;

/// Errors that can occur during collection operations.
///
/// Record-level failures (shape, duplicate ids, unique-field
/// collisions, not-found) pass through unchanged; storage failures are
/// wrapped with context. Every error flows to exactly one caller: a
/// failed transaction reports through its own completion channel and
/// never disturbs the transactions queued behind it.
#[derive(Debug, Error)]
pub enum CrudError {
    /// Validation or identifier-policy failure.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Storage failure (I/O, parse, non-array content).
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The queue stopped reporting before this transaction completed.
    ///
    /// This cannot happen in normal operation; it exists so the
    /// completion channel is never unwrapped across the async boundary.
    #[error("transaction dropped before completion")]
    TransactionDropped,
}

/// Result type for collection operations.
pub type Result<T> = std::result::Result<T, CrudError>;
