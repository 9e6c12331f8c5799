//! Error types for record validation and identifier policy.

use serde_json::Value;
use thiserror::Error;

/// Errors produced by validation and the identifier policy.
///
/// The message texts are part of the public contract: callers match on
/// the variants, but the rendered strings name the offending field and
/// value so they are useful as-is in logs and API responses.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The value offered as a record or patch is not a JSON object.
    #[error("item must be an object")]
    NotAnObject,

    /// A record with the same identifier already exists.
    #[error("item with {field} {id} already exists")]
    DuplicateId { field: String, id: Value },

    /// Another record already holds this value for a unique field.
    #[error("duplicate value {value} for unique field {field}")]
    DuplicateField { field: String, value: Value },

    /// A patch attempted to change the identifier field.
    #[error("cannot change {field} field")]
    CannotChangeId { field: String },

    /// No record with the given identifier exists.
    #[error("item with {field} {id} not found")]
    NotFound { field: String, id: Value },
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;
