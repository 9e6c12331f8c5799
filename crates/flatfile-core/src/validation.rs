//! Shape validation: what is allowed to enter the transaction pipeline.

use serde_json::Value;

use crate::error::{RecordError, Result};
use crate::record::Record;

/// Validate that a value is a structured object and convert it to a
/// [`Record`].
///
/// Null, arrays, and scalars are rejected with
/// [`RecordError::NotAnObject`]. Used for both full records on create
/// and partial patches on update, before the operation is queued.
pub fn into_record(value: Value) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(RecordError::NotAnObject),
    }
}
