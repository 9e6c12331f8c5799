//! Identifier policy: auto-id generation, duplicate detection,
//! identifier immutability, and unique-field constraints.
//!
//! All functions here are pure and evaluate against the snapshot they
//! are handed. The duplicate and uniqueness checks are meant to run
//! inside the queued mutation step, against a freshly read snapshot;
//! the immutability check runs eagerly, before any file access.

use serde_json::Value;

use crate::error::{RecordError, Result};
use crate::record::Record;

/// Compute the next auto-assigned identifier for a snapshot.
///
/// Returns `1` for an empty store or a store with no numeric
/// identifiers; otherwise the maximum numeric identifier plus one.
/// Non-numeric identifiers neither block nor influence the result.
/// Deleted records never cause reuse: the policy only ever looks at the
/// current maximum, so gaps persist.
pub fn next_id(records: &[Record], id_field: &str) -> Value {
    let max = records
        .iter()
        .filter_map(|r| r.get(id_field))
        .filter_map(Value::as_f64)
        .fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |a| a.max(v)))
        });

    match max {
        None => Value::from(1),
        Some(max) => {
            let next = max + 1.0;
            if next.fract() == 0.0 && next.abs() < i64::MAX as f64 {
                Value::from(next as i64)
            } else {
                serde_json::Number::from_f64(next)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::from(1))
            }
        }
    }
}

/// Fail with [`RecordError::DuplicateId`] if any record in the snapshot
/// already carries this identifier.
pub fn ensure_id_free(records: &[Record], id_field: &str, id: &Value) -> Result<()> {
    if records.iter().any(|r| r.get(id_field) == Some(id)) {
        return Err(RecordError::DuplicateId {
            field: id_field.to_string(),
            id: id.clone(),
        });
    }
    Ok(())
}

/// Fail with [`RecordError::CannotChangeId`] if the patch contains the
/// identifier field with a value different from the target's identifier.
///
/// Presence is what matters: a patch that repeats the current identifier
/// is allowed, a patch that omits the field is allowed, anything else is
/// rejected.
pub fn ensure_id_unchanged(id_field: &str, id: &Value, patch: &Record) -> Result<()> {
    match patch.get(id_field) {
        Some(value) if value != id => Err(RecordError::CannotChangeId {
            field: id_field.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Enforce the configured unique fields against a candidate record or
/// patch.
///
/// For each unique field present (and non-null) in `candidate`, fail
/// with [`RecordError::DuplicateField`] if any record other than
/// `exclude` holds an equal value. On update, `exclude` is the index of
/// the record being patched so it never collides with itself.
pub fn ensure_unique(
    records: &[Record],
    unique_fields: &[String],
    candidate: &Record,
    exclude: Option<usize>,
) -> Result<()> {
    for field in unique_fields {
        let Some(value) = candidate.get(field) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        let taken = records
            .iter()
            .enumerate()
            .any(|(i, r)| Some(i) != exclude && r.get(field) == Some(value));

        if taken {
            return Err(RecordError::DuplicateField {
                field: field.clone(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}
