//! The record type and small helpers shared by the policy functions.

use serde_json::{Map, Value};

/// One stored entry: an open-ended mapping from field name to JSON value.
///
/// Records have no object identity beyond their identifier field; they
/// are plain values owned by the store's array. Field order is whatever
/// `serde_json::Map` preserves for the chosen feature set.
pub type Record = Map<String, Value>;

/// Find the index of the first record whose identifier field equals `id`.
///
/// Comparison is exact `Value` equality: no coercion between numbers and
/// strings, and a record without the field never matches.
pub fn find_index(records: &[Record], id_field: &str, id: &Value) -> Option<usize> {
    records.iter().position(|r| r.get(id_field) == Some(id))
}

/// Shallow-merge `patch` over `record` in place.
///
/// Patch fields overwrite, unspecified fields are retained. Nested
/// objects are replaced wholesale, not merged.
pub fn merge_patch(record: &mut Record, patch: Record) {
    for (field, value) in patch {
        record.insert(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_find_index_exact_match() {
        let records = vec![
            record(json!({"id": 1, "name": "a"})),
            record(json!({"id": 2, "name": "b"})),
        ];

        assert_eq!(find_index(&records, "id", &json!(2)), Some(1));
        assert_eq!(find_index(&records, "id", &json!(3)), None);
    }

    #[test]
    fn test_find_index_no_coercion() {
        let records = vec![record(json!({"id": 1}))];

        // A string "1" must not match the number 1.
        assert_eq!(find_index(&records, "id", &json!("1")), None);
    }

    #[test]
    fn test_find_index_missing_field() {
        let records = vec![record(json!({"name": "no id here"}))];

        assert_eq!(find_index(&records, "id", &json!(1)), None);
    }

    #[test]
    fn test_merge_patch_overwrites_and_retains() {
        let mut base = record(json!({"id": 1, "name": "a", "age": 30}));
        let patch = record(json!({"name": "b", "email": "b@example.com"}));

        merge_patch(&mut base, patch);

        assert_eq!(
            Value::Object(base),
            json!({"id": 1, "name": "b", "age": 30, "email": "b@example.com"})
        );
    }

    #[test]
    fn test_merge_patch_replaces_nested_objects() {
        let mut base = record(json!({"id": 1, "meta": {"a": 1, "b": 2}}));
        let patch = record(json!({"meta": {"c": 3}}));

        merge_patch(&mut base, patch);

        assert_eq!(base.get("meta"), Some(&json!({"c": 3})));
    }
}
