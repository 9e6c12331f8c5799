//! Proptest strategies for records and record sets.

use flatfile_core::Record;
use proptest::prelude::*;
use serde_json::Value;

/// An arbitrary JSON value: scalars plus shallowly nested arrays and
/// objects.
///
/// Floats are deliberately excluded so equality assertions stay exact;
/// everything else round-trips byte-for-byte through serde_json.
pub fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _-]{0,12}".prop_map(Value::from),
    ];

    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// An arbitrary record: a non-reserved field map.
///
/// The `id` field is excluded so tests control identifier assignment
/// themselves (or leave it to the collection's auto-id policy).
pub fn arb_record() -> impl Strategy<Value = Record> {
    proptest::collection::btree_map("[a-hj-z][a-z]{0,7}", arb_value(), 0..5)
        .prop_map(|m| m.into_iter().collect())
}

/// A vector of arbitrary records, each tagged with a unique `id` so the
/// set is valid under the default duplicate-id policy.
pub fn arb_records(max: usize) -> impl Strategy<Value = Vec<Record>> {
    proptest::collection::vec(arb_record(), 0..=max).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(i, mut r)| {
                r.insert("id".to_string(), Value::from(i as i64 + 1));
                r
            })
            .collect()
    })
}
