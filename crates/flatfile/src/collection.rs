//! The Collection: the public CRUD surface over one stored array.
//!
//! A Collection wires together shape validation, the identifier policy,
//! and the write-serialization queue. Mutating operations are queued;
//! read-only operations go straight to the backend.

use std::sync::Arc;

use serde_json::Value;

use flatfile_core::{policy, record, validation, Record, RecordError};
use flatfile_store::{Backend, FileBackend};
use tokio::sync::oneshot;

use crate::error::{CrudError, Result};
use crate::queue::{Commit, Transaction, WriteQueue};

/// Configuration for a Collection, fixed at construction.
#[derive(Debug, Clone)]
pub struct CollectionConfig {
    /// Field name treated as the unique record identifier.
    pub id_field: String,
    /// Whether missing identifiers are auto-generated on create.
    pub auto_id: bool,
    /// Field names enforced unique across all records, besides the
    /// identifier.
    pub unique_fields: Vec<String>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            auto_id: true,
            unique_fields: Vec::new(),
        }
    }
}

/// A collection of records stored as a single JSON array.
///
/// Provides:
/// - Create with auto-assigned identifiers and uniqueness checks
/// - Read operations (full scan, by id, by predicate, count)
/// - Shallow-merge updates with identifier immutability
/// - Delete, bulk replace, and delete-all
///
/// All mutations are serialized through a per-instance FIFO queue, so
/// logically concurrent callers commit in submission order and never
/// interleave read-modify-write cycles. Read-only operations bypass the
/// queue and may observe a state that predates queued-but-uncommitted
/// mutations; that relaxation is deliberate.
pub struct Collection<B: Backend> {
    /// The storage backend, shared with the queue's drain task.
    backend: Arc<B>,
    /// Immutable per-collection settings.
    config: CollectionConfig,
    /// The write-serialization queue for this instance.
    queue: WriteQueue,
}

impl Collection<FileBackend> {
    /// Open a collection over a JSON array file.
    ///
    /// The file does not need to exist; it appears on the first write.
    pub fn open(path: impl Into<std::path::PathBuf>, config: CollectionConfig) -> Self {
        Self::new(FileBackend::new(path), config)
    }
}

impl<B: Backend + 'static> Collection<B> {
    /// Create a collection over an arbitrary backend.
    pub fn new(backend: B, config: CollectionConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
            queue: WriteQueue::new(),
        }
    }

    /// This collection's configuration.
    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// The backend reference.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Create
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new record.
    ///
    /// The value must be a JSON object. If it lacks the identifier
    /// field and auto-id is enabled, the next identifier (max numeric
    /// id + 1) is assigned inside the transaction, against the freshly
    /// read snapshot. Fails with `DuplicateId` if the identifier is
    /// taken and `DuplicateField` if a configured unique field
    /// collides.
    ///
    /// Returns the stored record, identifier included.
    pub async fn create(&self, record: Value) -> Result<Record> {
        let mut record = validation::into_record(record)?;

        let id_field = self.config.id_field.clone();
        let auto_id = self.config.auto_id;
        let unique_fields = self.config.unique_fields.clone();

        self.mutate(move |mut records| {
            if auto_id && !record.contains_key(&id_field) {
                let id = policy::next_id(&records, &id_field);
                record.insert(id_field.clone(), id);
            }

            // With auto-id disabled a record may carry no identifier at
            // all; only present identifiers participate in the check.
            if let Some(id) = record.get(&id_field) {
                policy::ensure_id_free(&records, &id_field, id)?;
            }
            policy::ensure_unique(&records, &unique_fields, &record, None)?;

            records.push(record.clone());
            Ok(Commit {
                records,
                outcome: record,
            })
        })
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read
    // ─────────────────────────────────────────────────────────────────────────

    /// Read the full record sequence.
    ///
    /// Bypasses the queue: the result reflects whatever is committed at
    /// the moment of the read, not mutations still waiting in line.
    pub async fn read_all(&self) -> Result<Vec<Record>> {
        Ok(self.backend.read_all().await?)
    }

    /// Find the first record whose identifier equals `id`.
    ///
    /// Matching is exact `Value` equality, no coercion. Fails with
    /// `NotFound` if no record matches.
    pub async fn find_by_id(&self, id: &Value) -> Result<Record> {
        let records = self.read_all().await?;
        records
            .into_iter()
            .find(|r| r.get(&self.config.id_field) == Some(id))
            .ok_or_else(|| {
                CrudError::from(RecordError::NotFound {
                    field: self.config.id_field.clone(),
                    id: id.clone(),
                })
            })
    }

    /// Return every record matching the predicate.
    ///
    /// Zero matches is an empty vector, never an error.
    pub async fn find_by<F>(&self, mut predicate: F) -> Result<Vec<Record>>
    where
        F: FnMut(&Record) -> bool,
    {
        let records = self.read_all().await?;
        Ok(records.into_iter().filter(|r| predicate(r)).collect())
    }

    /// Count the stored records.
    pub async fn count(&self) -> Result<usize> {
        Ok(self.read_all().await?.len())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Update
    // ─────────────────────────────────────────────────────────────────────────

    /// Update the record with identifier `id` by shallow-merging
    /// `patch` over it.
    ///
    /// Patch fields overwrite, unspecified fields are retained. The
    /// patch must be a JSON object and may not change the identifier;
    /// both are checked eagerly, before the operation is queued. Unique
    /// fields are re-checked inside the transaction against the fresh
    /// snapshot.
    ///
    /// Returns the merged record.
    pub async fn update(&self, id: &Value, patch: Value) -> Result<Record> {
        let patch = validation::into_record(patch)?;
        policy::ensure_id_unchanged(&self.config.id_field, id, &patch)?;

        let id = id.clone();
        let id_field = self.config.id_field.clone();
        let unique_fields = self.config.unique_fields.clone();

        self.mutate(move |mut records| {
            let index = record::find_index(&records, &id_field, &id).ok_or_else(|| {
                RecordError::NotFound {
                    field: id_field.clone(),
                    id: id.clone(),
                }
            })?;

            policy::ensure_unique(&records, &unique_fields, &patch, Some(index))?;

            record::merge_patch(&mut records[index], patch);
            let merged = records[index].clone();
            Ok(Commit {
                records,
                outcome: merged,
            })
        })
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Delete
    // ─────────────────────────────────────────────────────────────────────────

    /// Delete the record with identifier `id`.
    ///
    /// Returns the removed record; fails with `NotFound` if no record
    /// matches.
    pub async fn delete(&self, id: &Value) -> Result<Record> {
        let id = id.clone();
        let id_field = self.config.id_field.clone();

        self.mutate(move |mut records| {
            let index = record::find_index(&records, &id_field, &id).ok_or_else(|| {
                RecordError::NotFound {
                    field: id_field.clone(),
                    id: id.clone(),
                }
            })?;

            let removed = records.remove(index);
            Ok(Commit {
                records,
                outcome: removed,
            })
        })
        .await
    }

    /// Remove every record. Equivalent to `write_all(vec![])`.
    pub async fn delete_all(&self) -> Result<()> {
        self.write_all(Vec::new()).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bulk write
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the entire stored array with `records`.
    ///
    /// Participates in the same queue as every other mutation, but
    /// skips the read phase: prior content is overwritten
    /// unconditionally.
    pub async fn write_all(&self, records: Vec<Record>) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.queue
            .submit(&self.backend, Transaction::Replace { records, reply });
        rx.await.map_err(|_| CrudError::TransactionDropped)?
    }

    /// Queue a read-modify-write transaction and wait for its outcome.
    async fn mutate<F>(&self, mutate: F) -> Result<Record>
    where
        F: FnOnce(Vec<Record>) -> Result<Commit> + Send + 'static,
    {
        let (reply, rx) = oneshot::channel();
        self.queue.submit(
            &self.backend,
            Transaction::Mutate {
                mutate: Box::new(mutate),
                reply,
            },
        );
        rx.await.map_err(|_| CrudError::TransactionDropped)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatfile_store::{MemoryBackend, StoreError};
    use serde_json::json;

    fn collection() -> Collection<MemoryBackend> {
        Collection::new(MemoryBackend::new(), CollectionConfig::default())
    }

    fn record(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let coll = collection();

        let a = coll.create(json!({"name": "A"})).await.unwrap();
        let b = coll.create(json!({"name": "B"})).await.unwrap();

        assert_eq!(a.get("id"), Some(&json!(1)));
        assert_eq!(b.get("id"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_deleted_ids_are_never_reused() {
        // Empty -> create A (id 1) -> create B (id 2) -> delete 1 ->
        // create C gets id 3, not 1.
        let coll = collection();

        coll.create(json!({"name": "A"})).await.unwrap();
        coll.create(json!({"name": "B"})).await.unwrap();

        let removed = coll.delete(&json!(1)).await.unwrap();
        assert_eq!(removed, record(json!({"id": 1, "name": "A"})));
        assert_eq!(
            coll.read_all().await.unwrap(),
            vec![record(json!({"id": 2, "name": "B"}))]
        );

        let c = coll.create(json!({"name": "C"})).await.unwrap();
        assert_eq!(c.get("id"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let coll = collection();
        coll.create(json!({"id": 5, "name": "first"})).await.unwrap();

        let before = coll.read_all().await.unwrap();
        let result = coll.create(json!({"id": 5, "name": "second"})).await;

        assert!(matches!(
            result,
            Err(CrudError::Record(RecordError::DuplicateId { .. }))
        ));
        assert_eq!(coll.read_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_create_rejects_non_objects() {
        let coll = collection();
        for value in [json!(null), json!([1]), json!("x"), json!(1)] {
            let result = coll.create(value).await;
            assert!(matches!(
                result,
                Err(CrudError::Record(RecordError::NotAnObject))
            ));
        }
        assert_eq!(coll.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_explicit_id_is_kept() {
        let coll = collection();
        let stored = coll.create(json!({"id": 42, "name": "X"})).await.unwrap();
        assert_eq!(stored.get("id"), Some(&json!(42)));

        // The next auto id continues above the explicit one.
        let next = coll.create(json!({"name": "Y"})).await.unwrap();
        assert_eq!(next.get("id"), Some(&json!(43)));
    }

    #[tokio::test]
    async fn test_auto_id_disabled_stores_idless_records() {
        let coll = Collection::new(
            MemoryBackend::new(),
            CollectionConfig {
                auto_id: false,
                ..CollectionConfig::default()
            },
        );

        let stored = coll.create(json!({"name": "NoId"})).await.unwrap();
        assert!(stored.get("id").is_none());

        // A second id-less record must not trip the duplicate check.
        coll.create(json!({"name": "AlsoNoId"})).await.unwrap();
        assert_eq!(coll.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_custom_id_field() {
        let coll = Collection::new(
            MemoryBackend::new(),
            CollectionConfig {
                id_field: "key".to_string(),
                ..CollectionConfig::default()
            },
        );

        let stored = coll.create(json!({"name": "A"})).await.unwrap();
        assert_eq!(stored.get("key"), Some(&json!(1)));
        assert!(stored.get("id").is_none());

        let found = coll.find_by_id(&json!(1)).await.unwrap();
        assert_eq!(found, stored);
    }

    #[tokio::test]
    async fn test_find_by_id_is_exact() {
        let coll = collection();
        coll.create(json!({"id": 1, "name": "A"})).await.unwrap();

        // The string "1" does not match the number 1.
        let result = coll.find_by_id(&json!("1")).await;
        assert!(matches!(
            result,
            Err(CrudError::Record(RecordError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_find_by_filters_without_error_on_empty() {
        let coll = collection();
        coll.create(json!({"name": "A", "age": 30})).await.unwrap();
        coll.create(json!({"name": "B", "age": 40})).await.unwrap();

        let over_35 = coll
            .find_by(|r| r.get("age").and_then(Value::as_i64).unwrap_or(0) > 35)
            .await
            .unwrap();
        assert_eq!(over_35.len(), 1);
        assert_eq!(over_35[0].get("name"), Some(&json!("B")));

        let none = coll.find_by(|_| false).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_shallowly() {
        let coll = collection();
        coll.create(json!({"name": "A", "age": 30})).await.unwrap();

        let merged = coll
            .update(&json!(1), json!({"age": 31, "email": "a@example.com"}))
            .await
            .unwrap();

        assert_eq!(
            merged,
            record(json!({"id": 1, "name": "A", "age": 31, "email": "a@example.com"}))
        );
        assert_eq!(coll.find_by_id(&json!(1)).await.unwrap(), merged);
    }

    #[tokio::test]
    async fn test_update_cannot_change_id() {
        let coll = collection();
        coll.create(json!({"name": "A"})).await.unwrap();

        let result = coll.update(&json!(1), json!({"id": 2})).await;
        assert!(matches!(
            result,
            Err(CrudError::Record(RecordError::CannotChangeId { .. }))
        ));
        // Target record unchanged.
        assert_eq!(
            coll.find_by_id(&json!(1)).await.unwrap(),
            record(json!({"id": 1, "name": "A"}))
        );
    }

    #[tokio::test]
    async fn test_update_may_repeat_current_id() {
        let coll = collection();
        coll.create(json!({"name": "A"})).await.unwrap();

        let merged = coll
            .update(&json!(1), json!({"id": 1, "name": "A2"}))
            .await
            .unwrap();
        assert_eq!(merged.get("name"), Some(&json!("A2")));
    }

    #[tokio::test]
    async fn test_not_found_symmetry() {
        let coll = collection();

        let missing = json!(404);
        assert!(matches!(
            coll.find_by_id(&missing).await,
            Err(CrudError::Record(RecordError::NotFound { .. }))
        ));
        assert!(matches!(
            coll.update(&missing, json!({"name": "x"})).await,
            Err(CrudError::Record(RecordError::NotFound { .. }))
        ));
        assert!(matches!(
            coll.delete(&missing).await,
            Err(CrudError::Record(RecordError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unique_fields_on_create_and_update() {
        let coll = Collection::new(
            MemoryBackend::new(),
            CollectionConfig {
                unique_fields: vec!["email".to_string()],
                ..CollectionConfig::default()
            },
        );

        coll.create(json!({"name": "A", "email": "a@example.com"}))
            .await
            .unwrap();
        coll.create(json!({"name": "B", "email": "b@example.com"}))
            .await
            .unwrap();

        let result = coll
            .create(json!({"name": "C", "email": "a@example.com"}))
            .await;
        assert!(matches!(
            result,
            Err(CrudError::Record(RecordError::DuplicateField { ref field, .. })) if field == "email"
        ));

        let result = coll
            .update(&json!(2), json!({"email": "a@example.com"}))
            .await;
        assert!(matches!(
            result,
            Err(CrudError::Record(RecordError::DuplicateField { ref field, .. })) if field == "email"
        ));

        // A record may keep its own unique value through an update.
        let merged = coll
            .update(&json!(2), json!({"email": "b@example.com", "name": "B2"}))
            .await
            .unwrap();
        assert_eq!(merged.get("name"), Some(&json!("B2")));
    }

    #[tokio::test]
    async fn test_concurrent_creates_commit_in_call_order() {
        let coll = collection();

        // Issued without awaiting each other; join! polls in order, so
        // the transactions enqueue in call order.
        let (a, b, c) = tokio::join!(
            coll.create(json!({"name": "A"})),
            coll.create(json!({"name": "B"})),
            coll.create(json!({"name": "C"})),
        );

        assert_eq!(a.unwrap().get("id"), Some(&json!(1)));
        assert_eq!(b.unwrap().get("id"), Some(&json!(2)));
        assert_eq!(c.unwrap().get("id"), Some(&json!(3)));

        let names: Vec<_> = coll
            .read_all()
            .await
            .unwrap()
            .iter()
            .map(|r| r.get("name").unwrap().clone())
            .collect();
        assert_eq!(names, vec![json!("A"), json!("B"), json!("C")]);
    }

    #[tokio::test]
    async fn test_write_all_and_delete_all() {
        let coll = collection();
        coll.create(json!({"name": "old"})).await.unwrap();

        let replacement = vec![
            record(json!({"id": 10, "name": "x"})),
            record(json!({"id": 20, "name": "y"})),
        ];
        coll.write_all(replacement.clone()).await.unwrap();
        assert_eq!(coll.read_all().await.unwrap(), replacement);

        coll.delete_all().await.unwrap();
        assert_eq!(coll.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_create_leaves_file_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let coll = Collection::open(&path, CollectionConfig::default());

        coll.create(json!({"id": 1, "name": "A"})).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        let result = coll.create(json!({"id": 1, "name": "B"})).await;
        assert!(result.is_err());

        let after = std::fs::read(&path).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_invalid_file_content_surfaces_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();

        let coll = Collection::open(&path, CollectionConfig::default());
        let result = coll.read_all().await;
        assert!(matches!(
            result,
            Err(CrudError::Store(StoreError::NotAnArray))
        ));

        // Mutations hit the same error through the queue and perform no
        // write.
        let result = coll.create(json!({"name": "A"})).await;
        assert!(matches!(
            result,
            Err(CrudError::Store(StoreError::NotAnArray))
        ));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, r#"{"not": "an array"}"#);
    }
}
