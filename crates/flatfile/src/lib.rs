//! # Flatfile
//!
//! A small embedded record store: one collection of JSON objects,
//! persisted as a single JSON array in one file, with serialized writes
//! so concurrent callers never corrupt the file or race each other.
//!
//! ## Overview
//!
//! Flatfile provides:
//!
//! - **CRUD operations**: create, read, update, delete over open-ended
//!   JSON records
//! - **Auto identifiers**: monotonically increasing numeric ids with no
//!   reuse after deletion
//! - **Constraints**: duplicate-id rejection, identifier immutability,
//!   and configurable unique fields
//! - **Write serialization**: a per-collection FIFO queue so at most one
//!   read-modify-write cycle is in flight at a time
//!
//! ## Key Concepts
//!
//! - **Record**: one JSON object in the stored array, identified by a
//!   configurable id field (default `"id"`).
//! - **Transaction**: one queued mutation; it re-reads the whole file,
//!   mutates in memory, and writes the whole file back, all-or-nothing.
//! - **Queue drain**: after a transaction finishes, the next pending one
//!   runs; arrival order is commit order.
//! - **Unsynchronized reads**: read-only operations bypass the queue and
//!   may observe a state older than queued mutations.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use flatfile::{Collection, CollectionConfig};
//! use serde_json::json;
//!
//! async fn example() -> flatfile::Result<()> {
//!     let users = Collection::open("users.json", CollectionConfig::default());
//!
//!     let alice = users.create(json!({"name": "Alice"})).await?;
//!     assert_eq!(alice.get("id"), Some(&json!(1)));
//!
//!     let updated = users.update(&json!(1), json!({"name": "Alice B."})).await?;
//!     let removed = users.delete(&json!(1)).await?;
//!     assert_eq!(removed, updated);
//!     Ok(())
//! }
//! ```
//!
//! ## Limitations
//!
//! The whole file is rewritten on every mutation; this is the intended
//! contract for small record sets, not something to optimize away.
//! There is no cross-process coordination: two processes over the same
//! path can corrupt each other's writes.
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `flatfile::core` - Record type, validation, identifier policy
//! - `flatfile::store` - The `Backend` trait and its implementations

pub mod collection;
pub mod error;
mod queue;

// Re-export component crates
pub use flatfile_core as core;
pub use flatfile_store as store;

// Re-export main types for convenience
pub use collection::{Collection, CollectionConfig};
pub use error::{CrudError, Result};

// Re-export commonly used component types
pub use flatfile_core::{Record, RecordError};
pub use flatfile_store::{Backend, FileBackend, MemoryBackend, StoreError};
