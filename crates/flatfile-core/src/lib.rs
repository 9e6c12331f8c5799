//! # Flatfile Core
//!
//! Record-level logic for the flatfile store: the [`Record`] type, shape
//! validation, and the identifier policy (auto-id generation, duplicate
//! detection, identifier immutability, unique-field constraints).
//!
//! ## Overview
//!
//! Everything in this crate is pure: functions take a snapshot of the
//! current record set and either approve a change or return a
//! [`RecordError`]. No I/O happens here, which is what makes the policy
//! easy to test and deterministic for a fixed snapshot.
//!
//! ## Key Types
//!
//! - [`Record`] - One stored entry: an open-ended JSON object
//! - [`RecordError`] - Everything that can be wrong with a record or patch
//!
//! ## Design Notes
//!
//! - **Exact identifier matching**: identifiers are compared with
//!   `serde_json::Value` equality; `1` and `"1"` are different ids.
//! - **No id reuse**: the next auto-id is always current-max + 1, so
//!   deleting a record leaves a permanent gap.

pub mod error;
pub mod policy;
pub mod record;
pub mod validation;

pub use error::{RecordError, Result};
pub use policy::{ensure_id_free, ensure_id_unchanged, ensure_unique, next_id};
pub use record::{find_index, merge_patch, Record};
pub use validation::into_record;
