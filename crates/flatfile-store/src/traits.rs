//! Backend trait: the abstract interface over the stored record array.
//!
//! This trait keeps the collection facade storage-agnostic.
//! Implementations include the JSON file (primary) and in-memory (for
//! tests).

use async_trait::async_trait;
use flatfile_core::Record;

use crate::error::Result;

/// The Backend trait: async interface over the single stored array.
///
/// Only two primitives exist, on purpose: read everything, replace
/// everything. All record-level semantics (identifiers, uniqueness,
/// merging) live above this trait, and the write-serialization queue in
/// the facade is the sole permitted caller of [`Backend::write_all`].
///
/// # Design Notes
///
/// - **Reads are unsynchronized**: a `read_all` racing a concurrent
///   write cycle may observe the state from before that cycle's commit.
///   The facade accepts this relaxation for its read-only operations.
/// - **Writes are total**: `write_all` unconditionally replaces prior
///   content; there is no partial update.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read the entire current record set.
    ///
    /// A store that has never been written reads as an empty vector.
    async fn read_all(&self) -> Result<Vec<Record>>;

    /// Replace the entire record set with `records`.
    async fn write_all(&self, records: &[Record]) -> Result<()>;
}
