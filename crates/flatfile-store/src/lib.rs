//! # Flatfile Store
//!
//! Storage backends for the flatfile record store. The whole record set
//! lives in a single JSON array; backends read it and replace it in its
//! entirety.
//!
//! ## Overview
//!
//! The store module abstracts the array behind the [`Backend`] trait,
//! keeping the collection facade storage-agnostic. The primary
//! implementation is [`FileBackend`], with [`MemoryBackend`] for tests.
//!
//! ## Key Types
//!
//! - [`Backend`] - The async trait for reading and replacing the array
//! - [`FileBackend`] - One JSON array persisted as a UTF-8 text file
//! - [`MemoryBackend`] - In-memory storage for tests
//!
//! ## Design Notes
//!
//! - **Missing file is empty**: a path that does not exist yet reads as
//!   an empty record set; the file appears on the first write.
//! - **Whole-file replacement**: `write_all` rewrites the entire array.
//!   This is the compatibility contract, not an optimization target;
//!   partial updates would change the atomicity semantics.
//! - **No cross-process coordination**: two processes pointed at the
//!   same path can corrupt each other's writes. Serialization is only
//!   provided for callers within one process, by the layer above.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use traits::Backend;
