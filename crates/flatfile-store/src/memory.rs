//! In-memory implementation of the Backend trait.
//!
//! This is primarily for testing. It has the same semantics as the file
//! backend but keeps the array in memory with no persistence.

use std::sync::RwLock;

use async_trait::async_trait;
use flatfile_core::Record;

use crate::error::Result;
use crate::traits::Backend;

/// In-memory backend.
///
/// All data is lost when the backend is dropped. Thread-safe via RwLock.
pub struct MemoryBackend {
    records: RwLock<Vec<Record>>,
}

impl MemoryBackend {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Create a backend pre-seeded with records.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn read_all(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().unwrap().clone())
    }

    async fn write_all(&self, records: &[Record]) -> Result<()> {
        *self.records.write().unwrap() = records.to_vec();
        Ok(())
    }
}
