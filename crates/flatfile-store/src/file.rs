//! JSON file implementation of the Backend trait.
//!
//! This is the primary backend: the whole record set is one
//! pretty-printed JSON array in a single UTF-8 text file.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flatfile_core::Record;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::traits::Backend;

/// File-based backend over a single JSON array.
///
/// The file does not need to exist up front: a missing file reads as an
/// empty record set, and the first write creates it (including any
/// missing parent directories).
///
/// There is no cross-process locking. Two `FileBackend`s in separate
/// processes pointed at the same path can corrupt each other's writes;
/// only in-process callers are serialized, by the layer above.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this backend reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Backend for FileBackend {
    async fn read_all(&self) -> Result<Vec<Record>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "file absent, reading as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        // An empty file is treated like a missing one.
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let value: Value = serde_json::from_slice(&bytes)?;
        if !value.is_array() {
            return Err(StoreError::NotAnArray);
        }

        Ok(serde_json::from_value(value)?)
    }

    async fn write_all(&self, records: &[Record]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }

        let content = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}
