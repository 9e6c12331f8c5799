//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: a memory-backed collection
//! with injectable storage faults, and opt-in log capture.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use flatfile::{Collection, CollectionConfig};
use flatfile_core::Record;
use flatfile_store::{Backend, MemoryBackend, StoreError};

/// A backend wrapper that can be told to fail reads or writes.
///
/// Failures are injected as I/O errors, which is what a full disk or a
/// revoked permission would surface. Toggling is atomic, so a test can
/// flip a flag between operations on a live collection.
pub struct FailingBackend<B> {
    inner: B,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl<B> FailingBackend<B> {
    /// Wrap a backend; no failures are injected until requested.
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent read fail (or stop failing).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail (or stop failing).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: Backend> Backend for FailingBackend<B> {
    async fn read_all(&self) -> Result<Vec<Record>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::other("injected read failure")));
        }
        self.inner.read_all().await
    }

    async fn write_all(&self, records: &[Record]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::other("injected write failure")));
        }
        self.inner.write_all(records).await
    }
}

/// A collection over a fault-injecting in-memory backend.
pub struct TestCollection {
    collection: Collection<FailingBackend<MemoryBackend>>,
}

impl TestCollection {
    /// Create a fixture with default configuration.
    pub fn new() -> Self {
        Self::with_config(CollectionConfig::default())
    }

    /// Create a fixture with a custom configuration.
    pub fn with_config(config: CollectionConfig) -> Self {
        Self {
            collection: Collection::new(FailingBackend::new(MemoryBackend::new()), config),
        }
    }

    /// The collection under test.
    pub fn collection(&self) -> &Collection<FailingBackend<MemoryBackend>> {
        &self.collection
    }

    /// The fault-injecting backend behind the collection.
    pub fn backend(&self) -> &FailingBackend<MemoryBackend> {
        self.collection.backend()
    }
}

impl Default for TestCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// Install a test subscriber that prints spans and events.
///
/// Safe to call from several tests; only the first call wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}
