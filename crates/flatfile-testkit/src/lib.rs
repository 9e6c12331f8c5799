//! # Flatfile Testkit
//!
//! Testing utilities for the flatfile store.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: pre-wired in-memory collections and a fault-injecting
//!   backend wrapper for exercising failure paths
//! - **Generators**: proptest strategies for records and record sets
//!
//! ## Fixtures
//!
//! Quickly set up a collection with injectable storage failures:
//!
//! ```rust
//! use flatfile_testkit::fixtures::TestCollection;
//!
//! let fixture = TestCollection::new();
//! fixture.backend().fail_writes(true);
//! // every mutation now surfaces a storage error, nothing is persisted
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use flatfile_testkit::generators::arb_records;
//!
//! proptest! {
//!     #[test]
//!     fn round_trips(records in arb_records(8)) {
//!         // write_all then read_all preserves order and values
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{init_tracing, FailingBackend, TestCollection};
pub use generators::{arb_record, arb_records, arb_value};
