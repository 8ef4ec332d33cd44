//! # SST round-trip fuzz harness
//!
//! A sorted, immutable table file format (bulk-load writer + reader with
//! per-block checksums) and the structured fuzz harness that exercises it.
//!
//! ## Core idea
//! The fuzzer generates sequences of put/merge/delete/delete-range
//! operations. Each sequence is sorted and deduplicated so it meets the
//! writer's contract (unique, strictly ascending keys), written to a table
//! file, reopened, and checksum-verified. Any engine failure aborts the
//! process so the fuzzer records the input as a crash.

pub mod checksum;
pub mod coding;
pub mod comparator;
pub mod error;
pub mod fs;
pub mod harness;
#[cfg(feature = "log")]
pub mod log;
pub mod options;
pub mod sstable;
pub mod types;

// Public re-exports for the top-level API
pub use comparator::{Comparator, bytewise_comparator};
pub use error::{Error, Result};
pub use harness::{Driver, HarnessOptions, Operation, OperationSequence, Outcome, fuzz_one};
pub use options::{ChecksumType, Options};
pub use sstable::{SstFileReader, SstFileWriter, TableInfo};
