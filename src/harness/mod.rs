//! Fuzz harness for the table writer/reader round trip.
//!
//! Pipeline per input: the fuzz engine generates an [`OperationSequence`],
//! [`normalize`] makes its keys unique and ascending, and a [`Driver`]
//! replays it through [`SstFileWriter`], reopens the file with
//! [`SstFileReader`] and verifies its checksums. Engine failures surface as
//! [`FatalError`] and end the process via [`abort_on_fatal`].
//!
//! [`SstFileWriter`]: crate::sstable::SstFileWriter
//! [`SstFileReader`]: crate::sstable::SstFileReader

pub mod driver;
pub mod fatal;
pub mod normalize;
pub mod op;

pub use driver::{Driver, HarnessOptions, Outcome, SCRATCH_FILE_NAME, fuzz_one};
pub use fatal::{FatalError, OrFatal, Stage, abort_on_fatal};
pub use normalize::{is_normalized, normalize};
pub use op::{OpKind, Operation, OperationSequence, UnsupportedOpKind};
