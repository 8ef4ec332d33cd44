use std::io;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::fs::{DefaultFileSystem, FileSystem};
use crate::harness::fatal::{FatalError, OrFatal, Stage, abort_on_fatal};
use crate::harness::op::{OpKind, Operation, OperationSequence, UnsupportedOpKind};
use crate::options::Options;
use crate::sstable::{SstFileReader, SstFileWriter, TableInfo};

/// Name of the scratch file, reused by every iteration.
pub const SCRATCH_FILE_NAME: &str = "SstFileWriterFuzzer.sst";

/// Harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessOptions {
    /// File name inside the scratch directory.
    pub scratch_file_name: String,
    /// Engine options for both the writer and the reader.
    pub options: Options,
    /// Also cross-check block entry counts against the table properties.
    pub verify_num_entries: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        HarnessOptions {
            scratch_file_name: SCRATCH_FILE_NAME.to_string(),
            options: Options::default(),
            verify_num_entries: false,
        }
    }
}

/// How an iteration ended, short of a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to replay.
    Empty,
    /// The operation at `index` had a kind this harness doesn't know.
    /// The rest of the sequence was skipped.
    Unsupported { index: usize, kind: i32 },
    /// The file was written, reopened and its checksums matched.
    Verified(TableInfo),
}

/// Deletes the scratch file when the iteration ends, however it ends.
struct ScratchFile<'a, F: FileSystem> {
    fs: &'a F,
    path: PathBuf,
}

impl<F: FileSystem> Drop for ScratchFile<'_, F> {
    fn drop(&mut self) {
        match self.fs.remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove scratch file"),
        }
    }
}

/// Runs one fuzz iteration: write the sequence to a table file, reopen it,
/// verify it, delete it.
///
/// Single-threaded and not reentrant: every iteration reuses the same
/// scratch path, so two drivers sharing a scratch directory race.
pub struct Driver<F: FileSystem = DefaultFileSystem> {
    fs: F,
    options: HarnessOptions,
}

impl Default for Driver<DefaultFileSystem> {
    fn default() -> Self {
        Driver::new(DefaultFileSystem::default(), HarnessOptions::default())
    }
}

impl<F: FileSystem> Driver<F> {
    pub fn new(fs: F, options: HarnessOptions) -> Self {
        Driver { fs, options }
    }

    pub fn options(&self) -> &HarnessOptions {
        &self.options
    }

    /// Where the scratch file lives. Creates the scratch directory.
    pub fn scratch_path(&self) -> io::Result<PathBuf> {
        Ok(self.fs.test_directory()?.join(&self.options.scratch_file_name))
    }

    /// True if a scratch file is on disk right now.
    pub fn scratch_exists(&self) -> bool {
        self.scratch_path().is_ok_and(|p| p.exists())
    }

    /// Replay `ops`, which must already be normalized.
    ///
    /// Engine failures come back as [`FatalError`]; the caller is expected
    /// to abort on them. The scratch file is gone by the time this returns.
    pub fn run(&self, ops: &[Operation]) -> Result<Outcome, FatalError> {
        if ops.is_empty() {
            return Ok(Outcome::Empty);
        }

        let path = self.scratch_path().or_fatal(Stage::AcquireScratch)?;
        let scratch = ScratchFile { fs: &self.fs, path };

        let mut writer = SstFileWriter::new(self.options.options);
        writer.open(&scratch.path).or_fatal(Stage::OpenWriter)?;

        for (index, op) in ops.iter().enumerate() {
            let kind = match op.op_kind() {
                Ok(kind) => kind,
                Err(UnsupportedOpKind(tag)) => {
                    warn!(index, kind = tag, "unsupported operation kind, skipping input");
                    return Ok(Outcome::Unsupported { index, kind: tag });
                }
            };
            let applied = match kind {
                OpKind::Put => writer.put(&op.key, &op.value),
                OpKind::Merge => writer.merge(&op.key, &op.value),
                OpKind::Delete => writer.delete(&op.key),
                OpKind::DeleteRange => writer.delete_range(&op.key, &op.value),
            };
            applied.or_fatal(Stage::Replay(index))?;
        }

        let info = writer.finish().or_fatal(Stage::Finish)?;

        let reader = SstFileReader::open(self.options.options, &scratch.path)
            .or_fatal(Stage::OpenReader)?;
        reader.verify_checksum().or_fatal(Stage::VerifyChecksum)?;
        if self.options.verify_num_entries {
            reader.verify_num_entries().or_fatal(Stage::VerifyNumEntries)?;
        }
        drop(reader);

        debug!(
            path = %scratch.path.display(),
            ops = ops.len(),
            entries = info.num_entries,
            range_dels = info.num_range_del_entries,
            "iteration verified"
        );
        Ok(Outcome::Verified(info))
    }
}

/// Fuzz entry point: normalize `input`, run it with default options, and
/// abort the process on any engine failure.
pub fn fuzz_one(mut input: OperationSequence) {
    let driver = Driver::default();
    input.normalize(driver.options().options.comparator);
    if let Err(err) = driver.run(input.operations()) {
        abort_on_fatal(err);
    }
}
