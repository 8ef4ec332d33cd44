use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::options::Options;
use crate::sstable::builder::TableBuilder;
use crate::types::ValueType;

/// What [`SstFileWriter::finish`] reports about the produced file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableInfo {
    pub file_path: PathBuf,
    /// Smallest point key, empty when the file has none.
    pub smallest_key: Vec<u8>,
    /// Largest point key, empty when the file has none.
    pub largest_key: Vec<u8>,
    /// Smallest range tombstone start, empty when there are none.
    pub smallest_range_del_key: Vec<u8>,
    /// Largest range tombstone end, empty when there are none.
    pub largest_range_del_key: Vec<u8>,
    pub file_size: u64,
    pub num_entries: u64,
    pub num_range_del_entries: u64,
}

struct Open {
    builder: TableBuilder,
    info: TableInfo,
}

/// Bulk-load writer producing one immutable table file.
///
/// Contract:
/// - `open` must precede every other call.
/// - Point keys (`put`, `merge`, `delete`) must be strictly ascending under
///   the configured comparator.
/// - Range tombstones may arrive in any order, interleaved with point keys.
/// - At least one entry or range tombstone must be added before `finish`.
///
/// Breaking the contract yields [`Error::InvalidArgument`]; nothing is
/// written for the rejected call.
pub struct SstFileWriter {
    options: Options,
    open: Option<Open>,
}

impl SstFileWriter {
    pub fn new(options: Options) -> Self {
        SstFileWriter {
            options,
            open: None,
        }
    }

    /// Start a new file at `path`, truncating anything already there.
    /// Any file in progress is abandoned.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let builder = TableBuilder::create(path, &self.options)?;
        debug!(path = %path.display(), "opened table writer");
        self.open = Some(Open {
            builder,
            info: TableInfo {
                file_path: path.to_path_buf(),
                ..TableInfo::default()
            },
        });
        Ok(())
    }

    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.add(ValueType::Put, key, value)
    }

    pub fn merge(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.add(ValueType::Merge, key, value)
    }

    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.add(ValueType::Delete, key, &[])
    }

    /// Delete every key in `[begin, end)`.
    ///
    /// An empty range (`begin == end`) is accepted and dropped.
    pub fn delete_range(&mut self, begin: &[u8], end: &[u8]) -> Result<()> {
        let cmp = self.options.comparator;
        let open = self.open.as_mut().ok_or_else(not_opened)?;

        match cmp.compare(begin, end) {
            Ordering::Greater => {
                return Err(Error::invalid_argument("end key comes before start key"));
            }
            Ordering::Equal => {
                trace!("dropping empty range tombstone");
                return Ok(());
            }
            Ordering::Less => {}
        }

        let info = &mut open.info;
        if info.num_range_del_entries == 0 {
            info.smallest_range_del_key = begin.to_vec();
            info.largest_range_del_key = end.to_vec();
        } else {
            if cmp.compare(begin, &info.smallest_range_del_key) == Ordering::Less {
                info.smallest_range_del_key = begin.to_vec();
            }
            if cmp.compare(end, &info.largest_range_del_key) == Ordering::Greater {
                info.largest_range_del_key = end.to_vec();
            }
        }
        info.num_range_del_entries += 1;
        open.builder.add_range_deletion(begin, end);
        Ok(())
    }

    /// Finish the file: flush remaining blocks, write metadata, fsync.
    ///
    /// The writer is closed afterwards whether or not this succeeds.
    pub fn finish(&mut self) -> Result<TableInfo> {
        let Open { builder, mut info } = self.open.take().ok_or_else(not_opened)?;
        if info.num_entries == 0 && info.num_range_del_entries == 0 {
            return Err(Error::invalid_argument(
                "Cannot create sst file with no entries",
            ));
        }

        info.file_size = builder.finish()?;
        debug!(
            path = %info.file_path.display(),
            entries = info.num_entries,
            range_dels = info.num_range_del_entries,
            bytes = info.file_size,
            "finished table file"
        );
        Ok(info)
    }

    /// Bytes written to the current file so far; 0 when nothing is open.
    pub fn file_size(&self) -> u64 {
        self.open.as_ref().map_or(0, |open| open.builder.file_size())
    }

    fn add(&mut self, value_type: ValueType, key: &[u8], value: &[u8]) -> Result<()> {
        let cmp = self.options.comparator;
        let open = self.open.as_mut().ok_or_else(not_opened)?;

        if open.info.num_entries > 0
            && cmp.compare(key, &open.info.largest_key) != Ordering::Greater
        {
            return Err(Error::invalid_argument(
                "Keys must be added in strict ascending order.",
            ));
        }

        open.builder.add(value_type, key, value)?;

        let info = &mut open.info;
        if info.num_entries == 0 {
            info.smallest_key = key.to_vec();
        }
        info.largest_key = key.to_vec();
        info.num_entries += 1;
        Ok(())
    }
}

fn not_opened() -> Error {
    Error::invalid_argument("File is not opened")
}
