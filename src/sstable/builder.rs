use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::checksum;
use crate::coding::put_u32;
use crate::error::Result;
use crate::options::{ChecksumType, Options};
use crate::sstable::block::BlockBuilder;
use crate::sstable::footer::{BlockHandle, FORMAT_VERSION, Footer, IndexEntry};
use crate::sstable::properties::TableProperties;
use crate::types::ValueType;

/// Serializes entries into a table file.
///
/// Knows the file layout but not the writer contract: callers must feed
/// point entries in comparator order ([`SstFileWriter`] checks that).
///
/// Build process:
/// 1. Point entries fill data blocks; a full block is written out with
///    its checksum trailer and gets an index entry
/// 2. Range tombstones collect in their own block
/// 3. finish() flushes the last data block, then the range deletion,
///    properties and index blocks, the footer, and fsyncs
///
/// [`SstFileWriter`]: crate::sstable::writer::SstFileWriter
pub struct TableBuilder {
    /// Current data block being filled with entries.
    block_builder: BlockBuilder,
    range_del_block: BlockBuilder,
    /// Index entries: one per flushed data block.
    index_entries: Vec<IndexEntry>,
    /// Tracks current write position in the file.
    offset: u64,
    writer: BufWriter<File>,
    block_size: usize,
    checksum_type: ChecksumType,
    /// Last key added to the current block (needed for index entry).
    last_key_in_block: Vec<u8>,
    props: TableProperties,
}

impl TableBuilder {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path, options: &Options) -> Result<Self> {
        let file = File::create(path)?;
        Ok(TableBuilder {
            block_builder: BlockBuilder::new(options.block_size),
            range_del_block: BlockBuilder::new(usize::MAX),
            index_entries: Vec::new(),
            offset: 0,
            writer: BufWriter::new(file),
            block_size: options.block_size,
            checksum_type: options.checksum,
            last_key_in_block: Vec::new(),
            props: TableProperties {
                comparator_name: options.comparator.name().to_string(),
                ..TableProperties::default()
            },
        })
    }

    /// Add a point entry.
    pub fn add(&mut self, value_type: ValueType, key: &[u8], value: &[u8]) -> Result<()> {
        if self.props.num_entries == 0 {
            self.props.smallest_key = key.to_vec();
        }
        self.props.largest_key = key.to_vec();
        self.props.num_entries += 1;
        self.props.raw_key_size += key.len() as u64;
        self.props.raw_value_size += value.len() as u64;
        match value_type {
            ValueType::Delete => self.props.num_deletions += 1,
            ValueType::Merge => self.props.num_merge_operands += 1,
            _ => {}
        }

        if !self.block_builder.add(value_type, key, value) {
            // Block is full: flush it, then add to a fresh block
            self.flush_block()?;
            self.block_builder.add(value_type, key, value);
        }
        self.last_key_in_block.clear();
        self.last_key_in_block.extend_from_slice(key);
        Ok(())
    }

    /// Record a `[start, end)` range tombstone.
    pub fn add_range_deletion(&mut self, start: &[u8], end: &[u8]) {
        self.props.num_range_deletions += 1;
        self.range_del_block.add(ValueType::RangeDeletion, start, end);
    }

    pub fn num_entries(&self) -> u64 {
        self.props.num_entries
    }

    pub fn num_range_deletions(&self) -> u64 {
        self.props.num_range_deletions
    }

    /// Bytes handed to the file so far (buffered or not).
    pub fn file_size(&self) -> u64 {
        self.offset
    }

    /// Write `contents` followed by its checksum trailer.
    fn write_block(&mut self, contents: &[u8]) -> Result<BlockHandle> {
        let handle = BlockHandle {
            offset: self.offset,
            size: contents.len() as u64,
        };
        let mut trailer = Vec::with_capacity(checksum::TRAILER_SIZE);
        put_u32(&mut trailer, checksum::compute(self.checksum_type, contents));

        self.writer.write_all(contents)?;
        self.writer.write_all(&trailer)?;
        self.offset += (contents.len() + trailer.len()) as u64;
        Ok(handle)
    }

    /// Flush the current data block to disk and record an index entry.
    fn flush_block(&mut self) -> Result<()> {
        if self.block_builder.is_empty() {
            return Ok(());
        }

        let full = std::mem::replace(&mut self.block_builder, BlockBuilder::new(self.block_size));
        let contents = full.build();
        let handle = self.write_block(&contents)?;

        self.props.num_data_blocks += 1;
        self.props.data_size += handle.size + checksum::TRAILER_SIZE as u64;
        self.index_entries.push(IndexEntry {
            last_key: std::mem::take(&mut self.last_key_in_block),
            handle,
        });
        Ok(())
    }

    /// Finalize the table. Returns the total file size.
    pub fn finish(mut self) -> Result<u64> {
        // 1. Flush the last data block
        self.flush_block()?;

        // 2. Range deletion block (present even when empty)
        let range_dels = std::mem::replace(&mut self.range_del_block, BlockBuilder::new(0));
        let range_del_handle = self.write_block(&range_dels.build())?;

        // 3. Properties block
        let props = self.props.encode();
        let properties_handle = self.write_block(&props)?;

        // 4. Index block
        let mut index_data = Vec::new();
        for entry in &self.index_entries {
            entry.encode_to(&mut index_data);
        }
        let index_handle = self.write_block(&index_data)?;

        // 5. Footer
        let footer = Footer {
            index_handle,
            range_del_handle,
            properties_handle,
            checksum_type: self.checksum_type,
            format_version: FORMAT_VERSION,
        };
        self.writer.write_all(&footer.encode())?;
        self.offset += Footer::SIZE as u64;

        // 6. Flush buffer + fsync
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;

        Ok(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn file_ends_with_valid_footer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sst");

        let mut builder = TableBuilder::create(&path, &Options::default()).unwrap();
        for i in 0..50u32 {
            let key = format!("k{:04}", i);
            builder.add(ValueType::Put, key.as_bytes(), b"v").unwrap();
        }
        let size = builder.finish().unwrap();

        let buf = fs::read(&path).unwrap();
        assert_eq!(buf.len() as u64, size);
        let footer = Footer::decode(&buf[buf.len() - Footer::SIZE..]).unwrap();
        assert!(footer.index_handle.offset > 0);
        assert!(footer.index_handle.size > 0);
        assert_eq!(footer.checksum_type, ChecksumType::Crc32);
    }

    #[test]
    fn multiple_blocks_produced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sst");

        // Tiny block size forces a block per entry or two
        let options = Options {
            block_size: 64,
            ..Options::default()
        };
        let mut builder = TableBuilder::create(&path, &options).unwrap();
        for i in 0..20u32 {
            let key = format!("key_{:05}", i);
            let val = format!("value_{:05}", i);
            builder.add(ValueType::Put, key.as_bytes(), val.as_bytes()).unwrap();
        }
        assert_eq!(builder.num_entries(), 20);
        builder.finish().unwrap();

        let buf = fs::read(&path).unwrap();
        let footer = Footer::decode(&buf[buf.len() - Footer::SIZE..]).unwrap();
        // 20 index entries of 4 + 9 + 16 bytes each
        assert_eq!(footer.index_handle.size, 20 * 29);
    }

    #[test]
    fn range_deletions_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sst");

        let mut builder = TableBuilder::create(&path, &Options::default()).unwrap();
        builder.add_range_deletion(b"a", b"m");
        builder.add_range_deletion(b"p", b"z");
        assert_eq!(builder.num_entries(), 0);
        assert_eq!(builder.num_range_deletions(), 2);
        builder.finish().unwrap();

        let buf = fs::read(&path).unwrap();
        let footer = Footer::decode(&buf[buf.len() - Footer::SIZE..]).unwrap();
        assert_eq!(footer.index_handle.size, 0);
        assert_eq!(footer.range_del_handle.offset, 0);
        assert!(footer.range_del_handle.size > 0);
    }
}
