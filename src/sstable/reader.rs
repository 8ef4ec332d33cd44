use std::cell::RefCell;
use std::cmp::Ordering;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::checksum;
use crate::coding::Decoder;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::sstable::block::Block;
use crate::sstable::footer::{BlockHandle, Footer, IndexEntry};
use crate::sstable::properties::TableProperties;
use crate::types::{Entry, RangeTombstone};

/// An opened table file.
///
/// On open:
/// 1. Read footer (last `Footer::SIZE` bytes) → block handles + checksum type
/// 2. Read the properties block, check the comparator matches
/// 3. Read and parse the index block into memory
///
/// Metadata blocks are checksummed as they are loaded. Data blocks are
/// read on demand; `verify_checksum` reads all of them.
pub struct SstFileReader {
    options: Options,
    path: PathBuf,
    /// Wrapped in RefCell to allow seeking through a shared reference.
    file: RefCell<File>,
    /// Where the footer starts; every block must end before it.
    footer_offset: u64,
    footer: Footer,
    props: TableProperties,
    index: Vec<IndexEntry>,
}

impl SstFileReader {
    pub fn open(options: Options, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path)?;

        let file_size = file.metadata()?.len();
        if file_size < Footer::SIZE as u64 {
            return Err(Error::corruption(format!(
                "file is {file_size} bytes, too short to contain footer"
            )));
        }
        let footer_offset = file_size - Footer::SIZE as u64;
        file.seek(SeekFrom::Start(footer_offset))?;
        let mut footer_buf = vec![0u8; Footer::SIZE];
        file.read_exact(&mut footer_buf)?;
        let footer = Footer::decode(&footer_buf)?;

        let mut reader = SstFileReader {
            options,
            path: path.to_path_buf(),
            file: RefCell::new(file),
            footer_offset,
            footer,
            props: TableProperties::default(),
            index: Vec::new(),
        };

        let props = reader.read_block(reader.footer.properties_handle, "properties block")?;
        reader.props = TableProperties::decode(&props)?;
        let expected = reader.options.comparator.name();
        if reader.props.comparator_name != expected {
            return Err(Error::invalid_argument(format!(
                "table was written with comparator {}, opened with {expected}",
                reader.props.comparator_name
            )));
        }

        let index = reader.read_block(reader.footer.index_handle, "index block")?;
        let mut d = Decoder::new(&index);
        while !d.is_empty() {
            reader.index.push(IndexEntry::decode_from(&mut d)?);
        }

        debug!(
            path = %reader.path.display(),
            data_blocks = reader.index.len(),
            entries = reader.props.num_entries,
            "opened table reader"
        );
        Ok(reader)
    }

    /// Read a block and check its trailer.
    fn read_block(&self, handle: BlockHandle, what: &str) -> Result<Vec<u8>> {
        let end = handle
            .end_with_trailer()
            .filter(|&end| end <= self.footer_offset)
            .ok_or_else(|| {
                Error::corruption(format!(
                    "{what} at {}+{} extends past end of data",
                    handle.offset, handle.size
                ))
            })?;

        let mut buf = vec![0u8; (end - handle.offset) as usize];
        {
            let mut file = self.file.borrow_mut();
            file.seek(SeekFrom::Start(handle.offset))?;
            file.read_exact(&mut buf)?;
        }

        let split = handle.size as usize;
        let mut d = Decoder::new(&buf[split..]);
        let stored = d.u32("block trailer")?;
        checksum::verify(self.footer.checksum_type, &buf[..split], stored, what)?;
        buf.truncate(split);
        Ok(buf)
    }

    fn read_data_block(&self, idx: usize) -> Result<Block> {
        let handle = self.index[idx].handle;
        Block::decode(self.read_block(handle, &format!("data block {idx}"))?)
    }

    /// Re-read every block in the file and check its stored checksum.
    pub fn verify_checksum(&self) -> Result<()> {
        for (idx, entry) in self.index.iter().enumerate() {
            self.read_block(entry.handle, &format!("data block {idx}"))?;
        }
        self.read_block(self.footer.range_del_handle, "range deletion block")?;
        self.read_block(self.footer.properties_handle, "properties block")?;
        self.read_block(self.footer.index_handle, "index block")?;
        debug!(path = %self.path.display(), blocks = self.index.len() + 3, "checksums verified");
        Ok(())
    }

    /// Count entries in every block and compare against the properties.
    pub fn verify_num_entries(&self) -> Result<()> {
        let mut counted = 0u64;
        for idx in 0..self.index.len() {
            counted += self.read_data_block(idx)?.len() as u64;
        }
        if counted != self.props.num_entries {
            return Err(Error::corruption(format!(
                "table properties claim {} entries, data blocks hold {counted}",
                self.props.num_entries
            )));
        }

        let range_dels = self.range_deletions()?.len() as u64;
        if range_dels != self.props.num_range_deletions {
            return Err(Error::corruption(format!(
                "table properties claim {} range deletions, block holds {range_dels}",
                self.props.num_range_deletions
            )));
        }
        Ok(())
    }

    /// Point lookup through the index.
    pub fn get(&self, key: &[u8]) -> Result<Option<Entry>> {
        let cmp = self.options.comparator;
        // First block whose last_key >= key
        let block_idx = self
            .index
            .partition_point(|entry| cmp.compare(&entry.last_key, key) == Ordering::Less);
        if block_idx >= self.index.len() {
            return Ok(None);
        }
        let block = self.read_data_block(block_idx)?;
        Ok(block.get(cmp, key).map(|e| e.to_entry()))
    }

    /// Iterate point entries in key order.
    pub fn iter(&self) -> TableIterator<'_> {
        TableIterator {
            reader: self,
            next_block: 0,
            block: None,
            pos: 0,
        }
    }

    /// All range tombstones in the order they were written.
    pub fn range_deletions(&self) -> Result<Vec<RangeTombstone>> {
        let data = self.read_block(self.footer.range_del_handle, "range deletion block")?;
        let block = Block::decode(data)?;
        Ok(block
            .iter()
            .map(|e| RangeTombstone {
                start: e.key.to_vec(),
                end: e.value.to_vec(),
            })
            .collect())
    }

    pub fn properties(&self) -> &TableProperties {
        &self.props
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Iterator over point entries. Yields an error and stops on a bad block.
pub struct TableIterator<'a> {
    reader: &'a SstFileReader,
    next_block: usize,
    block: Option<Block>,
    pos: usize,
}

impl Iterator for TableIterator<'_> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(block) = &self.block {
                if self.pos < block.len() {
                    let entry = block.entry(self.pos).to_entry();
                    self.pos += 1;
                    return Some(Ok(entry));
                }
            }
            if self.next_block >= self.reader.index.len() {
                return None;
            }
            match self.reader.read_data_block(self.next_block) {
                Ok(block) => {
                    self.block = Some(block);
                    self.pos = 0;
                    self.next_block += 1;
                }
                Err(e) => {
                    self.next_block = self.reader.index.len();
                    self.block = None;
                    return Some(Err(e));
                }
            }
        }
    }
}
