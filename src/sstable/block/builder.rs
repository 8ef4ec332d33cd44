use crate::coding::put_u32;
use crate::types::ValueType;

/// Size of the fixed per-entry header: kind + key_len + val_len.
pub const ENTRY_HEADER_SIZE: usize = 1 + 4 + 4;

/// Accumulates entries and serializes them into a block.
///
/// On-disk layout of a block (before the checksum trailer):
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │ Entry 0: [kind(1B)][key_len(4B)][val_len(4B)][key][value] │
/// │ Entry 1: ...                                              │
/// │ Entry N: ...                                              │
/// ├──────────────────────────────────────────────────────────┤
/// │ Offset array: [off_0(4B)][off_1(4B)]...[off_N(4B)]        │
/// │ Num entries (4B)                                          │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// The offset array at the end enables binary search without parsing
/// every entry.
pub struct BlockBuilder {
    data: Vec<u8>,
    offsets: Vec<u32>,
    block_size: usize,
}

impl BlockBuilder {
    /// Create a new block builder with target block size.
    pub fn new(block_size: usize) -> Self {
        BlockBuilder {
            data: Vec::new(),
            offsets: Vec::new(),
            block_size,
        }
    }

    /// Add an entry to the block.
    /// Returns false if the block is full (entry doesn't fit).
    /// First entry is always accepted even if it exceeds block_size.
    pub fn add(&mut self, value_type: ValueType, key: &[u8], value: &[u8]) -> bool {
        let entry_size = ENTRY_HEADER_SIZE + key.len() + value.len() + 4;

        if !self.offsets.is_empty() && self.estimated_size() + entry_size > self.block_size {
            return false;
        }

        self.offsets.push(self.data.len() as u32);

        self.data.push(value_type as u8);
        put_u32(&mut self.data, key.len() as u32);
        put_u32(&mut self.data, value.len() as u32);
        self.data.extend_from_slice(key);
        self.data.extend_from_slice(value);

        true
    }

    /// Finalize the block: append offset array and entry count.
    pub fn build(self) -> Vec<u8> {
        let mut block = self.data;
        for offset in &self.offsets {
            put_u32(&mut block, *offset);
        }
        put_u32(&mut block, self.offsets.len() as u32);
        block
    }

    /// Current estimated size of the block (data + offsets + count).
    pub fn estimated_size(&self) -> usize {
        self.data.len() + self.offsets.len() * 4 + 4
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
