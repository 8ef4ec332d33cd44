use std::cmp::Ordering;

use crate::coding::Decoder;
use crate::comparator::Comparator;
use crate::error::{Error, Result};
use crate::sstable::block::builder::ENTRY_HEADER_SIZE;
use crate::types::{Entry, ValueType};

/// A borrowed view of one entry inside a decoded block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEntry<'a> {
    pub value_type: ValueType,
    pub key: &'a [u8],
    pub value: &'a [u8],
}

impl BlockEntry<'_> {
    pub fn to_entry(&self) -> Entry {
        Entry {
            value_type: self.value_type,
            key: self.key.to_vec(),
            value: self.value.to_vec(),
        }
    }
}

/// A decoded block. Owns the raw bytes; entries are parsed on access.
///
/// `decode` validates the whole layout up front, so accessors never see
/// an out-of-bounds offset afterwards. Entry kinds are kept from that pass.
#[derive(Debug)]
pub struct Block {
    data: Vec<u8>,
    offsets: Vec<u32>,
    kinds: Vec<ValueType>,
}

impl Block {
    /// Parse the offset array and check every entry lies inside the data region.
    pub fn decode(data: Vec<u8>) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::corruption("block too short for entry count"));
        }
        let count_at = data.len() - 4;
        let num_entries = Decoder::new(&data[count_at..]).u32("block entry count")? as usize;

        let offsets_len = num_entries
            .checked_mul(4)
            .filter(|&len| len <= count_at)
            .ok_or_else(|| Error::corruption("block offset array exceeds block"))?;
        let entries_end = count_at - offsets_len;

        let mut d = Decoder::new(&data[entries_end..count_at]);
        let mut offsets = Vec::with_capacity(num_entries);
        for _ in 0..num_entries {
            offsets.push(d.u32("block offset")?);
        }

        let mut kinds = Vec::with_capacity(num_entries);
        let mut expected = 0usize;
        for &offset in &offsets {
            if offset as usize != expected {
                return Err(Error::corruption(format!(
                    "block offset {offset} out of sequence (expected {expected})"
                )));
            }
            let mut d = Decoder::new(&data[expected..entries_end]);
            kinds.push(ValueType::from_u8(d.u8("entry kind")?)?);
            let key_len = d.u32("entry key length")? as usize;
            let val_len = d.u32("entry value length")? as usize;
            d.take(key_len, "entry key")?;
            d.take(val_len, "entry value")?;
            expected += ENTRY_HEADER_SIZE + key_len + val_len;
        }
        if expected != entries_end {
            return Err(Error::corruption("trailing bytes after last block entry"));
        }

        Ok(Block {
            data,
            offsets,
            kinds,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Entry at position `idx`.
    ///
    /// # Panics
    /// Panics if `idx >= len()`.
    pub fn entry(&self, idx: usize) -> BlockEntry<'_> {
        let start = self.offsets[idx] as usize;
        let header = &self.data[start..start + ENTRY_HEADER_SIZE];
        let key_len = u32::from_le_bytes([header[1], header[2], header[3], header[4]]) as usize;
        let val_len = u32::from_le_bytes([header[5], header[6], header[7], header[8]]) as usize;
        let key_start = start + ENTRY_HEADER_SIZE;
        let val_start = key_start + key_len;
        BlockEntry {
            value_type: self.kinds[idx],
            key: &self.data[key_start..val_start],
            value: &self.data[val_start..val_start + val_len],
        }
    }

    /// Binary search for `key` using `cmp`. Entries must be sorted under it.
    pub fn get(&self, cmp: &dyn Comparator, key: &[u8]) -> Option<BlockEntry<'_>> {
        let mut lo = 0usize;
        let mut hi = self.offsets.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let entry = self.entry(mid);
            match cmp.compare(entry.key, key) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Some(entry),
            }
        }
        None
    }

    /// Iterate entries in stored order.
    pub fn iter(&self) -> impl Iterator<Item = BlockEntry<'_>> + '_ {
        (0..self.len()).map(move |idx| self.entry(idx))
    }
}
