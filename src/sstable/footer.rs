use crate::checksum;
use crate::coding::{Decoder, put_bytes, put_u32, put_u64};
use crate::error::{Error, Result};
use crate::options::ChecksumType;

/// Magic number to identify table files.
pub const SST_MAGIC: u64 = 0x5353_545F_4841_524E; // "SST_HARN"

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

/// Location of a block in the file. `size` excludes the checksum trailer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockHandle {
    pub offset: u64,
    pub size: u64,
}

impl BlockHandle {
    pub const SIZE: usize = 16;

    pub fn encode_to(&self, buf: &mut Vec<u8>) {
        put_u64(buf, self.offset);
        put_u64(buf, self.size);
    }

    pub fn decode_from(d: &mut Decoder<'_>) -> Result<Self> {
        Ok(BlockHandle {
            offset: d.u64("block handle offset")?,
            size: d.u64("block handle size")?,
        })
    }

    /// Offset just past this block's trailer, or None on overflow.
    pub fn end_with_trailer(&self) -> Option<u64> {
        self.offset
            .checked_add(self.size)?
            .checked_add(checksum::TRAILER_SIZE as u64)
    }
}

/// An entry in the table's index block.
/// Maps a data block's last key to its location in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Last (largest) key in the block.
    pub last_key: Vec<u8>,
    pub handle: BlockHandle,
}

impl IndexEntry {
    /// Format: [key_len(4B)][key][offset(8B)][size(8B)]
    pub fn encode_to(&self, buf: &mut Vec<u8>) {
        put_bytes(buf, &self.last_key);
        self.handle.encode_to(buf);
    }

    pub fn decode_from(d: &mut Decoder<'_>) -> Result<Self> {
        let last_key = d.bytes("index entry key")?.to_vec();
        let handle = BlockHandle::decode_from(d)?;
        Ok(IndexEntry { last_key, handle })
    }
}

/// The footer sits at the end of the table file.
/// It tells the reader where to find every non-data block.
///
/// ```text
/// ┌──────────────────────────────────────┐
/// │ Index block handle (16B)             │
/// │ Range deletion block handle (16B)    │
/// │ Properties block handle (16B)        │
/// │ Checksum type (1B)                   │
/// │ Format version (4B)                  │
/// │ Footer checksum (4B)                 │
/// │ Magic number (8B)                    │
/// └──────────────────────────────────────┘
/// ```
///
/// The footer checksum covers every byte before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub index_handle: BlockHandle,
    pub range_del_handle: BlockHandle,
    pub properties_handle: BlockHandle,
    pub checksum_type: ChecksumType,
    pub format_version: u32,
}

impl Footer {
    /// Size of the footer in bytes (fixed).
    pub const SIZE: usize = BlockHandle::SIZE * 3 + 1 + 4 + 4 + 8;

    const CHECKSUMMED_LEN: usize = BlockHandle::SIZE * 3 + 1 + 4;

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        self.index_handle.encode_to(&mut buf);
        self.range_del_handle.encode_to(&mut buf);
        self.properties_handle.encode_to(&mut buf);
        buf.push(self.checksum_type as u8);
        put_u32(&mut buf, self.format_version);
        let sum = checksum::compute(self.checksum_type, &buf);
        put_u32(&mut buf, sum);
        put_u64(&mut buf, SST_MAGIC);
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() != Self::SIZE {
            return Err(Error::corruption(format!(
                "footer must be {} bytes, got {}",
                Self::SIZE,
                data.len()
            )));
        }
        let mut d = Decoder::new(data);
        let index_handle = BlockHandle::decode_from(&mut d)?;
        let range_del_handle = BlockHandle::decode_from(&mut d)?;
        let properties_handle = BlockHandle::decode_from(&mut d)?;
        let checksum_byte = d.u8("footer checksum type")?;
        let format_version = d.u32("footer format version")?;
        let stored_sum = d.u32("footer checksum")?;
        let magic = d.u64("footer magic")?;

        if magic != SST_MAGIC {
            return Err(Error::corruption(format!(
                "bad magic: expected {SST_MAGIC:#x}, got {magic:#x}"
            )));
        }
        let checksum_type = ChecksumType::from_u8(checksum_byte)?;
        checksum::verify(
            checksum_type,
            &data[..Self::CHECKSUMMED_LEN],
            stored_sum,
            "footer",
        )?;
        if format_version != FORMAT_VERSION {
            return Err(Error::corruption(format!(
                "unsupported format version {format_version}"
            )));
        }

        Ok(Footer {
            index_handle,
            range_del_handle,
            properties_handle,
            checksum_type,
            format_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Footer {
        Footer {
            index_handle: BlockHandle { offset: 4096, size: 512 },
            range_del_handle: BlockHandle { offset: 4000, size: 96 },
            properties_handle: BlockHandle { offset: 4612, size: 120 },
            checksum_type: ChecksumType::Crc32,
            format_version: FORMAT_VERSION,
        }
    }

    #[test]
    fn footer_roundtrip() {
        let encoded = sample().encode();
        assert_eq!(encoded.len(), Footer::SIZE);
        assert_eq!(Footer::decode(&encoded).unwrap(), sample());
    }

    #[test]
    fn footer_bad_magic() {
        let mut encoded = sample().encode();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;
        let err = Footer::decode(&encoded).unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn footer_flipped_handle_fails_checksum() {
        let mut encoded = sample().encode();
        encoded[3] ^= 0x10;
        let err = Footer::decode(&encoded).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn footer_too_short() {
        assert!(Footer::decode(&[0u8; 10]).is_err());
    }

    #[test]
    fn index_entry_roundtrip() {
        let entry = IndexEntry {
            last_key: b"cherry".to_vec(),
            handle: BlockHandle { offset: 0, size: 4096 },
        };
        let mut buf = Vec::new();
        entry.encode_to(&mut buf);
        let mut d = Decoder::new(&buf);
        assert_eq!(IndexEntry::decode_from(&mut d).unwrap(), entry);
        assert!(d.is_empty());
    }
}
