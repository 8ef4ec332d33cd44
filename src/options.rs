use std::fmt;

use crate::comparator::{Comparator, bytewise_comparator};
use crate::error::{Error, Result};

/// Checksum algorithm used for block trailers and the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumType {
    /// CRC-32 (IEEE).
    Crc32 = 0x01,
    /// Low 32 bits of XXH3-64.
    Xxh3 = 0x02,
}

impl ChecksumType {
    pub(crate) fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x01 => Ok(ChecksumType::Crc32),
            0x02 => Ok(ChecksumType::Xxh3),
            _ => Err(Error::corruption(format!("unknown checksum type: {byte}"))),
        }
    }
}

/// Engine configuration shared by the writer and the reader.
#[derive(Clone, Copy)]
pub struct Options {
    /// Key order. Must match between writer and reader.
    pub comparator: &'static dyn Comparator,
    /// Target uncompressed size of a data block.
    pub block_size: usize,
    /// Checksum written after every block. The reader takes it from the footer.
    pub checksum: ChecksumType,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            comparator: bytewise_comparator(),
            block_size: 4096,
            checksum: ChecksumType::Crc32,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("comparator", &self.comparator.name())
            .field("block_size", &self.block_size)
            .field("checksum", &self.checksum)
            .finish()
    }
}
