use xxhash_rust::xxh3::xxh3_64;

use crate::error::{Error, Result};
use crate::options::ChecksumType;

/// Size of the checksum trailer that follows every block.
pub const TRAILER_SIZE: usize = 4;

/// Compute the 32-bit checksum of `data`.
pub fn compute(kind: ChecksumType, data: &[u8]) -> u32 {
    match kind {
        ChecksumType::Crc32 => crc32fast::hash(data),
        ChecksumType::Xxh3 => xxh3_64(data) as u32,
    }
}

/// Compare a stored checksum against one recomputed over `data`.
///
/// `what` names the checked region in the corruption message.
pub fn verify(kind: ChecksumType, data: &[u8], stored: u32, what: &str) -> Result<()> {
    let computed = compute(kind, data);
    if computed != stored {
        return Err(Error::corruption(format!(
            "{what} checksum mismatch: stored {stored:#010x}, computed {computed:#010x}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithms_disagree() {
        let data = b"some block contents";
        assert_ne!(
            compute(ChecksumType::Crc32, data),
            compute(ChecksumType::Xxh3, data)
        );
    }

    #[test]
    fn verify_detects_flip() {
        let mut data = b"payload".to_vec();
        let sum = compute(ChecksumType::Crc32, &data);
        assert!(verify(ChecksumType::Crc32, &data, sum, "block").is_ok());
        data[0] ^= 0x01;
        assert!(verify(ChecksumType::Crc32, &data, sum, "block").is_err());
    }
}
