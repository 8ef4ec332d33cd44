use crate::coding::{Decoder, put_bytes, put_u64};
use crate::error::{Error, Result};

/// Summary statistics recorded in the properties block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableProperties {
    /// Point entries (puts, merges and deletes).
    pub num_entries: u64,
    pub num_deletions: u64,
    pub num_merge_operands: u64,
    pub num_range_deletions: u64,
    pub num_data_blocks: u64,
    pub raw_key_size: u64,
    pub raw_value_size: u64,
    /// Bytes of data blocks including trailers.
    pub data_size: u64,
    /// Smallest point key, empty when the table has none.
    pub smallest_key: Vec<u8>,
    /// Largest point key, empty when the table has none.
    pub largest_key: Vec<u8>,
    pub comparator_name: String,
}

impl TableProperties {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        put_u64(&mut buf, self.num_entries);
        put_u64(&mut buf, self.num_deletions);
        put_u64(&mut buf, self.num_merge_operands);
        put_u64(&mut buf, self.num_range_deletions);
        put_u64(&mut buf, self.num_data_blocks);
        put_u64(&mut buf, self.raw_key_size);
        put_u64(&mut buf, self.raw_value_size);
        put_u64(&mut buf, self.data_size);
        put_bytes(&mut buf, &self.smallest_key);
        put_bytes(&mut buf, &self.largest_key);
        put_bytes(&mut buf, self.comparator_name.as_bytes());
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut d = Decoder::new(data);
        let props = TableProperties {
            num_entries: d.u64("num_entries")?,
            num_deletions: d.u64("num_deletions")?,
            num_merge_operands: d.u64("num_merge_operands")?,
            num_range_deletions: d.u64("num_range_deletions")?,
            num_data_blocks: d.u64("num_data_blocks")?,
            raw_key_size: d.u64("raw_key_size")?,
            raw_value_size: d.u64("raw_value_size")?,
            data_size: d.u64("data_size")?,
            smallest_key: d.bytes("smallest_key")?.to_vec(),
            largest_key: d.bytes("largest_key")?.to_vec(),
            comparator_name: String::from_utf8(d.bytes("comparator_name")?.to_vec())
                .map_err(|_| Error::corruption("comparator name is not UTF-8"))?,
        };
        if !d.is_empty() {
            return Err(Error::corruption(format!(
                "{} trailing bytes in properties block",
                data.len() - d.position()
            )));
        }
        Ok(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_roundtrip() {
        let props = TableProperties {
            num_entries: 3,
            num_deletions: 1,
            num_merge_operands: 1,
            num_range_deletions: 2,
            num_data_blocks: 1,
            raw_key_size: 9,
            raw_value_size: 12,
            data_size: 77,
            smallest_key: b"a".to_vec(),
            largest_key: b"c".to_vec(),
            comparator_name: "sst.BytewiseComparator".into(),
        };
        assert_eq!(TableProperties::decode(&props.encode()).unwrap(), props);
    }

    #[test]
    fn trailing_garbage_rejected() {
        let mut encoded = TableProperties::default().encode();
        encoded.push(0);
        assert!(TableProperties::decode(&encoded).is_err());
    }
}
