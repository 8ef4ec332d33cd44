use crate::error::{Error, Result};

/// Raw key bytes.
pub type Key = Vec<u8>;

/// Raw value bytes.
pub type Value = Vec<u8>;

/// Kind of an entry stored in a table file.
///
/// Deletes write a tombstone: the key isn't removed, it's marked as deleted
/// so that older versions in other files stay shadowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// A normal put operation.
    Put = 0x01,
    /// A point delete (tombstone marker).
    Delete = 0x02,
    /// A merge-operator operand.
    Merge = 0x03,
    /// A range tombstone: key is the inclusive start, value the exclusive end.
    RangeDeletion = 0x04,
}

impl ValueType {
    pub(crate) fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x01 => Ok(ValueType::Put),
            0x02 => Ok(ValueType::Delete),
            0x03 => Ok(ValueType::Merge),
            0x04 => Ok(ValueType::RangeDeletion),
            _ => Err(Error::corruption(format!("invalid value type: {byte}"))),
        }
    }
}

/// One decoded entry of a table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub value_type: ValueType,
    pub key: Key,
    pub value: Value,
}

/// A half-open `[start, end)` deletion interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeTombstone {
    pub start: Key,
    pub end: Key,
}
