use arbitrary::{Arbitrary, Unstructured};
use thiserror::Error;

use crate::comparator::Comparator;
use crate::types::{Key, Value};

/// Mutation kinds the harness knows how to replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Put = 0,
    Merge = 1,
    Delete = 2,
    DeleteRange = 3,
}

impl OpKind {
    pub const ALL: [OpKind; 4] = [OpKind::Put, OpKind::Merge, OpKind::Delete, OpKind::DeleteRange];
}

/// A wire tag outside the [`OpKind`] enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported operation kind {0}")]
pub struct UnsupportedOpKind(pub i32);

impl TryFrom<i32> for OpKind {
    type Error = UnsupportedOpKind;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(OpKind::Put),
            1 => Ok(OpKind::Merge),
            2 => Ok(OpKind::Delete),
            3 => Ok(OpKind::DeleteRange),
            other => Err(UnsupportedOpKind(other)),
        }
    }
}

impl From<OpKind> for i32 {
    fn from(kind: OpKind) -> i32 {
        kind as i32
    }
}

/// One mutation request.
///
/// `kind` keeps the raw wire tag so a generator emitting a tag this build
/// doesn't know stays representable; [`Operation::op_kind`] decodes it.
/// For `DeleteRange`, `key` is the inclusive lower bound and `value` the
/// exclusive upper bound. `value` is unused for `Delete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: i32,
    pub key: Key,
    pub value: Value,
}

impl Operation {
    pub fn new(kind: OpKind, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        Operation {
            kind: kind.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn put(key: impl Into<Key>, value: impl Into<Value>) -> Self {
        Self::new(OpKind::Put, key, value)
    }

    pub fn merge(key: impl Into<Key>, value: impl Into<Value>) -> Self {
        Self::new(OpKind::Merge, key, value)
    }

    pub fn delete(key: impl Into<Key>) -> Self {
        Self::new(OpKind::Delete, key, Vec::new())
    }

    pub fn delete_range(begin: impl Into<Key>, end: impl Into<Key>) -> Self {
        Self::new(OpKind::DeleteRange, begin, end)
    }

    /// An operation carrying an arbitrary wire tag.
    pub fn with_raw_kind(kind: i32, key: impl Into<Key>, value: impl Into<Value>) -> Self {
        Operation {
            kind,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn op_kind(&self) -> Result<OpKind, UnsupportedOpKind> {
        OpKind::try_from(self.kind)
    }
}

impl<'a> Arbitrary<'a> for Operation {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        // Mostly known kinds; now and then any tag at all.
        let kind = if u.ratio(1u8, 64u8)? {
            i32::arbitrary(u)?
        } else {
            u.int_in_range(0..=3)?
        };
        Ok(Operation {
            kind,
            key: Vec::arbitrary(u)?,
            value: Vec::arbitrary(u)?,
        })
    }
}

/// An ordered list of operations, as generated or after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Arbitrary)]
pub struct OperationSequence {
    operations: Vec<Operation>,
}

impl OperationSequence {
    pub fn new(operations: Vec<Operation>) -> Self {
        OperationSequence { operations }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operations_mut(&mut self) -> &mut Vec<Operation> {
        &mut self.operations
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Sort and dedup in place. See [`normalize`](crate::harness::normalize::normalize).
    pub fn normalize(&mut self, cmp: &dyn Comparator) {
        super::normalize::normalize(&mut self.operations, cmp);
    }
}

impl From<Vec<Operation>> for OperationSequence {
    fn from(operations: Vec<Operation>) -> Self {
        OperationSequence::new(operations)
    }
}

impl FromIterator<Operation> for OperationSequence {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        OperationSequence::new(iter.into_iter().collect())
    }
}
