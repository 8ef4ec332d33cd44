use std::cmp::Ordering;

use crate::comparator::Comparator;
use crate::harness::op::Operation;

/// Establish the writer's input contract: keys unique and strictly ascending.
///
/// Stable-sorts by key under `cmp`, then keeps only the first operation of
/// each run of equal keys. Dropped operations are discarded whole, kind and
/// value included; nothing is merged. Because the sort is stable, the
/// survivor for a key is the one that appeared first in the input.
///
/// Total over every input, empty included, and idempotent.
pub fn normalize(ops: &mut Vec<Operation>, cmp: &dyn Comparator) {
    ops.sort_by(|a, b| cmp.compare(&a.key, &b.key));
    ops.dedup_by(|later, kept| cmp.compare(&later.key, &kept.key) == Ordering::Equal);
}

/// Whether every adjacent pair is strictly ascending under `cmp`.
pub fn is_normalized(ops: &[Operation], cmp: &dyn Comparator) -> bool {
    ops.windows(2)
        .all(|pair| cmp.compare(&pair[0].key, &pair[1].key) == Ordering::Less)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{bytewise_comparator, reverse_bytewise_comparator};

    #[test]
    fn empty_stays_empty() {
        let mut ops = Vec::new();
        normalize(&mut ops, bytewise_comparator());
        assert!(ops.is_empty());
        assert!(is_normalized(&ops, bytewise_comparator()));
    }

    #[test]
    fn first_of_equal_keys_wins() {
        let mut ops = vec![
            Operation::put("k", "first"),
            Operation::put("a", "x"),
            Operation::delete("k"),
            Operation::merge("k", "third"),
        ];
        normalize(&mut ops, bytewise_comparator());
        assert_eq!(ops, vec![Operation::put("a", "x"), Operation::put("k", "first")]);
    }

    #[test]
    fn order_follows_comparator() {
        let mut ops = vec![
            Operation::put("a", "1"),
            Operation::put("c", "3"),
            Operation::put("b", "2"),
        ];
        normalize(&mut ops, reverse_bytewise_comparator());
        let keys: Vec<&[u8]> = ops.iter().map(|op| op.key.as_slice()).collect();
        assert_eq!(keys, vec![b"c".as_slice(), b"b", b"a"]);
        assert!(is_normalized(&ops, reverse_bytewise_comparator()));
        assert!(!is_normalized(&ops, bytewise_comparator()));
    }
}
