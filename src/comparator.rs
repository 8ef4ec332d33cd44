use std::cmp::Ordering;

/// Total order over user keys.
///
/// Defines what "ascending" means for the writer's input contract and for
/// every lookup in the reader. The name is persisted in the table
/// properties so a table can't be opened with a different order.
pub trait Comparator: Send + Sync {
    /// Stable identifier written into the table properties.
    fn name(&self) -> &'static str;

    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;
}

/// Lexicographic byte order. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytewiseComparator;

impl Comparator for BytewiseComparator {
    fn name(&self) -> &'static str {
        "sst.BytewiseComparator"
    }

    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }
}

/// Lexicographic byte order, reversed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseBytewiseComparator;

impl Comparator for ReverseBytewiseComparator {
    fn name(&self) -> &'static str {
        "sst.ReverseBytewiseComparator"
    }

    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        b.cmp(a)
    }
}

static BYTEWISE: BytewiseComparator = BytewiseComparator;
static REVERSE_BYTEWISE: ReverseBytewiseComparator = ReverseBytewiseComparator;

/// Shared instance of [`BytewiseComparator`].
pub fn bytewise_comparator() -> &'static dyn Comparator {
    &BYTEWISE
}

/// Shared instance of [`ReverseBytewiseComparator`].
pub fn reverse_bytewise_comparator() -> &'static dyn Comparator {
    &REVERSE_BYTEWISE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytewise_orders_prefix_first() {
        let cmp = bytewise_comparator();
        assert_eq!(cmp.compare(b"a", b"ab"), Ordering::Less);
        assert_eq!(cmp.compare(b"b", b"ab"), Ordering::Greater);
        assert_eq!(cmp.compare(b"", b""), Ordering::Equal);
        assert_eq!(cmp.compare(&[0xFF], &[0x00, 0x00]), Ordering::Greater);
    }

    #[test]
    fn reverse_flips_order() {
        let cmp = reverse_bytewise_comparator();
        assert_eq!(cmp.compare(b"a", b"b"), Ordering::Greater);
        assert_eq!(cmp.compare(b"b", b"a"), Ordering::Less);
        assert_ne!(cmp.name(), bytewise_comparator().name());
    }
}
