use std::fmt;
use std::sync::Arc;

/// Key that compares shared values by pointer identity.
///
/// Two `Identity` keys are equal only when they wrap the same allocation, so
/// a producer that hands out the same `Arc` twice is treated as "unchanged"
/// without comparing contents.
pub struct Identity<T: ?Sized>(Arc<T>);

impl<T: ?Sized> Identity<T> {
    pub fn of(value: &Arc<T>) -> Self {
        Identity(Arc::clone(value))
    }
}

impl<T: ?Sized> Clone for Identity<T> {
    fn clone(&self) -> Self {
        Identity(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for Identity<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Eq for Identity<T> {}

impl<T: ?Sized> fmt::Debug for Identity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

/// Single-slot memo cell.
///
/// Holds the last `(key, value)` pair. A lookup with an equal key returns the
/// cached `Arc` (pointer-identical to the previous result); any other key
/// recomputes and replaces the slot. Downstream memos can therefore key on
/// `Identity::of(&result)` and only recompute when this one did.
#[derive(Debug)]
pub struct Memo<K, V: ?Sized> {
    slot: Option<(K, Arc<V>)>,
    stats: MemoStats,
}

impl<K, V: ?Sized> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            slot: None,
            stats: MemoStats::default(),
        }
    }
}

impl<K: PartialEq, V: ?Sized> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> Arc<V>) -> Arc<V> {
        if let Some((cached_key, value)) = &self.slot
            && *cached_key == key
        {
            self.stats.hits += 1;
            return Arc::clone(value);
        }

        self.stats.misses += 1;
        let value = compute();
        self.slot = Some((key, Arc::clone(&value)));
        value
    }

    pub fn stats(&self) -> MemoStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Identity, Memo};

    #[test]
    fn identity_compares_pointers_not_contents() {
        let a: Arc<[u32]> = Arc::from(vec![1, 2, 3]);
        let b: Arc<[u32]> = Arc::from(vec![1, 2, 3]);
        assert_eq!(Identity::of(&a), Identity::of(&a));
        assert_ne!(Identity::of(&a), Identity::of(&b));
    }

    #[test]
    fn equal_key_returns_same_allocation() {
        let mut memo: Memo<u8, [u32]> = Memo::new();
        let first = memo.get_or_compute(8, || Arc::from(vec![1]));
        let second = memo.get_or_compute(8, || unreachable!("cached"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(memo.stats().hits, 1);
        assert_eq!(memo.stats().misses, 1);
    }

    #[test]
    fn key_change_recomputes() {
        let mut memo: Memo<u8, [u32]> = Memo::new();
        let a = memo.get_or_compute(8, || Arc::from(vec![1]));
        let b = memo.get_or_compute(9, || Arc::from(vec![1]));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(memo.stats().misses, 2);
    }
}
