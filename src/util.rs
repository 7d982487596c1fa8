use std::borrow::Borrow;
use std::mem;

/// Bounded key-value cache with least-recently-used eviction
///
/// Entries are kept in a recency-ordered vector, oldest first: a lookup moves
/// the entry to the back, an insertion at capacity evicts the front. Linear
/// scans are fine at the capacities this crate uses.
pub struct LruCache<K, V> {
    capacity: usize,
    entries: Vec<(K, V)>,
}

impl<K: Eq, V> LruCache<K, V> {
    pub fn new(capacity: usize) -> LruCache<K, V> {
        assert!(capacity > 0, "cache capacity must be positive");
        LruCache {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a key, marking the entry as most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let idx = self.entries.iter().position(|(k, _)| k.borrow() == key)?;
        let entry = self.entries.remove(idx);
        self.entries.push(entry);
        self.entries.last().map(|(_, v)| v)
    }

    /// Check for a key without touching recency order
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.entries.iter().any(|(k, _)| k.borrow() == key)
    }

    /// Insert a key, evicting the least recently used entry if at capacity
    ///
    /// Returns the previous value if the key was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(idx) = self.entries.iter().position(|(k, _)| *k == key) {
            let mut entry = self.entries.remove(idx);
            let old = mem::replace(&mut entry.1, value);
            self.entries.push(entry);
            return Some(old);
        }

        if self.entries.len() == self.capacity {
            self.entries.remove(0);
        }
        self.entries.push((key, value));
        None
    }
}
