//! Separate-chaining hash table.

use std::hash::{DefaultHasher, Hash, Hasher};

const INITIAL_BUCKETS: usize = 64;

/// An associative index backed by a bucket array of association lists.
///
/// Inserts are upserts. When the load factor would exceed 0.75 the bucket
/// array doubles and every entry is rehashed. There is no removal. Hashing
/// uses a fixed-key hasher, so bucket layout and iteration order are the
/// same on every run.
///
/// # Examples
///
/// ```
/// use parcel_routing::store::ChainedTable;
///
/// let mut t = ChainedTable::new();
/// assert_eq!(t.insert(7u32, "seven"), None);
/// assert_eq!(t.insert(7u32, "SEVEN"), Some("seven"));
/// assert_eq!(t.get(&7), Some(&"SEVEN"));
/// assert_eq!(t.get(&8), None);
/// assert_eq!(t.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ChainedTable<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
}

impl<K: Hash + Eq, V> ChainedTable<K, V> {
    /// Creates an empty table with the default bucket count.
    pub fn new() -> Self {
        Self::with_buckets(INITIAL_BUCKETS)
    }

    /// Creates an empty table with at least one bucket.
    pub fn with_buckets(count: usize) -> Self {
        let count = count.max(1);
        Self {
            buckets: (0..count).map(|_| Vec::new()).collect(),
            len: 0,
        }
    }

    fn bucket_of(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.buckets.len() as u64) as usize
    }

    /// Inserts or replaces the value for `key`, returning the old value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let b = self.bucket_of(&key);
        if let Some(slot) = self.buckets[b].iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.buckets[b].push((key, value));
        self.len += 1;
        if self.len * 4 > self.buckets.len() * 3 {
            self.grow();
        }
        None
    }

    fn grow(&mut self) {
        let doubled = self.buckets.len() * 2;
        let old = std::mem::replace(&mut self.buckets, (0..doubled).map(|_| Vec::new()).collect());
        for (k, v) in old.into_iter().flatten() {
            let b = self.bucket_of(&k);
            self.buckets[b].push((k, v));
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let b = self.bucket_of(key);
        self.buckets[b]
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current size of the bucket array.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flatten().map(|(k, v)| (k, v))
    }

    /// Keys in bucket order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }
}

impl<K: Hash + Eq, V> Default for ChainedTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
