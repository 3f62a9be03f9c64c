//! Concurrent key → count table.
//!
//! [`CounterTable`] holds one [`Entry`] per distinct key ever seen. Entries are
//! created on first sight and never removed, so the table is a superset view of
//! everything the podium could ever rank.
//!
//! # Concurrency
//!
//! The map is a [`DashMap`], which splits keys across independently locked
//! shards. Each entry lives behind an `Arc` and carries its own `AtomicU64`,
//! so an increment holds a shard lock only long enough to find (or insert) the
//! entry; the addition itself is a lock-free `fetch_add`. Increments to the same
//! key from different threads are never lost.

use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

/// Capabilities a leaderboard key must have.
///
/// `Ord` provides the tie-break order, `Hash + Eq` index the counter table,
/// `Clone` lets frozen standings own their keys, and `Send + Sync` let the
/// engine be shared across writer threads.
pub trait Key: Hash + Ord + Clone + Send + Sync {}

impl<T: Hash + Ord + Clone + Send + Sync> Key for T {}

/// The mutable `(key, count)` record for one key.
pub struct Entry<K> {
    key: K,
    count: AtomicU64,
}

impl<K> Entry<K> {
    fn new(key: K) -> Self {
        Self {
            key,
            count: AtomicU64::new(0),
        }
    }

    /// The key this entry counts.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The current count. May be stale by the time it is used.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    #[inline]
    fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::AcqRel) + 1
    }
}

impl<K: Debug> Debug for Entry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("count", &self.count())
            .finish()
    }
}

/// A concurrent mapping from key to occurrence count.
///
/// # Examples
///
/// ```rust
/// use classifica::counter_table::CounterTable;
///
/// let table = CounterTable::new();
/// let (_, count) = table.increment("rust".to_string());
/// assert_eq!(count, 1);
/// let (entry, count) = table.increment("rust".to_string());
/// assert_eq!(count, 2);
/// assert_eq!(entry.key(), "rust");
///
/// assert_eq!(table.get("rust"), Some(2));
/// assert_eq!(table.get("go"), None);
/// ```
pub struct CounterTable<K: Key> {
    entries: DashMap<K, Arc<Entry<K>>>,
}

impl<K: Key> CounterTable<K> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Records one occurrence of `key`.
    ///
    /// Creates the entry on first sight. Returns the entry together with the
    /// count this increment produced, so callers never need a second lookup.
    pub fn increment(&self, key: K) -> (Arc<Entry<K>>, u64) {
        let entry = self.entry_or_insert(key);
        let count = entry.increment();
        (entry, count)
    }

    /// Reads the count for `key`, if it has ever been incremented.
    pub fn get<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|entry| entry.count())
    }

    /// Returns the shared entry for `key`, if present.
    pub fn entry<Q>(&self, key: &Q) -> Option<Arc<Entry<K>>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of distinct keys seen so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key has been tallied yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies every `(key, count)` pair out of the table.
    ///
    /// Walks the whole key space; never used on the tally path.
    pub fn entries(&self) -> Vec<(K, u64)> {
        self.entries
            .iter()
            .map(|item| (item.key().clone(), item.value().count()))
            .collect()
    }

    fn entry_or_insert(&self, key: K) -> Arc<Entry<K>> {
        // Read lock first: after warm-up almost every key already exists.
        if let Some(entry) = self.entries.get(&key) {
            return Arc::clone(entry.value());
        }
        let slot = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Entry::new(key)));
        Arc::clone(slot.value())
    }
}

impl<K: Key> Default for CounterTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key + Debug> Debug for CounterTable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterTable")
            .field("keys", &self.len())
            .finish()
    }
}
