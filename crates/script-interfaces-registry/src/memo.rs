//! Insert-only memo tables.
//!
//! Every cache in the engine is a [`MemoTable`]: entries are added the first
//! time a key is computed and are never replaced, evicted or cleared. A
//! script's identity and declarations are assumed immutable once observed.
//!
//! # Thread Safety
//!
//! `MemoTable` is **not** synchronized. The engine is single-threaded; a host
//! that shares a validator across threads must wrap it (e.g. in a `Mutex`)
//! so cache writes are serialized.

use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Hit/miss counters of one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    /// Lookups answered from the table.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Entries currently stored.
    pub entries: usize,
}

/// Insert-only key/value table with lookup statistics.
#[derive(Debug, Clone)]
pub struct MemoTable<K, V> {
    entries: FxHashMap<K, V>,
    hits: u64,
    misses: u64,
}

impl<K, V> Default for MemoTable<K, V> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<K: Eq + Hash, V: Clone> MemoTable<K, V> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, recording a hit or a miss.
    pub fn lookup<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get(key) {
            Some(value) => {
                self.hits += 1;
                Some(value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up a key without touching the counters.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Record a value for `key`.
    ///
    /// If the key is already present the stored value wins and is returned;
    /// entries are never overwritten.
    pub fn insert(&mut self, key: K, value: V) -> V {
        self.entries.entry(key).or_insert(value).clone()
    }

    /// Return the memoized value, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.lookup(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value)
    }

    /// Fallible variant of [`get_or_insert_with`](Self::get_or_insert_with).
    ///
    /// Errors are not memoized.
    pub fn try_get_or_insert_with<E>(
        &mut self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.lookup(&key) {
            return Ok(value);
        }
        let value = compute()?;
        Ok(self.insert(key, value))
    }

    /// Check if a key is present.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_is_empty() {
        let table: MemoTable<String, bool> = MemoTable::new();
        assert!(table.is_empty());
        assert_eq!(table.stats(), MemoStats::default());
    }

    #[test]
    fn lookup_counts_hits_and_misses() {
        let mut table: MemoTable<String, u32> = MemoTable::new();
        assert_eq!(table.lookup("a"), None);
        table.insert("a".to_string(), 1);
        assert_eq!(table.lookup("a"), Some(1));
        assert_eq!(table.lookup("a"), Some(1));

        let stats = table.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn first_insert_wins() {
        let mut table: MemoTable<&str, u32> = MemoTable::new();
        assert_eq!(table.insert("k", 1), 1);
        assert_eq!(table.insert("k", 2), 1);
        assert_eq!(table.peek("k"), Some(&1));
    }

    #[test]
    fn compute_runs_once() {
        let mut table: MemoTable<u32, u32> = MemoTable::new();
        let mut calls = 0;
        for _ in 0..3 {
            let v = table.get_or_insert_with(7, || {
                calls += 1;
                49
            });
            assert_eq!(v, 49);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn errors_are_not_memoized() {
        let mut table: MemoTable<u32, u32> = MemoTable::new();
        let err: Result<u32, &str> = table.try_get_or_insert_with(1, || Err("boom"));
        assert_eq!(err, Err("boom"));
        assert!(!table.contains(&1));

        let ok: Result<u32, &str> = table.try_get_or_insert_with(1, || Ok(5));
        assert_eq!(ok, Ok(5));
        assert!(table.contains(&1));
    }
}
