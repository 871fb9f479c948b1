//! Fixed-capacity, newest-first history buffers.
//!
//! [`BoundedHistory`] backs every capped sequence in the client: the feed
//! event and alert logs, the exposure history behind the Insights chart,
//! and the persisted market price-history cache. Insertion happens at the
//! front and truncation at the back, so the length never exceeds the
//! configured capacity and index 0 is always the most recent record.

use std::collections::VecDeque;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::LocalStore;

/// A bounded, newest-first sequence with optional durable persistence.
#[derive(Clone)]
pub struct BoundedHistory<T> {
    capacity: usize,
    entries: VecDeque<T>,
    persist: Option<(LocalStore, String)>,
}

impl<T> BoundedHistory<T> {
    /// Creates an in-memory history holding at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
            persist: None,
        }
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained records.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recently appended record.
    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Iterates the records, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Returns the records matching `predicate`, newest first.
    pub fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        T: Clone,
        P: Fn(&T) -> bool,
    {
        self.entries
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }
}

impl<T> BoundedHistory<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a history mirrored into `store` under `key`.
    ///
    /// Any previously persisted sequence is rehydrated; absent or malformed
    /// payloads yield an empty history.
    pub fn persistent(store: LocalStore, key: impl Into<String>, capacity: usize) -> Self {
        let key = key.into();
        let mut entries: VecDeque<T> = store.get(&key).unwrap_or_default();
        entries.truncate(capacity);

        Self {
            capacity,
            entries,
            persist: Some((store, key)),
        }
    }

    /// Prepends `record`, dropping the oldest entries beyond capacity.
    pub fn append(&mut self, record: T) {
        self.entries.push_front(record);
        self.entries.truncate(self.capacity);
        self.flush();
    }

    /// Empties the history and removes any persisted copy.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Some((store, key)) = &self.persist {
            store.remove(key);
        }
    }

    /// Writes the full sequence to the backing store, if any.
    fn flush(&self) {
        if let Some((store, key)) = &self.persist {
            store.set(key, &self.entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_exceeds_capacity_and_keeps_newest_first() {
        let mut history = BoundedHistory::new(3);
        for n in 0..10u32 {
            history.append(n);
            assert!(history.len() <= 3);
            assert_eq!(history.latest(), Some(&n));
        }
        let retained: Vec<u32> = history.iter().copied().collect();
        assert_eq!(retained, vec![9, 8, 7]);
    }

    #[test]
    fn filter_preserves_relative_order() {
        let mut history = BoundedHistory::new(10);
        history.append("AAPL:1".to_string());
        history.append("TSLA:1".to_string());
        history.append("AAPL:2".to_string());

        let matches = history.filter(|record| record.contains("AAPL"));
        assert_eq!(matches, vec!["AAPL:2".to_string(), "AAPL:1".to_string()]);
    }

    #[test]
    fn persists_and_rehydrates() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());

        let mut history = BoundedHistory::persistent(store.clone(), "prices", 5);
        history.append(1u32);
        history.append(2u32);

        let rehydrated: BoundedHistory<u32> = BoundedHistory::persistent(store, "prices", 5);
        let values: Vec<u32> = rehydrated.iter().copied().collect();
        assert_eq!(values, vec![2, 1]);
    }

    #[test]
    fn rehydration_respects_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());

        let mut history = BoundedHistory::persistent(store.clone(), "prices", 10);
        for n in 0..10u32 {
            history.append(n);
        }

        // Reopen with a smaller capacity; only the newest entries survive.
        let shrunk: BoundedHistory<u32> = BoundedHistory::persistent(store, "prices", 3);
        let values: Vec<u32> = shrunk.iter().copied().collect();
        assert_eq!(values, vec![9, 8, 7]);
    }

    #[test]
    fn clear_removes_persisted_copy() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());

        let mut history = BoundedHistory::persistent(store.clone(), "prices", 5);
        history.append(1u32);
        history.clear();
        assert!(history.is_empty());

        let rehydrated: BoundedHistory<u32> = BoundedHistory::persistent(store, "prices", 5);
        assert!(rehydrated.is_empty());
    }

    #[test]
    fn malformed_payload_yields_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path());
        store.set("prices", &"definitely not a sequence".to_string());

        let history: BoundedHistory<u32> = BoundedHistory::persistent(store, "prices", 5);
        assert!(history.is_empty());
    }
}
