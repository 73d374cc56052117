//! Byte-budgeted least-recently-used store.

use std::collections::{HashMap, VecDeque};

/// LRU map from URL to value, bounded by total byte size and optionally by
/// entry count.
///
/// Recency is tracked in a queue: the front is the eviction candidate, the
/// back the most recently used key. Promoting a key on `get` and dropping it
/// on `remove` scan that queue, so both are O(n) in the entry count. That is
/// fine for a few hundred thumbnails; a much larger cache should key recency
/// by a monotonic counter instead.
#[derive(Debug)]
pub struct LruStore<V> {
    entries: HashMap<String, (V, usize)>,
    order: VecDeque<String>,
    max_bytes: usize,
    max_entries: Option<usize>,
    bytes: usize,
}

impl<V: Clone> LruStore<V> {
    #[must_use]
    pub fn new(max_bytes: usize, max_entries: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            max_bytes,
            max_entries,
            bytes: 0,
        }
    }

    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let value = self.entries.get(key).map(|(value, _)| value.clone())?;
        self.touch(key);
        Some(value)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts `value` weighing `size` bytes, evicting older entries to fit.
    ///
    /// Returns `false` without storing anything when `size` alone exceeds the
    /// byte budget.
    pub fn insert(&mut self, key: String, value: V, size: usize) -> bool {
        if size > self.max_bytes || self.max_entries == Some(0) {
            return false;
        }

        self.remove(&key);

        while self.bytes + size > self.max_bytes || self.at_entry_limit() {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if let Some((_, evicted)) = self.entries.remove(&oldest) {
                self.bytes -= evicted;
                tracing::debug!(url = %oldest, bytes = evicted, "evicted image from cache");
            }
        }

        self.bytes += size;
        self.order.push_back(key.clone());
        self.entries.insert(key, (value, size));
        true
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let (value, size) = self.entries.remove(key)?;
        self.bytes -= size;
        self.order.retain(|k| k != key);
        Some(value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.bytes = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total size of stored values in bytes.
    #[must_use]
    pub const fn bytes(&self) -> usize {
        self.bytes
    }

    fn at_entry_limit(&self) -> bool {
        self.max_entries
            .is_some_and(|limit| self.entries.len() >= limit)
    }

    fn touch(&mut self, key: &str) {
        if matches!(self.order.back(), Some(k) if k == key) {
            return;
        }
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used_to_fit_budget() {
        let mut store = LruStore::new(100, None);
        store.insert("a".into(), 1, 40);
        store.insert("b".into(), 2, 40);

        assert_eq!(store.get("a"), Some(1));

        store.insert("c".into(), 3, 40);

        assert!(store.contains("a"));
        assert!(!store.contains("b"));
        assert!(store.contains("c"));
        assert_eq!(store.bytes(), 80);
    }

    #[test]
    fn entry_limit_is_enforced() {
        let mut store = LruStore::new(1_000, Some(2));
        store.insert("a".into(), 1, 1);
        store.insert("b".into(), 2, 1);
        store.insert("c".into(), 3, 1);

        assert_eq!(store.len(), 2);
        assert!(!store.contains("a"));
    }

    #[test]
    fn oversized_value_is_not_stored() {
        let mut store = LruStore::new(10, None);
        store.insert("small".into(), 1, 5);

        assert!(!store.insert("huge".into(), 2, 11));
        assert!(store.contains("small"));
        assert_eq!(store.bytes(), 5);
    }

    #[test]
    fn reinserting_replaces_size() {
        let mut store = LruStore::new(100, None);
        store.insert("a".into(), 1, 30);
        store.insert("a".into(), 2, 50);

        assert_eq!(store.len(), 1);
        assert_eq!(store.bytes(), 50);
        assert_eq!(store.get("a"), Some(2));
    }

    #[test]
    fn remove_and_clear_release_bytes() {
        let mut store = LruStore::new(100, None);
        store.insert("a".into(), 1, 30);
        store.insert("b".into(), 2, 30);

        assert_eq!(store.remove("a"), Some(1));
        assert_eq!(store.bytes(), 30);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.bytes(), 0);
    }

    #[test]
    fn removing_a_middle_key_keeps_recency_of_the_rest() {
        let mut store = LruStore::new(90, None);
        store.insert("a".into(), 1, 30);
        store.insert("b".into(), 2, 30);
        store.insert("c".into(), 3, 30);

        store.remove("b");
        store.insert("d".into(), 4, 30);
        store.insert("e".into(), 5, 30);

        assert!(!store.contains("a"));
        assert!(store.contains("c"));
        assert!(store.contains("d"));
        assert!(store.contains("e"));
    }
}
