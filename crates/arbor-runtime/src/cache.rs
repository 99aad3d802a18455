#![forbid(unsafe_code)]

//! Caller-owned widget cache keyed by stable identifiers.
//!
//! Hosts that rebuild their view every frame need somewhere to keep a
//! widget instance (and its navigation state) between frames. A
//! [`WidgetCache`] is that place. It is an ordinary value owned by the
//! host, not a process-wide registry, and entries leave it only when the
//! host evicts them, which it does when the widget unmounts.

use std::collections::hash_map::Entry;

use ahash::{AHashMap, AHashSet};

/// Keyed storage for mounted widget instances.
#[derive(Debug)]
pub struct WidgetCache<V> {
    entries: AHashMap<String, V>,
}

impl<V> Default for WidgetCache<V> {
    fn default() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }
}

impl<V> WidgetCache<V> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `key`, creating it with `init` on first use.
    pub fn get_or_insert_with(&mut self, key: &str, init: impl FnOnce() -> V) -> &mut V {
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                tracing::debug!(key, "widget cache insert");
                entry.insert(init())
            }
        }
    }

    /// Insert or replace the entry for `key`, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    /// Look up an entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    /// Look up an entry mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Whether an entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove the entry for `key`, typically on unmount.
    pub fn evict(&mut self, key: &str) -> Option<V> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            tracing::debug!(key, remaining = self.entries.len(), "widget cache evict");
        }
        removed
    }

    /// Evict every entry whose key is not in `live`.
    ///
    /// Returns the number of evicted entries.
    pub fn retain_keys<'a>(&mut self, live: impl IntoIterator<Item = &'a str>) -> usize {
        let live: AHashSet<&str> = live.into_iter().collect();
        let before = self.entries.len();
        self.entries.retain(|key, _| live.contains(key.as_str()));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.entries.len(), "widget cache sweep");
        }
        evicted
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_insert_creates_once() {
        let mut cache = WidgetCache::new();
        let mut calls = 0;
        *cache.get_or_insert_with("tree", || {
            calls += 1;
            1
        }) += 10;
        let value = *cache.get_or_insert_with("tree", || {
            calls += 1;
            100
        });
        assert_eq!(value, 11);
        assert_eq!(calls, 1);
    }

    #[test]
    fn evict_removes_entry() {
        let mut cache = WidgetCache::new();
        cache.insert("a", 1);
        cache.insert("b", 2);

        assert_eq!(cache.evict("a"), Some(1));
        assert_eq!(cache.evict("a"), None);
        assert!(!cache.contains("a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn retain_keys_sweeps_unmounted() {
        let mut cache = WidgetCache::new();
        for key in ["a", "b", "c"] {
            cache.insert(key, key.len());
        }
        let evicted = cache.retain_keys(["b"]);
        assert_eq!(evicted, 2);
        assert!(cache.contains("b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_does_not_grow_across_remounts() {
        let mut cache: WidgetCache<Vec<u8>> = WidgetCache::new();
        for _ in 0..100 {
            cache.get_or_insert_with("list", Vec::new);
            cache.evict("list");
        }
        assert!(cache.is_empty());
    }
}
