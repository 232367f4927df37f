//! # Source registry: ordered index ↔ canonical-id table.
//!
//! The registry assigns each registered source a stable integer index.
//! Indices are unique and need not be contiguous; the *minimum* index is
//! the cycle start. Ids are the canonical form reported by the engine at
//! binding creation, and one id may legitimately sit at several indices.
//!
//! ## Rules
//! - `insert` overwrites whatever id previously held the index.
//! - `remove` drops **every** index mapped to the id (the binding behind
//!   an id is disposed as a unit).
//! - Listings are always ascending by index.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Ordered, index-addressable table of canonical source ids.
#[derive(Default)]
pub(crate) struct SourceRegistry {
    by_index: BTreeMap<i32, Arc<str>>,
}

impl SourceRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers `id` at `index`, returning the id previously held there.
    ///
    /// Negative indices are rejected before reaching the registry; the
    /// assert only guards internal misuse.
    pub(crate) fn insert(&mut self, index: i32, id: Arc<str>) -> Option<Arc<str>> {
        debug_assert!(index >= 0, "negative index must be rejected by callers");
        self.by_index.insert(index, id)
    }

    /// Removes every entry whose id equals `id`; returns the removed
    /// indices ascending. Empty when the id was not registered.
    pub(crate) fn remove(&mut self, id: &str) -> Vec<i32> {
        let removed: Vec<i32> = self
            .by_index
            .iter()
            .filter(|(_, v)| v.as_ref() == id)
            .map(|(k, _)| *k)
            .collect();
        for k in &removed {
            self.by_index.remove(k);
        }
        removed
    }

    pub(crate) fn clear(&mut self) {
        self.by_index.clear();
    }

    /// Canonical id at `index`.
    pub(crate) fn get(&self, index: i32) -> Option<&Arc<str>> {
        self.by_index.get(&index)
    }

    /// First index (ascending) holding exactly `id`.
    pub(crate) fn index_of(&self, id: &str) -> Option<i32> {
        self.by_index
            .iter()
            .find(|(_, v)| v.as_ref() == id)
            .map(|(k, _)| *k)
    }

    /// Minimum registered index; `None` when empty.
    pub(crate) fn min_index(&self) -> Option<i32> {
        self.by_index.keys().next().copied()
    }

    /// All ids ascending by index.
    pub(crate) fn all(&self) -> Vec<Arc<str>> {
        self.by_index.values().cloned().collect()
    }

    /// `(index, id)` pairs ascending by index.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (i32, &Arc<str>)> {
        self.by_index.iter().map(|(k, v)| (*k, v))
    }

    /// Registered indices ascending.
    pub(crate) fn indices(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_index.keys().copied()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.by_index.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Arc<str> {
        Arc::from(s)
    }

    #[test]
    fn test_insert_overwrites_index() {
        let mut reg = SourceRegistry::new();
        assert_eq!(reg.insert(0, id("a")), None);
        let displaced = reg.insert(0, id("b"));
        assert_eq!(displaced.as_deref(), Some("a"));
        assert_eq!(reg.get(0).map(|s| s.as_ref()), Some("b"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_remove_drops_all_indices_for_id() {
        let mut reg = SourceRegistry::new();
        reg.insert(0, id("a"));
        reg.insert(3, id("b"));
        reg.insert(7, id("a"));
        assert_eq!(reg.remove("a"), vec![0, 7]);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.index_of("b"), Some(3));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut reg = SourceRegistry::new();
        reg.insert(1, id("a"));
        assert!(reg.remove("nope").is_empty());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_all_is_ascending_by_index() {
        let mut reg = SourceRegistry::new();
        reg.insert(5, id("c"));
        reg.insert(1, id("a"));
        reg.insert(3, id("b"));
        let all = reg.all();
        let all: Vec<&str> = all.iter().map(|s| s.as_ref()).collect();
        assert_eq!(all, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_min_index_non_contiguous() {
        let mut reg = SourceRegistry::new();
        assert_eq!(reg.min_index(), None);
        reg.insert(7, id("b"));
        reg.insert(3, id("a"));
        assert_eq!(reg.min_index(), Some(3));
    }

    #[test]
    fn test_index_of_prefers_lowest() {
        let mut reg = SourceRegistry::new();
        reg.insert(4, id("a"));
        reg.insert(2, id("a"));
        assert_eq!(reg.index_of("a"), Some(2));
    }
}
