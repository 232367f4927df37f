//! # Cycle buffer: partial results of the one in-flight cycle.
//!
//! At most one cycle is in flight at a time, so a single map from index to
//! last result is the whole accumulator. Entries appear on the first
//! result of a cycle and the map is wiped in full on completion or on any
//! cancellation; removal of a single source purges just its index.
//!
//! Invariant: `keys(buffer) ⊆ keys(registry)` at all times — results only
//! enter through a resolved registry index, and registry removals purge
//! their buffer slots in the same call.

use std::collections::BTreeMap;

use crate::reading::Reading;

use super::registry::SourceRegistry;

/// Accumulator for one in-flight cycle, keyed by registry index.
#[derive(Default)]
pub(crate) struct CycleBuffer {
    slots: BTreeMap<i32, Reading>,
}

impl CycleBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores `reading` at `index`; true when the index was not yet part
    /// of this cycle, false when this overwrote an already-buffered slot.
    pub(crate) fn store(&mut self, index: i32, reading: Reading) -> bool {
        self.slots.insert(index, reading).is_none()
    }

    /// Lowest registry index with no buffered result yet, `None` when the
    /// cycle is complete (or the registry is empty).
    pub(crate) fn missing_min(&self, registry: &SourceRegistry) -> Option<i32> {
        registry.indices().find(|i| !self.slots.contains_key(i))
    }

    /// Takes all buffered readings ascending by index, leaving the buffer
    /// empty for the next cycle.
    pub(crate) fn drain_ordered(&mut self) -> Vec<Reading> {
        std::mem::take(&mut self.slots).into_values().collect()
    }

    /// Drops the slot for `index`, if any.
    pub(crate) fn purge(&mut self, index: i32) {
        self.slots.remove(&index);
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::reading::{Reading, Value};

    use super::*;

    fn registry(indices: &[i32]) -> SourceRegistry {
        let mut reg = SourceRegistry::new();
        for i in indices {
            reg.insert(*i, Arc::from(format!("src{i}").as_str()));
        }
        reg
    }

    fn reading(n: i64) -> Reading {
        Reading::new(format!("src{n}"), Value::Int(n))
    }

    #[test]
    fn test_store_reports_newness() {
        let mut buf = CycleBuffer::new();
        assert!(buf.store(2, reading(2)));
        assert!(!buf.store(2, reading(2)));
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_missing_min_picks_lowest_gap() {
        let reg = registry(&[0, 1, 2, 3]);
        let mut buf = CycleBuffer::new();
        buf.store(0, reading(0));
        buf.store(1, reading(1));
        buf.store(3, reading(3));
        assert_eq!(buf.missing_min(&reg), Some(2));
    }

    #[test]
    fn test_missing_min_none_when_complete() {
        let reg = registry(&[1, 4]);
        let mut buf = CycleBuffer::new();
        buf.store(1, reading(1));
        buf.store(4, reading(4));
        assert_eq!(buf.missing_min(&reg), None);
    }

    #[test]
    fn test_drain_is_ascending_and_empties() {
        let mut buf = CycleBuffer::new();
        buf.store(4, reading(4));
        buf.store(0, reading(0));
        buf.store(2, reading(2));
        let drained = buf.drain_ordered();
        let values: Vec<&Value> = drained.iter().map(|r| &r.value).collect();
        assert_eq!(
            values,
            vec![&Value::Int(0), &Value::Int(2), &Value::Int(4)]
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn test_purge_single_slot() {
        let reg = registry(&[0, 1]);
        let mut buf = CycleBuffer::new();
        buf.store(0, reading(0));
        buf.store(1, reading(1));
        buf.purge(0);
        assert_eq!(buf.missing_min(&reg), Some(0));
        assert_eq!(buf.len(), 1);
    }
}
