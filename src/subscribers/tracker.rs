//! # CycleTracker: stateful subscriber caching the latest readings.
//!
//! [`CycleTracker`] keeps the last [`Reading`] seen per source plus
//! counters for updates and completed cycles. UI layers poll it instead of
//! replaying the event stream; the snapshot is synchronous (`RwLock`, no
//! await needed on the read side).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::reading::Reading;

use super::Subscribe;

#[derive(Default)]
struct TrackerState {
    last: HashMap<Arc<str>, Reading>,
    cycles: u64,
    updates: u64,
}

/// Tracks last-known readings and cycle counts from bus events.
#[derive(Default)]
pub struct CycleTracker {
    inner: RwLock<TrackerState>,
}

impl CycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last reading seen for a source label, if any.
    pub fn last(&self, src: &str) -> Option<Reading> {
        self.inner.read().unwrap().last.get(src).cloned()
    }

    /// Number of `CycleComplete` events observed.
    pub fn cycles_completed(&self) -> u64 {
        self.inner.read().unwrap().cycles
    }

    /// Number of `Update` events observed (matched or not).
    pub fn updates_seen(&self) -> u64 {
        self.inner.read().unwrap().updates
    }

    /// Sorted snapshot of the last reading per source label.
    pub fn snapshot(&self) -> Vec<(String, Reading)> {
        let state = self.inner.read().unwrap();
        let mut out: Vec<(String, Reading)> = state
            .last
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

#[async_trait]
impl Subscribe for CycleTracker {
    async fn on_event(&self, event: &Event) {
        let mut state = self.inner.write().unwrap();
        match event.kind {
            EventKind::Update => {
                state.updates += 1;
                if let Some(reading) = &event.reading {
                    state.last.insert(reading.src.clone(), reading.clone());
                }
            }
            EventKind::CycleComplete => {
                state.cycles += 1;
            }
            EventKind::SourceRemoved => {
                if let Some(src) = &event.src {
                    state.last.remove(src);
                }
            }
            EventKind::SourcesCleared => {
                state.last.clear();
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "cycle-tracker"
    }
}

#[cfg(test)]
mod tests {
    use crate::reading::Value;

    use super::*;

    fn update(src: &str, v: i64) -> Event {
        Event::new(EventKind::Update).with_reading(Reading::new(src, Value::Int(v)))
    }

    #[tokio::test]
    async fn test_tracks_last_reading_per_source() {
        let tracker = CycleTracker::new();
        tracker.on_event(&update("a", 1)).await;
        tracker.on_event(&update("a", 2)).await;
        tracker.on_event(&update("b", 3)).await;

        assert_eq!(tracker.last("a").unwrap().value, Value::Int(2));
        assert_eq!(tracker.last("b").unwrap().value, Value::Int(3));
        assert_eq!(tracker.updates_seen(), 3);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].0, "a");
    }

    #[tokio::test]
    async fn test_counts_cycles_and_forgets_removed() {
        let tracker = CycleTracker::new();
        tracker.on_event(&update("a", 1)).await;
        tracker
            .on_event(&Event::new(EventKind::CycleComplete))
            .await;
        tracker
            .on_event(&Event::new(EventKind::CycleComplete))
            .await;
        assert_eq!(tracker.cycles_completed(), 2);

        tracker
            .on_event(&Event::new(EventKind::SourceRemoved).with_src("a"))
            .await;
        assert!(tracker.last("a").is_none());

        tracker.on_event(&update("b", 1)).await;
        tracker
            .on_event(&Event::new(EventKind::SourcesCleared))
            .await;
        assert!(tracker.snapshot().is_empty());
    }
}
