//! # Runtime events emitted by the scheduler and subscriber workers.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Data events**: per-source updates and cycle completion
//! - **Scheduling events**: reads issued, timer re-arms
//! - **Registration events**: source add/remove/clear, failed registrations
//! - **Fan-out self-reports**: subscriber overflow and panics
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! source labels, indices, readings, and re-arm delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use readvisor::{Event, EventKind, Reading, Value};
//!
//! let ev = Event::new(EventKind::Update)
//!     .with_src("pump/01/flow")
//!     .with_index(2)
//!     .with_reading(Reading::new("pump/01/flow", Value::Int(7)));
//!
//! assert_eq!(ev.kind, EventKind::Update);
//! assert_eq!(ev.index, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::reading::Reading;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Data events ===
    /// One result arrived from a binding. Fired for every incoming result,
    /// resolved or not.
    ///
    /// Sets:
    /// - `src`: label the result was tagged with
    /// - `index`: resolved registry index (absent when unmatched)
    /// - `reading`: the result payload
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Update,

    /// A sequential cycle collected one result per registered source.
    /// Never fired in concurrent mode.
    ///
    /// Sets:
    /// - `cycle`: readings ordered by ascending registered index
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CycleComplete,

    // === Scheduling events ===
    /// A targeted read command was issued (cycle start or gap retry).
    ///
    /// Sets:
    /// - `src`: canonical id the read targets
    /// - `index`: registry index of the target
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ReadIssued,

    /// A one-shot timer was armed to start the next cycle.
    ///
    /// Sets:
    /// - `delay_ms`: timer interval (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RearmScheduled,

    // === Registration events ===
    /// A source was registered and its binding created.
    ///
    /// Sets:
    /// - `src`: canonical id reported by the engine
    /// - `index`: registry index
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SourceAdded,

    /// A source was removed and its binding disposed.
    ///
    /// Sets:
    /// - `src`: canonical id
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SourceRemoved,

    /// All sources were removed and every binding disposed.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SourcesCleared,

    /// The engine refused to create a binding; the registration was
    /// skipped, remaining batch entries continue.
    ///
    /// Sets:
    /// - `src`: requested source id
    /// - `reason`: engine-reported reason
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RegistrationFailed,

    /// An incoming result could not be resolved to any registered source,
    /// not even by the no-args fallback. The result was still forwarded as
    /// an [`EventKind::Update`].
    ///
    /// Sets:
    /// - `src`: unmatched label
    /// - `reason`: diagnostic text
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    UpdateUnmatched,

    // === Fan-out self-reports ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `src`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `src`: subscriber name
    /// - `reason`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Source label or subscriber name, if applicable.
    pub src: Option<Arc<str>>,
    /// Registry index, if applicable.
    pub index: Option<i32>,
    /// Human-readable reason (diagnostics, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Timer delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Single result payload (for [`EventKind::Update`]).
    pub reading: Option<Reading>,
    /// Full-cycle payload ordered by ascending index
    /// (for [`EventKind::CycleComplete`]).
    pub cycle: Option<Arc<[Reading]>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            src: None,
            index: None,
            reason: None,
            delay_ms: None,
            reading: None,
            cycle: None,
        }
    }

    /// Attaches a source label or subscriber name.
    #[inline]
    pub fn with_src(mut self, src: impl Into<Arc<str>>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Attaches a registry index.
    #[inline]
    pub fn with_index(mut self, index: i32) -> Self {
        self.index = Some(index);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a timer delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a single result payload.
    #[inline]
    pub fn with_reading(mut self, reading: Reading) -> Self {
        self.reading = Some(reading);
        self
    }

    /// Attaches a full-cycle payload.
    #[inline]
    pub fn with_cycle(mut self, readings: Vec<Reading>) -> Self {
        self.cycle = Some(readings.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_src(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_src(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}
