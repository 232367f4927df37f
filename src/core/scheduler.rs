//! # Scheduler: the scatter/gather state machine.
//!
//! Synchronous heart of the crate. All registry/buffer mutation happens
//! here, driven by exactly one caller (the actor loop), so the machine
//! needs no locking and can be exercised in plain unit tests.
//!
//! ## State machine (sequential modes)
//! ```text
//!            start() / timer expiry
//!   Idle ───────────────────────────────► AwaitingResult(i)
//!     ▲       read(min index i)                 │
//!     │                                         │ on_result(r)
//!     │                                         ▼
//!     │                     ┌─ resolve label → index
//!     │                     ├─ publish Update (always)
//!     │                     ├─ buffer[index] = r
//!     │                     │
//!     │        index ≠ i (unsolicited) ──► buffered only, keep waiting
//!     │                     │
//!     │        index = i (read answered):
//!     │            missing non-empty ──► read(min missing), AwaitingResult
//!     │                     │
//!     └─── missing empty ◄──┘
//!          publish CycleComplete (ascending by index)
//!          clear buffer; SequentialTimed → request re-arm
//! ```
//!
//! Concurrent mode has no cycle states at all: every result is terminal
//! after its `Update` event.
//!
//! ## Rules
//! - At most one outstanding read in sequential modes. A result for any
//!   index other than the awaited one is buffered without issuing a new
//!   read — the read in flight is still the one driving the cycle.
//! - The retry target is always the **minimum** missing index, never the
//!   index that just arrived: retry order stays deterministic regardless
//!   of network arrival order, which is what makes the completion payload
//!   reproducible.
//! - A result arriving while `Idle` seeds the buffer and starts gap
//!   filling on its own; sources pushed by the engine without a `start()`
//!   still converge to a complete cycle.
//! - Cancellation (remove/clear) discards partial buffer state silently;
//!   a partial `CycleComplete` is never emitted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Mode;
use crate::engine::{BindingRef, Command};
use crate::error::RegistrationError;
use crate::events::{Bus, Event, EventKind};
use crate::reading::Reading;

use super::buffer::CycleBuffer;
use super::handle::SourceKey;
use super::registry::SourceRegistry;
use super::router;

/// Cycle progress of a sequential scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CycleState {
    /// No read outstanding.
    Idle,
    /// A read was issued for this index; its result drives the cycle
    /// forward.
    AwaitingResult(i32),
}

/// The scatter/gather state machine.
///
/// Owned and driven exclusively by the actor loop; every method is
/// synchronous and returns immediately.
pub(crate) struct Scheduler {
    registry: SourceRegistry,
    buffer: CycleBuffer,
    bindings: HashMap<Arc<str>, BindingRef>,
    mode: Mode,
    state: CycleState,
    bus: Bus,
}

impl Scheduler {
    pub(crate) fn new(mode: Mode, bus: Bus) -> Self {
        Self {
            registry: SourceRegistry::new(),
            buffer: CycleBuffer::new(),
            bindings: HashMap::new(),
            mode: normalize(mode),
            state: CycleState::Idle,
            bus,
        }
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers a freshly created binding at `index`.
    ///
    /// Returns the canonical id of a binding displaced from its last
    /// index, if any — the caller owns disposing it through the engine.
    pub(crate) fn register(&mut self, index: i32, binding: BindingRef) -> Option<Arc<str>> {
        let id: Arc<str> = Arc::from(binding.source());
        let displaced = self.registry.insert(index, id.clone());
        self.bindings.insert(id.clone(), binding);
        self.bus.publish(
            Event::new(EventKind::SourceAdded)
                .with_src(id.clone())
                .with_index(index),
        );

        match displaced {
            Some(old) if old != id => {
                // A buffered result at this index belongs to the old source.
                self.buffer.purge(index);
                if self.registry.index_of(&old).is_none() {
                    self.bindings.remove(&old);
                    Some(old)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Publishes the diagnostic for a registration the engine refused.
    pub(crate) fn report_registration_failure(&self, err: &RegistrationError) {
        self.bus.publish(
            Event::new(EventKind::RegistrationFailed)
                .with_src(err.src.as_str())
                .with_reason(err.reason.as_str()),
        );
    }

    /// Removes every index registered for `id` and purges its buffered
    /// results. True when the id was registered.
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        let removed = self.registry.remove(id);
        let had_binding = self.bindings.remove(id).is_some();
        if removed.is_empty() && !had_binding {
            return false;
        }
        for index in &removed {
            self.buffer.purge(*index);
        }
        // The read outstanding against a removed source will never be
        // answered; a later start() begins a fresh cycle.
        if let CycleState::AwaitingResult(awaited) = self.state {
            if removed.contains(&awaited) {
                self.state = CycleState::Idle;
            }
        }
        self.bus
            .publish(Event::new(EventKind::SourceRemoved).with_src(id));
        true
    }

    /// Drops every source, its bindings and any partial cycle, without
    /// emitting a completion event.
    pub(crate) fn clear(&mut self) {
        self.buffer.clear();
        self.state = CycleState::Idle;
        if self.registry.is_empty() && self.bindings.is_empty() {
            return;
        }
        self.registry.clear();
        self.bindings.clear();
        self.bus.publish(Event::new(EventKind::SourcesCleared));
    }

    // ---------------------------
    // Introspection
    // ---------------------------

    /// Canonical ids ascending by index.
    pub(crate) fn sources(&self) -> Vec<String> {
        self.registry.all().iter().map(|s| s.to_string()).collect()
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn period(&self) -> Option<Duration> {
        self.mode.period()
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> CycleState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn buffered(&self) -> usize {
        self.buffer.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // ---------------------------
    // Dispatch
    // ---------------------------

    /// Changes the dispatch policy for subsequent operations. Already
    /// bound readers are not reconfigured.
    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = normalize(mode);
    }

    /// Updates the period.
    ///
    /// Sequential modes: the sign of `ms` picks the timed/manual sub-mode
    /// and the value becomes the future re-arm interval. Concurrent mode:
    /// a positive period is broadcast to every active binding as a
    /// reconfiguration command; non-positive values are ignored.
    pub(crate) fn set_period(&mut self, ms: i64) {
        match self.mode {
            Mode::Concurrent => {
                if ms > 0 {
                    let period = Duration::from_millis(ms as u64);
                    for binding in self.bindings.values() {
                        binding.send(Command::Period(period));
                    }
                }
            }
            Mode::SequentialTimed(_) | Mode::SequentialManual => {
                self.mode = Mode::sequential_from_millis(ms);
            }
        }
    }

    /// Begins a cycle: issues a read for the minimum-index source.
    ///
    /// No-op when the registry is empty or the mode is concurrent (those
    /// readers refresh themselves). In manual mode this is the only way a
    /// cycle begins; in timed mode the re-arm timer calls it as well.
    pub(crate) fn start(&mut self) {
        match self.mode {
            Mode::Concurrent => {}
            Mode::SequentialTimed(_) | Mode::SequentialManual => {
                let Some(first) = self.registry.min_index() else {
                    return;
                };
                self.issue_read(first);
            }
        }
    }

    /// Handles one incoming result.
    ///
    /// Returns the delay to arm the one-shot cycle timer with, when a
    /// timed-mode cycle just completed.
    pub(crate) fn on_result(&mut self, reading: Reading) -> Option<Duration> {
        let resolved = router::resolve(&self.registry, &reading.src);

        let mut update = Event::new(EventKind::Update)
            .with_src(reading.src.clone())
            .with_reading(reading.clone());
        if let Some(index) = resolved {
            update = update.with_index(index);
        }
        self.bus.publish(update);

        let Some(index) = resolved else {
            self.bus.publish(
                Event::new(EventKind::UpdateUnmatched)
                    .with_src(reading.src.clone())
                    .with_reason("no registered source matches label"),
            );
            return None;
        };

        match self.mode {
            Mode::Concurrent => None,
            Mode::SequentialTimed(_) | Mode::SequentialManual => {
                self.buffer.store(index, reading);
                match self.state {
                    // Unsolicited result: the outstanding read is still
                    // the one driving this cycle.
                    CycleState::AwaitingResult(awaited) if awaited != index => None,
                    CycleState::AwaitingResult(_) | CycleState::Idle => {
                        match self.buffer.missing_min(&self.registry) {
                            Some(gap) => {
                                self.issue_read(gap);
                                None
                            }
                            None => self.complete_cycle(),
                        }
                    }
                }
            }
        }
    }

    /// Sends a command to one source, addressed by canonical id or index.
    /// Unknown targets are a no-op.
    pub(crate) fn send_command(&self, target: &SourceKey, cmd: Command) {
        let binding = match target {
            SourceKey::Id(id) => self.bindings.get(id.as_str()),
            SourceKey::Index(index) => self
                .registry
                .get(*index)
                .and_then(|id| self.bindings.get(id)),
        };
        if let Some(binding) = binding {
            binding.send(cmd);
        }
    }

    // ---------------------------
    // Internals
    // ---------------------------

    fn issue_read(&mut self, index: i32) {
        let Some(id) = self.registry.get(index).cloned() else {
            return;
        };
        let Some(binding) = self.bindings.get(&id).cloned() else {
            return;
        };
        binding.send(Command::Read);
        self.state = CycleState::AwaitingResult(index);
        self.bus.publish(
            Event::new(EventKind::ReadIssued)
                .with_src(id)
                .with_index(index),
        );
    }

    fn complete_cycle(&mut self) -> Option<Duration> {
        let readings = self.buffer.drain_ordered();
        self.state = CycleState::Idle;
        self.bus
            .publish(Event::new(EventKind::CycleComplete).with_cycle(readings));

        match self.mode {
            Mode::SequentialTimed(period) => {
                self.bus
                    .publish(Event::new(EventKind::RearmScheduled).with_delay(period));
                Some(period)
            }
            Mode::SequentialManual | Mode::Concurrent => None,
        }
    }
}

/// A timed mode with a zero period behaves as manual; make it explicit.
fn normalize(mode: Mode) -> Mode {
    match mode {
        Mode::SequentialTimed(p) if p.is_zero() => Mode::SequentialManual,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::sync::broadcast::Receiver;
    use tokio::sync::broadcast::error::TryRecvError;

    use crate::reading::Value;

    use super::*;

    /// Binding stub that records commands and reports a fixed canonical id.
    struct TestBinding {
        src: Arc<str>,
        sent: Mutex<Vec<Command>>,
    }

    impl TestBinding {
        fn new(src: &str) -> Arc<Self> {
            Arc::new(Self {
                src: Arc::from(src),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn reads(&self) -> usize {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .filter(|c| matches!(c, Command::Read))
                .count()
        }

        fn sent(&self) -> Vec<Command> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl crate::engine::Binding for TestBinding {
        fn source(&self) -> &str {
            &self.src
        }

        fn configure(&self, _opts: &crate::engine::BindingOptions) {}

        fn send(&self, cmd: Command) {
            self.sent.lock().unwrap().push(cmd);
        }
    }

    fn scheduler(mode: Mode) -> (Scheduler, Receiver<Event>) {
        let bus = Bus::new(128);
        let rx = bus.subscribe();
        (Scheduler::new(mode, bus), rx)
    }

    /// Registers one TestBinding per id at indices 0..n.
    fn register_all(s: &mut Scheduler, ids: &[&str]) -> Vec<Arc<TestBinding>> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                let b = TestBinding::new(id);
                assert!(s.register(i as i32, b.clone()).is_none());
                b
            })
            .collect()
    }

    fn drain(rx: &mut Receiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(ev) => out.push(ev),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
        out
    }

    fn of_kind(events: &[Event], kind: EventKind) -> Vec<Event> {
        events.iter().filter(|e| e.kind == kind).cloned().collect()
    }

    fn feed(s: &mut Scheduler, src: &str, v: Value) -> Option<Duration> {
        s.on_result(Reading::new(src, v))
    }

    #[test]
    fn test_manual_cycle_with_gap_retry() {
        // Scenario: A,B,C at 0,1,2, manual mode. Results arrive A, C, B.
        let (mut s, mut rx) = scheduler(Mode::SequentialManual);
        let bindings = register_all(&mut s, &["A", "B", "C"]);

        s.start();
        assert_eq!(bindings[0].reads(), 1, "start reads the lowest index");
        assert_eq!(bindings[1].reads(), 0);
        assert_eq!(bindings[2].reads(), 0);
        assert_eq!(s.state(), CycleState::AwaitingResult(0));

        assert_eq!(feed(&mut s, "A", Value::Str("x".into())), None);
        // A answered the outstanding read: lowest missing is B.
        assert_eq!(bindings[1].reads(), 1);

        assert_eq!(feed(&mut s, "C", Value::Str("y".into())), None);
        // C arrived unsolicited while B's read is in flight: buffered,
        // no second retry.
        assert_eq!(bindings[1].reads(), 1);
        assert_eq!(s.state(), CycleState::AwaitingResult(1));

        assert_eq!(feed(&mut s, "B", Value::Str("z".into())), None);

        let events = drain(&mut rx);
        let complete = of_kind(&events, EventKind::CycleComplete);
        assert_eq!(complete.len(), 1, "cycle completes exactly once");
        let cycle = complete[0].cycle.as_ref().unwrap();
        let values: Vec<&Value> = cycle.iter().map(|r| &r.value).collect();
        assert_eq!(
            values,
            vec![
                &Value::Str("x".into()),
                &Value::Str("z".into()),
                &Value::Str("y".into())
            ],
            "payload ordered by registered index, not arrival"
        );

        assert_eq!(s.state(), CycleState::Idle);
        assert_eq!(s.buffered(), 0);
        assert!(
            of_kind(&events, EventKind::RearmScheduled).is_empty(),
            "manual mode never arms a timer"
        );
    }

    #[test]
    fn test_retry_targets_minimum_missing_index() {
        let (mut s, _rx) = scheduler(Mode::SequentialManual);
        let bindings = register_all(&mut s, &["s0", "s1", "s2", "s3"]);

        s.start();
        feed(&mut s, "s0", Value::Int(0));
        feed(&mut s, "s1", Value::Int(1));
        feed(&mut s, "s3", Value::Int(3));

        // 2 is the lowest gap: exactly one targeted read for it. s3's
        // unsolicited arrival triggers nothing.
        assert_eq!(bindings[2].reads(), 1);
        assert_eq!(bindings[3].reads(), 0);
        assert_eq!(s.state(), CycleState::AwaitingResult(2));

        // The awaited result closes the cycle in one step.
        feed(&mut s, "s2", Value::Int(2));
        assert_eq!(s.state(), CycleState::Idle);
    }

    #[test]
    fn test_completion_size_matches_registry() {
        let (mut s, mut rx) = scheduler(Mode::SequentialManual);
        register_all(&mut s, &["a", "b", "c", "d"]);

        s.start();
        for id in ["a", "b", "c", "d"] {
            feed(&mut s, id, Value::Empty);
        }

        let events = drain(&mut rx);
        let complete = of_kind(&events, EventKind::CycleComplete);
        assert_eq!(complete.len(), 1);
        assert_eq!(complete[0].cycle.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn test_order_invariant_under_any_arrival() {
        let (mut s, mut rx) = scheduler(Mode::SequentialManual);
        register_all(&mut s, &["p", "q", "r"]);

        s.start();
        feed(&mut s, "r", Value::Int(2));
        feed(&mut s, "q", Value::Int(1));
        feed(&mut s, "p", Value::Int(0));

        let events = drain(&mut rx);
        let complete = of_kind(&events, EventKind::CycleComplete);
        assert_eq!(complete.len(), 1);
        let cycle = complete[0].cycle.as_ref().unwrap();
        let values: Vec<&Value> = cycle.iter().map(|r| &r.value).collect();
        assert_eq!(values, vec![&Value::Int(0), &Value::Int(1), &Value::Int(2)]);
    }

    #[test]
    fn test_concurrent_mode_never_completes() {
        let (mut s, mut rx) = scheduler(Mode::Concurrent);
        let bindings = register_all(&mut s, &["a", "b"]);

        s.start();
        assert_eq!(bindings[0].reads(), 0, "concurrent start issues nothing");

        for _ in 0..5 {
            feed(&mut s, "a", Value::Int(1));
            feed(&mut s, "b", Value::Int(2));
        }

        let events = drain(&mut rx);
        assert_eq!(of_kind(&events, EventKind::Update).len(), 10);
        assert!(of_kind(&events, EventKind::CycleComplete).is_empty());
        assert_eq!(s.buffered(), 0, "no buffering outside sequential modes");
    }

    #[test]
    fn test_clear_mid_cycle_discards_partial_state() {
        let (mut s, mut rx) = scheduler(Mode::SequentialManual);
        register_all(&mut s, &["a", "b", "c"]);

        s.start();
        feed(&mut s, "a", Value::Int(0));
        feed(&mut s, "c", Value::Int(2));
        assert_eq!(s.buffered(), 2);

        s.clear();

        assert!(s.is_empty());
        assert_eq!(s.buffered(), 0);
        assert_eq!(s.state(), CycleState::Idle);
        let events = drain(&mut rx);
        assert!(of_kind(&events, EventKind::CycleComplete).is_empty());
        assert_eq!(of_kind(&events, EventKind::SourcesCleared).len(), 1);

        // Still usable afterwards.
        s.start();
        assert_eq!(s.state(), CycleState::Idle);
    }

    #[test]
    fn test_remove_source_purges_its_slot() {
        let (mut s, mut rx) = scheduler(Mode::SequentialManual);
        register_all(&mut s, &["a", "b", "c"]);

        s.start();
        feed(&mut s, "a", Value::Int(0));
        assert!(s.remove("a"));

        assert_eq!(s.buffered(), 0);
        assert_eq!(s.sources(), vec!["b".to_string(), "c".to_string()]);
        let events = drain(&mut rx);
        assert!(of_kind(&events, EventKind::CycleComplete).is_empty());
        assert!(!s.remove("a"), "second removal is a no-op");
    }

    #[test]
    fn test_remove_awaited_source_resets_cycle_state() {
        let (mut s, _rx) = scheduler(Mode::SequentialManual);
        register_all(&mut s, &["a", "b"]);

        s.start();
        assert_eq!(s.state(), CycleState::AwaitingResult(0));
        s.remove("a");
        assert_eq!(
            s.state(),
            CycleState::Idle,
            "the read against a disposed binding cannot be answered"
        );
    }

    #[test]
    fn test_unmatched_update_is_forwarded_not_buffered() {
        let (mut s, mut rx) = scheduler(Mode::SequentialManual);
        register_all(&mut s, &["a"]);

        s.start();
        assert_eq!(feed(&mut s, "stranger", Value::Int(9)), None);

        let events = drain(&mut rx);
        let updates = of_kind(&events, EventKind::Update);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].index, None);
        assert_eq!(of_kind(&events, EventKind::UpdateUnmatched).len(), 1);
        assert_eq!(s.buffered(), 0);
    }

    #[test]
    fn test_no_args_label_resolves_to_bare_source() {
        let (mut s, mut rx) = scheduler(Mode::SequentialManual);
        register_all(&mut s, &["x", "cmd"]);

        s.start();
        feed(&mut s, "x", Value::Int(0));
        feed(&mut s, "cmd(1,2)", Value::Int(1));

        let events = drain(&mut rx);
        let complete = of_kind(&events, EventKind::CycleComplete);
        assert_eq!(complete.len(), 1, "invoked-form result fills cmd's slot");
    }

    #[test]
    fn test_duplicate_result_keeps_single_outstanding_read() {
        let (mut s, _rx) = scheduler(Mode::SequentialManual);
        let bindings = register_all(&mut s, &["a", "b"]);

        s.start();
        feed(&mut s, "a", Value::Int(1));
        assert_eq!(bindings[1].reads(), 1);

        // Index 0 again before b answers: buffered overwrite, no second
        // read for b.
        feed(&mut s, "a", Value::Int(2));
        assert_eq!(bindings[1].reads(), 1);

        feed(&mut s, "b", Value::Int(3));
        assert_eq!(s.state(), CycleState::Idle);
    }

    #[test]
    fn test_timed_completion_requests_rearm() {
        let period = Duration::from_millis(500);
        let (mut s, mut rx) = scheduler(Mode::SequentialTimed(period));
        register_all(&mut s, &["a", "b"]);

        s.start();
        assert_eq!(feed(&mut s, "a", Value::Int(0)), None);
        assert_eq!(feed(&mut s, "b", Value::Int(1)), Some(period));

        let events = drain(&mut rx);
        let rearm = of_kind(&events, EventKind::RearmScheduled);
        assert_eq!(rearm.len(), 1);
        assert_eq!(rearm[0].delay_ms, Some(500));
    }

    #[test]
    fn test_set_period_switches_sequential_submode() {
        let (mut s, _rx) = scheduler(Mode::SequentialManual);
        s.set_period(250);
        assert_eq!(s.mode(), Mode::SequentialTimed(Duration::from_millis(250)));
        assert_eq!(s.period(), Some(Duration::from_millis(250)));

        s.set_period(0);
        assert_eq!(s.mode(), Mode::SequentialManual);
        assert_eq!(s.period(), None);

        s.set_period(-7);
        assert_eq!(s.mode(), Mode::SequentialManual);
    }

    #[test]
    fn test_set_period_broadcasts_in_concurrent_mode() {
        let (mut s, _rx) = scheduler(Mode::Concurrent);
        let bindings = register_all(&mut s, &["a", "b"]);

        s.set_period(1000);
        for b in &bindings {
            assert_eq!(b.sent(), vec![Command::Period(Duration::from_millis(1000))]);
        }
        assert_eq!(s.mode(), Mode::Concurrent, "mode unchanged by broadcast");

        // Non-positive periods are ignored in concurrent mode.
        s.set_period(-1);
        for b in &bindings {
            assert_eq!(b.sent().len(), 1);
        }
    }

    #[test]
    fn test_start_with_empty_registry_is_noop() {
        let (mut s, mut rx) = scheduler(Mode::SequentialManual);
        s.start();
        assert_eq!(s.state(), CycleState::Idle);
        assert!(of_kind(&drain(&mut rx), EventKind::ReadIssued).is_empty());
    }

    #[test]
    fn test_start_uses_minimum_of_non_contiguous_indices() {
        let (mut s, _rx) = scheduler(Mode::SequentialManual);
        let b3 = TestBinding::new("three");
        let b7 = TestBinding::new("seven");
        s.register(7, b7.clone());
        s.register(3, b3.clone());

        s.start();
        assert_eq!(b3.reads(), 1);
        assert_eq!(b7.reads(), 0);

        // Completing the pair still orders by index.
        feed(&mut s, "three", Value::Int(3));
        assert_eq!(b7.reads(), 1);
        feed(&mut s, "seven", Value::Int(7));
        assert_eq!(s.state(), CycleState::Idle);
    }

    #[test]
    fn test_send_command_by_id_index_and_unknown() {
        let (s, bindings) = {
            let (mut s, _rx) = scheduler(Mode::Concurrent);
            let b = register_all(&mut s, &["a", "b"]);
            (s, b)
        };

        s.send_command(&SourceKey::Id("a".into()), Command::Read);
        s.send_command(&SourceKey::Index(1), Command::Data(Value::Int(5)));
        s.send_command(&SourceKey::Id("nope".into()), Command::Read);
        s.send_command(&SourceKey::Index(42), Command::Read);

        assert_eq!(bindings[0].sent(), vec![Command::Read]);
        assert_eq!(bindings[1].sent(), vec![Command::Data(Value::Int(5))]);
    }

    #[test]
    fn test_register_overwrite_displaces_stale_binding() {
        let (mut s, _rx) = scheduler(Mode::SequentialManual);
        let old = TestBinding::new("old");
        let new = TestBinding::new("new");
        assert!(s.register(0, old.clone()).is_none());

        let displaced = s.register(0, new.clone());
        assert_eq!(displaced.as_deref(), Some("old"));
        assert_eq!(s.sources(), vec!["new".to_string()]);

        // Commands to the displaced id no longer reach anything.
        s.send_command(&SourceKey::Id("old".into()), Command::Read);
        assert_eq!(old.reads(), 0);
    }

    #[test]
    fn test_spontaneous_result_begins_gap_fill() {
        // No start() call: a result arriving on its own still buffers and
        // drives the cycle in sequential modes.
        let (mut s, _rx) = scheduler(Mode::SequentialManual);
        let bindings = register_all(&mut s, &["a", "b"]);

        feed(&mut s, "b", Value::Int(1));
        assert_eq!(bindings[0].reads(), 1, "gap fill targets index 0");
        feed(&mut s, "a", Value::Int(0));
        assert_eq!(s.state(), CycleState::Idle);
    }
}
