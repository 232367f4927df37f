//! # Runtime configuration and dispatch mode.
//!
//! [`Config`] defines a scheduler instance's behavior: dispatch [`Mode`],
//! queue capacities, and the optional acquisition-thread token forwarded to
//! the reader engine.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use readvisor::{Config, Mode};
//!
//! let mut cfg = Config::default();
//! cfg.mode = Mode::SequentialTimed(Duration::from_millis(500));
//! cfg.bus_capacity = 256;
//!
//! assert!(cfg.mode.is_sequential());
//! ```

use std::time::Duration;

/// Dispatch mode of a scheduler instance.
///
/// Exactly one mode is active at a time. Switching modes affects
/// subsequent operations only; it never retroactively reconfigures
/// readers that are already bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Every source refreshes on its own cadence. Results are forwarded as
    /// single updates, never buffered, and cycle completion never fires.
    Concurrent,
    /// Ordered cycles: one read at a time, lowest index first. After each
    /// complete cycle a one-shot timer re-arms the next cycle after the
    /// given period (> 0).
    SequentialTimed(Duration),
    /// Ordered cycles started only by an explicit `start()` call
    /// (the period ≤ 0 sub-mode).
    SequentialManual,
}

impl Mode {
    /// True for both sequential sub-modes.
    pub fn is_sequential(&self) -> bool {
        !matches!(self, Mode::Concurrent)
    }

    /// Picks the sequential sub-mode from a period in milliseconds:
    /// positive → [`Mode::SequentialTimed`], otherwise
    /// [`Mode::SequentialManual`].
    pub fn sequential_from_millis(ms: i64) -> Self {
        if ms > 0 {
            Mode::SequentialTimed(Duration::from_millis(ms as u64))
        } else {
            Mode::SequentialManual
        }
    }

    /// Cycle re-arm period; `Some` only in [`Mode::SequentialTimed`].
    pub fn period(&self) -> Option<Duration> {
        match self {
            Mode::SequentialTimed(p) => Some(*p),
            Mode::SequentialManual | Mode::Concurrent => None,
        }
    }
}

/// Configuration for one scheduler instance.
#[derive(Clone, Debug)]
pub struct Config {
    /// Dispatch mode the instance starts in.
    pub mode: Mode,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
    /// Capacity of the binding-result queue feeding the scheduler actor.
    pub update_capacity: usize,
    /// Capacity of the operation queue between handles and the actor.
    pub op_capacity: usize,
    /// Engine-specific grouping token copied into every binding's options
    /// (readers sharing a token share an acquisition thread).
    pub thread_token: Option<String>,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `mode = Mode::Concurrent`
    /// - `bus_capacity = 1024`
    /// - `update_capacity = 256`
    /// - `op_capacity = 64`
    /// - `thread_token = None`
    fn default() -> Self {
        Self {
            mode: Mode::Concurrent,
            bus_capacity: 1024,
            update_capacity: 256,
            op_capacity: 64,
            thread_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_from_millis_sign() {
        assert_eq!(
            Mode::sequential_from_millis(500),
            Mode::SequentialTimed(Duration::from_millis(500))
        );
        assert_eq!(Mode::sequential_from_millis(0), Mode::SequentialManual);
        assert_eq!(Mode::sequential_from_millis(-1), Mode::SequentialManual);
    }

    #[test]
    fn test_period_only_in_timed() {
        assert_eq!(
            Mode::SequentialTimed(Duration::from_secs(1)).period(),
            Some(Duration::from_secs(1))
        );
        assert_eq!(Mode::SequentialManual.period(), None);
        assert_eq!(Mode::Concurrent.period(), None);
    }
}
