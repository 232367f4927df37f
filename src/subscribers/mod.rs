//! # Event subscribers for scheduler observability.
//!
//! This module provides the [`Subscribe`] trait and built-in
//! implementations for handling runtime events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Scheduler ── publish(Event) ──► Bus ──► fan-out listener
//!                                              │
//!                                              ▼
//!                                        SubscriberSet
//!                                    ┌────────┼─────────┐
//!                                    ▼        ▼         ▼
//!                              CycleTracker LogWriter  Custom
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** — observe and react to events (logging,
//!   metrics, alerts)
//! - **Stateful subscribers** — maintain internal state based on events
//!   ([`CycleTracker`])

mod set;
mod subscriber;
mod tracker;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;
pub use tracker::CycleTracker;

#[cfg(feature = "logging")]
pub use log::LogWriter;
