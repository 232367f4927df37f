//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the scheduler and the
//! subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the scheduler (updates, cycle completion, reads,
//!   registration lifecycle) and `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the fan-out listener (forwards to `SubscriberSet`) and
//!   any receiver obtained from
//!   [`MultiReader::subscribe`](crate::MultiReader::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
