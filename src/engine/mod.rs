//! Reader-engine boundary: the collaborator that performs acquisition.
//!
//! The scheduler never reads anything itself. It consumes the
//! [`ReaderEngine`] capability — create a binding, dispose a binding — and
//! talks to each source through its [`Binding`] handle.
//!
//! ## Contents
//! - [`ReaderEngine`] — binding factory/disposal trait (async seam)
//! - [`Binding`], [`BindingRef`] — per-source command channel
//! - [`BindingOptions`], [`RefreshMode`] — refresh configuration pushed at
//!   creation or later
//! - [`Command`] — the command vocabulary (`Read`, `Period`,
//!   `RefreshMode`, generic `Data` passthrough)
//! - [`SimEngine`], [`SimBinding`] (feature `sim`) — loopback engine for
//!   demos and tests

mod binding;
mod reader;

#[cfg(any(test, feature = "sim"))]
mod sim;

pub use binding::{Binding, BindingOptions, BindingRef, Command, RefreshMode};
pub use reader::ReaderEngine;

#[cfg(any(test, feature = "sim"))]
pub use sim::{SimBinding, SimEngine};
