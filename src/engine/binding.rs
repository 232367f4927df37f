//! # Per-source binding handle.
//!
//! A [`Binding`] is the engine-owned channel to one source: commands go
//! down through [`Binding::send`], results come back asynchronously on the
//! update queue the binding was created with. The scheduler holds bindings
//! as [`BindingRef`]s and never disposes them directly — disposal always
//! goes through [`ReaderEngine::dispose_binding`](super::ReaderEngine::dispose_binding).
//!
//! ## Rules
//! - `send` must not block; implementations queue internally.
//! - A binding pushes results to exactly one subscriber (the scheduler
//!   actor that created it).
//! - [`Binding::source`] reports the *canonical* id, which may differ from
//!   the id the binding was requested with.

use std::sync::Arc;
use std::time::Duration;

use crate::reading::Value;

/// Shared reference to an engine-owned binding.
pub type BindingRef = Arc<dyn Binding>;

/// Refresh cadence a binding can be configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshMode {
    /// The binding polls on its own timer.
    Periodic,
    /// The binding refreshes when the underlying system pushes a change.
    Event,
    /// The binding acquires only when commanded (one read per
    /// [`Command::Read`]).
    Manual,
}

/// Options pushed to the engine when a binding is created, or to a live
/// binding through [`Binding::configure`].
///
/// All fields are optional refinements; `Default` leaves the engine's own
/// defaults in place.
#[derive(Clone, Debug, Default)]
pub struct BindingOptions {
    /// Manual refresh: the binding acquires only on [`Command::Read`].
    /// Sequential scheduling requires this.
    pub manual: bool,
    /// Refresh period for self-refreshing bindings.
    pub period: Option<Duration>,
    /// Explicit refresh mode.
    pub refresh_mode: Option<RefreshMode>,
    /// Engine-specific grouping token; bindings sharing a token share an
    /// acquisition thread.
    pub thread_token: Option<String>,
}

impl BindingOptions {
    /// Options requesting manual refresh, everything else at engine
    /// defaults.
    pub fn manual() -> Self {
        Self {
            manual: true,
            ..Self::default()
        }
    }
}

/// Command accepted by a binding.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Trigger one acquisition.
    Read,
    /// Reconfigure the refresh period.
    Period(Duration),
    /// Reconfigure the refresh mode.
    RefreshMode(RefreshMode),
    /// Engine-specific payload passthrough (e.g. a setpoint write).
    Data(Value),
}

/// Engine-owned handle to one source.
pub trait Binding: Send + Sync + 'static {
    /// Canonical id the engine registered this binding under.
    fn source(&self) -> &str;

    /// Pushes updated options to the binding.
    fn configure(&self, opts: &BindingOptions);

    /// Sends a command to the binding. Must not block.
    fn send(&self, cmd: Command);
}
