//! # Reader-engine collaborator trait.
//!
//! [`ReaderEngine`] is the boundary to whatever actually performs
//! acquisition — a device protocol, a network client, a simulator. The
//! scheduler consumes this capability and nothing more: it asks for
//! bindings, sends them commands, and receives their results on the update
//! queue it handed over at creation.
//!
//! ## Contract
//! - The engine owns binding lifetime. The scheduler keeps non-owning
//!   [`BindingRef`]s and always releases sources through
//!   [`ReaderEngine::dispose_binding`].
//! - `create_binding` receives the refresh options *up front* so the
//!   binding starts under the right mode (sequential scheduling requires
//!   manual refresh from the first instant — a binding that free-runs even
//!   briefly can corrupt a cycle).
//! - The engine may canonicalize the requested id; all later lookups use
//!   the canonical form reported by [`Binding::source`](super::Binding::source).

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::RegistrationError;
use crate::reading::Reading;

use super::binding::{BindingOptions, BindingRef};

/// Capability to create and dispose per-source bindings.
///
/// Implementations are expected to be cheap to share (`Arc`) and to keep
/// `dispose_binding` idempotent: disposing an unknown id is a no-op.
#[async_trait]
pub trait ReaderEngine: Send + Sync + 'static {
    /// Creates a binding for `src`, configured with `opts`.
    ///
    /// Every result the binding produces is pushed into `updates`; the
    /// receiving end is the scheduler actor, the single subscriber.
    ///
    /// The returned handle reports the canonical id via
    /// [`Binding::source`](super::Binding::source), which may differ from
    /// `src`.
    async fn create_binding(
        &self,
        src: &str,
        opts: &BindingOptions,
        updates: mpsc::Sender<Reading>,
    ) -> Result<BindingRef, RegistrationError>;

    /// Disposes the binding for `src`, or every binding when `None`.
    async fn dispose_binding(&self, src: Option<&str>);
}
