//! # MultiReader: the public handle to a scheduler instance.
//!
//! A [`MultiReader`] is a cheap, cloneable front over the actor's
//! operation queue. Every method enqueues one operation and awaits its
//! acknowledgement, so two sequential calls on the same handle are applied
//! in order. Results and events are observed through
//! [`MultiReader::subscribe`] or through registered subscribers.
//!
//! ## Example
//! ```rust
//! # #[cfg(feature = "sim")]
//! # {
//! use readvisor::{Mode, MultiReader, SimEngine};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let engine = SimEngine::new();
//! let reader = MultiReader::builder(engine.clone())
//!     .with_mode(Mode::SequentialManual)
//!     .build();
//!
//! reader.set_sources(vec!["a".into(), "b".into()]).await?;
//! reader.start().await?; // one read issued, for "a"
//! reader.close();
//! # Ok::<(), readvisor::RuntimeError>(())
//! # }).unwrap();
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::config::Mode;
use crate::engine::{Command, ReaderEngine};
use crate::error::{RuntimeError, SourceError};
use crate::events::{Bus, Event};

use super::actor::Op;
use super::builder::MultiReaderBuilder;

/// Addresses one registered source, by canonical id or by index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceKey {
    /// Canonical source id.
    Id(String),
    /// Registry index.
    Index(i32),
}

impl From<&str> for SourceKey {
    fn from(id: &str) -> Self {
        SourceKey::Id(id.to_string())
    }
}

impl From<String> for SourceKey {
    fn from(id: String) -> Self {
        SourceKey::Id(id)
    }
}

impl From<i32> for SourceKey {
    fn from(index: i32) -> Self {
        SourceKey::Index(index)
    }
}

/// Handle for driving one scheduler instance.
///
/// Clones share the same actor; independent instances come from
/// independent [`MultiReader::builder`] calls — there is no process-wide
/// shared reader.
#[derive(Clone)]
pub struct MultiReader {
    ops: mpsc::Sender<Op>,
    bus: Bus,
    token: CancellationToken,
}

impl MultiReader {
    /// Starts building a scheduler instance over the given engine.
    pub fn builder(engine: Arc<dyn ReaderEngine>) -> MultiReaderBuilder {
        MultiReaderBuilder::new(engine)
    }

    pub(crate) fn new(ops: mpsc::Sender<Op>, bus: Bus, token: CancellationToken) -> Self {
        Self { ops, bus, token }
    }

    /// Replaces the whole source set: disposes every current binding, then
    /// registers `srcs` at indices `0..n` in order.
    ///
    /// A registration the engine refuses is skipped and reported on the
    /// bus; the rest of the batch continues.
    pub async fn set_sources(&self, srcs: Vec<String>) -> Result<(), RuntimeError> {
        let (done, rx) = oneshot::channel();
        self.op(Op::SetSources { srcs, done }, rx).await
    }

    /// Registers one source at `index` (≥ 0). Overwrites whatever id
    /// previously held the index.
    pub async fn insert_source(
        &self,
        src: impl Into<String>,
        index: i32,
    ) -> Result<(), SourceError> {
        let (done, rx) = oneshot::channel();
        self.op(
            Op::InsertSource {
                src: src.into(),
                index,
                done,
            },
            rx,
        )
        .await
        .map_err(|_| SourceError::Closed)?
    }

    /// Disposes the binding for `src` (canonical id) and drops every index
    /// registered for it. Unknown ids are a no-op.
    pub async fn remove_source(&self, src: impl Into<String>) -> Result<(), RuntimeError> {
        let (done, rx) = oneshot::channel();
        self.op(
            Op::RemoveSource {
                src: src.into(),
                done,
            },
            rx,
        )
        .await
    }

    /// Disposes every binding and discards any partial cycle, without
    /// emitting a completion event.
    pub async fn unset_sources(&self) -> Result<(), RuntimeError> {
        let (done, rx) = oneshot::channel();
        self.op(Op::UnsetSources { done }, rx).await
    }

    /// Canonical source ids, ascending by index.
    pub async fn sources(&self) -> Result<Vec<String>, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.op(Op::Sources { reply }, rx).await
    }

    /// Current dispatch mode.
    pub async fn mode(&self) -> Result<Mode, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.op(Op::GetMode { reply }, rx).await
    }

    /// Current cycle period; `Some` only in [`Mode::SequentialTimed`].
    pub async fn period(&self) -> Result<Option<Duration>, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.op(Op::GetPeriod { reply }, rx).await
    }

    /// Changes the dispatch policy for subsequent operations; already
    /// bound readers keep their configuration.
    pub async fn set_mode(&self, mode: Mode) -> Result<(), RuntimeError> {
        let (done, rx) = oneshot::channel();
        self.op(Op::SetMode { mode, done }, rx).await
    }

    /// Updates the period, in milliseconds.
    ///
    /// Sequential modes: the sign picks the timed (`ms > 0`) or manual
    /// (`ms ≤ 0`) sub-mode for future re-arms. Concurrent mode: a positive
    /// period is broadcast to every active binding.
    pub async fn set_period(&self, ms: i64) -> Result<(), RuntimeError> {
        let (done, rx) = oneshot::channel();
        self.op(Op::SetPeriod { ms, done }, rx).await
    }

    /// Begins a cycle (sequential modes): one read for the minimum-index
    /// source. No-op when no sources are registered.
    pub async fn start(&self) -> Result<(), RuntimeError> {
        let (done, rx) = oneshot::channel();
        self.op(Op::Start { done }, rx).await
    }

    /// Sends a command to one source. Unknown targets are a no-op.
    pub async fn send_command(
        &self,
        target: impl Into<SourceKey>,
        cmd: Command,
    ) -> Result<(), RuntimeError> {
        let (done, rx) = oneshot::channel();
        self.op(
            Op::SendCommand {
                target: target.into(),
                cmd,
                done,
            },
            rx,
        )
        .await
    }

    /// New independent receiver for runtime events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Stops the actor. Bindings are disposed engine-side; operations on
    /// any clone of this handle fail with `Closed` afterwards.
    pub fn close(&self) {
        self.token.cancel();
    }

    async fn op<T>(&self, op: Op, rx: oneshot::Receiver<T>) -> Result<T, RuntimeError> {
        self.ops.send(op).await.map_err(|_| RuntimeError::Closed)?;
        rx.await.map_err(|_| RuntimeError::Closed)
    }
}
