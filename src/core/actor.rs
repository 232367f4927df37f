//! # Scheduler actor: the single-writer loop.
//!
//! Everything that mutates the scheduler flows through this loop: public
//! operations from [`MultiReader`](super::handle::MultiReader) handles,
//! results pushed by bindings, and the one-shot cycle timer. That is the
//! concrete form of the single-consumer queue the concurrency model
//! requires — results may be produced on any execution context the engine
//! owns, but they are *handled* strictly one at a time, here.
//!
//! ## Loop
//! ```text
//! select (biased):
//!   1. cancellation token        → drain: dispose all bindings, exit
//!   2. re-arm timer (if armed)   → scheduler.start()
//!   3. binding result queue      → scheduler.on_result()
//!   4. operation queue           → handle_op() (acks via oneshot)
//! ```
//!
//! ## Rules
//! - Engine calls (`create_binding`, `dispose_binding`) are the only
//!   suspension points; the scheduler itself never blocks.
//! - Every operation is acknowledged through its `oneshot` once applied,
//!   so callers observe operations in submission order.
//! - A timed-mode completion arms `rearm`; switching mode/period away
//!   from timed disarms it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::config::Mode;
use crate::engine::{BindingOptions, Command, ReaderEngine};
use crate::error::SourceError;
use crate::reading::Reading;

use super::handle::SourceKey;
use super::scheduler::Scheduler;

/// Operations a handle can submit to the actor.
pub(crate) enum Op {
    SetSources {
        srcs: Vec<String>,
        done: oneshot::Sender<()>,
    },
    InsertSource {
        src: String,
        index: i32,
        done: oneshot::Sender<Result<(), SourceError>>,
    },
    RemoveSource {
        src: String,
        done: oneshot::Sender<()>,
    },
    UnsetSources {
        done: oneshot::Sender<()>,
    },
    Sources {
        reply: oneshot::Sender<Vec<String>>,
    },
    GetMode {
        reply: oneshot::Sender<Mode>,
    },
    GetPeriod {
        reply: oneshot::Sender<Option<Duration>>,
    },
    SetMode {
        mode: Mode,
        done: oneshot::Sender<()>,
    },
    SetPeriod {
        ms: i64,
        done: oneshot::Sender<()>,
    },
    Start {
        done: oneshot::Sender<()>,
    },
    SendCommand {
        target: SourceKey,
        cmd: Command,
        done: oneshot::Sender<()>,
    },
}

/// Owns the scheduler and drives it from one task.
pub(crate) struct SchedulerActor {
    engine: Arc<dyn ReaderEngine>,
    scheduler: Scheduler,
    ops: mpsc::Receiver<Op>,
    updates: mpsc::Receiver<Reading>,
    /// Cloned into every created binding as its result sink.
    update_tx: mpsc::Sender<Reading>,
    thread_token: Option<String>,
    /// Deadline of the armed cycle timer, if any.
    rearm: Option<Instant>,
}

impl SchedulerActor {
    pub(crate) fn new(
        engine: Arc<dyn ReaderEngine>,
        scheduler: Scheduler,
        ops: mpsc::Receiver<Op>,
        updates: mpsc::Receiver<Reading>,
        update_tx: mpsc::Sender<Reading>,
        thread_token: Option<String>,
    ) -> Self {
        Self {
            engine,
            scheduler,
            ops,
            updates,
            update_tx,
            thread_token,
            rearm: None,
        }
    }

    /// Starts the actor loop (spawns in background).
    pub(crate) fn run(self, token: CancellationToken) {
        tokio::spawn(self.run_inner(token));
    }

    async fn run_inner(mut self, token: CancellationToken) {
        loop {
            // A disabled branch still constructs its future; park the
            // timer a day out when nothing is armed.
            let deadline = self
                .rearm
                .unwrap_or_else(|| Instant::now() + Duration::from_secs(86_400));

            tokio::select! {
                biased;

                _ = token.cancelled() => break,

                _ = sleep_until(deadline), if self.rearm.is_some() => {
                    self.rearm = None;
                    self.scheduler.start();
                }

                maybe = self.updates.recv() => match maybe {
                    Some(reading) => self.on_reading(reading),
                    None => break,
                },

                maybe = self.ops.recv() => match maybe {
                    Some(op) => self.handle_op(op).await,
                    // Every handle is gone; nothing can reach us anymore.
                    None => break,
                },
            }
        }

        // Bindings must not outlive the scheduler that subscribed to them.
        self.engine.dispose_binding(None).await;
        self.scheduler.clear();
    }

    fn on_reading(&mut self, reading: Reading) {
        if let Some(delay) = self.scheduler.on_result(reading) {
            self.rearm = Some(Instant::now() + delay);
        }
    }

    async fn handle_op(&mut self, op: Op) {
        match op {
            Op::SetSources { srcs, done } => {
                self.unset().await;
                for (i, src) in srcs.iter().enumerate() {
                    // A refused registration is reported on the bus; the
                    // rest of the batch continues.
                    let _ = self.insert(src, i as i32).await;
                }
                let _ = done.send(());
            }
            Op::InsertSource { src, index, done } => {
                let _ = done.send(self.insert(&src, index).await);
            }
            Op::RemoveSource { src, done } => {
                self.engine.dispose_binding(Some(&src)).await;
                self.scheduler.remove(&src);
                let _ = done.send(());
            }
            Op::UnsetSources { done } => {
                self.unset().await;
                let _ = done.send(());
            }
            Op::Sources { reply } => {
                let _ = reply.send(self.scheduler.sources());
            }
            Op::GetMode { reply } => {
                let _ = reply.send(self.scheduler.mode());
            }
            Op::GetPeriod { reply } => {
                let _ = reply.send(self.scheduler.period());
            }
            Op::SetMode { mode, done } => {
                self.scheduler.set_mode(mode);
                if self.scheduler.period().is_none() {
                    self.rearm = None;
                }
                let _ = done.send(());
            }
            Op::SetPeriod { ms, done } => {
                self.scheduler.set_period(ms);
                if self.scheduler.period().is_none() {
                    self.rearm = None;
                }
                let _ = done.send(());
            }
            Op::Start { done } => {
                self.scheduler.start();
                let _ = done.send(());
            }
            Op::SendCommand { target, cmd, done } => {
                self.scheduler.send_command(&target, cmd);
                let _ = done.send(());
            }
        }
    }

    async fn insert(&mut self, src: &str, index: i32) -> Result<(), SourceError> {
        if index < 0 {
            return Err(SourceError::NegativeIndex { index });
        }

        // Sequential scheduling needs the binding under manual refresh
        // from its first instant; the options go to the engine before the
        // binding exists.
        let mut opts = if self.scheduler.mode().is_sequential() {
            BindingOptions::manual()
        } else {
            BindingOptions::default()
        };
        opts.thread_token = self.thread_token.clone();

        match self
            .engine
            .create_binding(src, &opts, self.update_tx.clone())
            .await
        {
            Ok(binding) => {
                if let Some(stale) = self.scheduler.register(index, binding) {
                    // Overwritten at its last index: the binding is
                    // unreachable now, release it engine-side.
                    self.engine.dispose_binding(Some(&stale)).await;
                }
                Ok(())
            }
            Err(err) => {
                self.scheduler.report_registration_failure(&err);
                Err(err.into())
            }
        }
    }

    async fn unset(&mut self) {
        self.engine.dispose_binding(None).await;
        self.scheduler.clear();
        self.rearm = None;
    }
}
