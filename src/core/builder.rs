//! # Builder: wires bus, fan-out, and the scheduler actor.
//!
//! [`MultiReaderBuilder`] is the explicit factory for scheduler instances:
//! each `build()` produces an independent actor with its own bus, queues
//! and cancellation token. Must be called within a Tokio runtime (it
//! spawns the actor and, when subscribers are present, the fan-out
//! listener).

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::config::{Config, Mode};
use crate::engine::ReaderEngine;
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};

use super::actor::SchedulerActor;
use super::handle::MultiReader;
use super::scheduler::Scheduler;

/// Builder for constructing a [`MultiReader`] instance.
pub struct MultiReaderBuilder {
    engine: Arc<dyn ReaderEngine>,
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl MultiReaderBuilder {
    pub(crate) fn new(engine: Arc<dyn ReaderEngine>) -> Self {
        Self {
            engine,
            cfg: Config::default(),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the dispatch mode the instance starts in.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.cfg.mode = mode;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (updates, cycle completion,
    /// registration lifecycle) through dedicated workers with bounded
    /// queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the instance and spawns its actor.
    pub fn build(self) -> MultiReader {
        let bus = Bus::new(self.cfg.bus_capacity);
        let token = CancellationToken::new();

        if !self.subscribers.is_empty() {
            let set = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));
            spawn_fanout_listener(bus.clone(), set, token.clone());
        }

        let (op_tx, op_rx) = mpsc::channel(self.cfg.op_capacity.max(1));
        let (update_tx, update_rx) = mpsc::channel(self.cfg.update_capacity.max(1));

        let actor = SchedulerActor::new(
            self.engine,
            Scheduler::new(self.cfg.mode, bus.clone()),
            op_rx,
            update_rx,
            update_tx,
            self.cfg.thread_token,
        );
        actor.run(token.clone());

        MultiReader::new(op_tx, bus, token)
    }
}

/// Subscribes to the bus and forwards events to the subscriber set
/// (fire-and-forget).
fn spawn_fanout_listener(bus: Bus, set: Arc<SubscriberSet>, token: CancellationToken) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
        }
    });
}
