//! # readvisor
//!
//! **Readvisor** is a scatter/gather read scheduler for Rust.
//!
//! It coordinates reading of several independent, externally-acquired data
//! sources as either an unordered concurrent sweep or an ordered
//! sequential cycle with completion detection and gap-filling retries. It
//! is a building block for UI/notification layers that want "all N
//! sources read" as one atomic event in addition to per-source updates.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!  │   Binding    │   │   Binding    │   │   Binding    │  (engine-owned,
//!  │  (source 0)  │   │  (source 1)  │   │  (source N)  │   one per source)
//!  └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!         │  results         │  results         │
//!         └─────────────────┬┴──────────────────┘
//!                           ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  SchedulerActor (single-writer loop)                              │
//! │  - operation queue (MultiReader handles)                          │
//! │  - update queue (binding results)                                 │
//! │  - one-shot cycle timer (SequentialTimed re-arm)                  │
//! │  - Scheduler: registry + cycle buffer + routing + retry policy    │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                │ publish(Event)
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! └──────────┬────────────────────────────────────────┬───────────────┘
//!            ▼                                        ▼
//!   user receivers                            fan-out listener
//!   (MultiReader::subscribe)                          │
//!                                               SubscriberSet
//!                                           ┌─────────┼─────────┐
//!                                           ▼         ▼         ▼
//!                                       sub1.on   sub2.on   subN.on
//!                                       _event()  _event()  _event()
//! ```
//!
//! ### Sequential cycle
//! ```text
//! start() ──► read(min index) ──► result arrives
//!                                     │
//!                       ┌─────────────┴─────────────┐
//!                       │ gap remains?              │ cycle full?
//!                       ▼                           ▼
//!              read(min missing index)      CycleComplete event
//!              (deterministic retry          (ordered by index)
//!               order, one read in                  │
//!               flight at a time)        period > 0 ─► re-arm timer
//!                                        period ≤ 0 ─► stay idle
//! ```
//!
//! ## Features
//! | Area              | Description                                                         | Key types / traits                    |
//! |-------------------|---------------------------------------------------------------------|---------------------------------------|
//! | **Scheduling**    | Concurrent sweep or sequential cycles with gap-filling retries.     | [`MultiReader`], [`Mode`]             |
//! | **Engine seam**   | Bring your own acquisition engine; the scheduler stays transport-free. | [`ReaderEngine`], [`Binding`]      |
//! | **Subscriber API**| Hook into runtime events (updates, cycle completion, diagnostics).  | [`Subscribe`], [`CycleTracker`]       |
//! | **Events**        | Broadcast bus with sequence-numbered events.                        | [`Event`], [`EventKind`], [`Bus`]     |
//! | **Errors**        | Typed, non-fatal errors for registration and handle plumbing.       | [`SourceError`], [`RuntimeError`]     |
//! | **Configuration** | Per-instance mode, capacities, engine thread token.                 | [`Config`]                            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//! - `sim`: exports a loopback [`SimEngine`] for demos and downstream tests.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use tokio::sync::mpsc;
//!
//! use readvisor::{
//!     Binding, BindingOptions, BindingRef, Command, EventKind, Mode, MultiReader,
//!     Reading, ReaderEngine, RegistrationError, Value,
//! };
//!
//! // Engine whose bindings answer every read immediately.
//! struct EchoEngine;
//!
//! struct EchoBinding {
//!     src: String,
//!     updates: mpsc::Sender<Reading>,
//! }
//!
//! impl Binding for EchoBinding {
//!     fn source(&self) -> &str {
//!         &self.src
//!     }
//!
//!     fn configure(&self, _opts: &BindingOptions) {}
//!
//!     fn send(&self, cmd: Command) {
//!         if matches!(cmd, Command::Read) {
//!             let _ = self
//!                 .updates
//!                 .try_send(Reading::new(self.src.as_str(), Value::Empty));
//!         }
//!     }
//! }
//!
//! #[async_trait]
//! impl ReaderEngine for EchoEngine {
//!     async fn create_binding(
//!         &self,
//!         src: &str,
//!         _opts: &BindingOptions,
//!         updates: mpsc::Sender<Reading>,
//!     ) -> Result<BindingRef, RegistrationError> {
//!         Ok(Arc::new(EchoBinding {
//!             src: src.to_string(),
//!             updates,
//!         }))
//!     }
//!
//!     async fn dispose_binding(&self, _src: Option<&str>) {}
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let reader = MultiReader::builder(Arc::new(EchoEngine))
//!         .with_mode(Mode::SequentialManual)
//!         .build();
//!     let mut events = reader.subscribe();
//!
//!     reader
//!         .set_sources(vec!["a".into(), "b".into(), "c".into()])
//!         .await?;
//!     reader.start().await?;
//!
//!     loop {
//!         let ev = events.recv().await?;
//!         if ev.kind == EventKind::CycleComplete {
//!             assert_eq!(ev.cycle.unwrap().len(), 3);
//!             break;
//!         }
//!     }
//!     reader.close();
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod engine;
mod error;
mod events;
mod reading;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{MultiReader, MultiReaderBuilder, SourceKey};
pub use config::{Config, Mode};
pub use engine::{Binding, BindingOptions, BindingRef, Command, ReaderEngine, RefreshMode};
pub use error::{RegistrationError, RuntimeError, SourceError};
pub use events::{Bus, Event, EventKind};
pub use reading::{Reading, Value};
pub use subscribers::{CycleTracker, Subscribe, SubscriberSet};

// Optional: expose the loopback engine for demos and downstream tests.
// Enable with: `--features sim`
#[cfg(any(test, feature = "sim"))]
pub use engine::{SimBinding, SimEngine};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
