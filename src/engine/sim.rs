//! # Loopback reader engine for demos and tests.
//!
//! [`SimEngine`] implements [`ReaderEngine`] without any I/O: bindings
//! record the options and commands they receive, results are injected by
//! the test/demo through [`SimEngine::push`] or [`SimBinding::push_as`],
//! and a binding can be told to answer every read command immediately with
//! [`SimBinding::set_auto_reply`].
//!
//! This is reference material, not a production engine — enable it with
//! the `sim` feature.
//!
//! ## Example
//! ```rust
//! # #[cfg(feature = "sim")]
//! # {
//! use readvisor::SimEngine;
//!
//! let engine = SimEngine::new();
//! engine.fail_for("broken/source"); // next registration for this id fails
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::RegistrationError;
use crate::reading::{Reading, Value};

use super::binding::{Binding, BindingOptions, BindingRef, Command};
use super::reader::ReaderEngine;

type Canonicalizer = Box<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Default)]
struct EngineState {
    bindings: HashMap<String, Arc<SimBinding>>,
    disposed: Vec<String>,
    fail: HashSet<String>,
}

/// Loopback engine: owns [`SimBinding`]s keyed by canonical id.
pub struct SimEngine {
    state: Mutex<EngineState>,
    canonicalize: Option<Canonicalizer>,
}

impl SimEngine {
    /// Engine with identity canonicalization.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(EngineState::default()),
            canonicalize: None,
        })
    }

    /// Engine that rewrites every requested id through `f` at creation,
    /// the way real engines expand shorthand ids to fully-qualified ones.
    pub fn canonicalizing(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(EngineState::default()),
            canonicalize: Some(Box::new(f)),
        })
    }

    /// Makes the next (and any later) registration for `src` fail.
    pub fn fail_for(&self, src: &str) {
        self.state.lock().unwrap().fail.insert(src.to_string());
    }

    /// Live binding for a canonical id, if any.
    pub fn binding(&self, src: &str) -> Option<Arc<SimBinding>> {
        self.state.lock().unwrap().bindings.get(src).cloned()
    }

    /// Canonical ids disposed so far, in disposal order.
    pub fn disposed(&self) -> Vec<String> {
        self.state.lock().unwrap().disposed.clone()
    }

    /// Injects one result for the binding registered under `src`.
    ///
    /// Returns false when no such binding exists or its queue is full.
    pub fn push(&self, src: &str, value: Value) -> bool {
        match self.binding(src) {
            Some(b) => b.push(value),
            None => false,
        }
    }
}

#[async_trait]
impl ReaderEngine for SimEngine {
    async fn create_binding(
        &self,
        src: &str,
        opts: &BindingOptions,
        updates: mpsc::Sender<Reading>,
    ) -> Result<BindingRef, RegistrationError> {
        let canonical = match &self.canonicalize {
            Some(f) => f(src),
            None => src.to_string(),
        };

        let mut state = self.state.lock().unwrap();
        if state.fail.contains(src) || state.fail.contains(canonical.as_str()) {
            return Err(RegistrationError {
                src: src.to_string(),
                reason: "simulated registration failure".to_string(),
            });
        }

        let binding = Arc::new(SimBinding {
            src: canonical.clone().into(),
            updates,
            state: Mutex::new(BindingState::new(opts.clone())),
        });
        state.bindings.insert(canonical, binding.clone());
        Ok(binding)
    }

    async fn dispose_binding(&self, src: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        match src {
            Some(s) => {
                if state.bindings.remove(s).is_some() {
                    state.disposed.push(s.to_string());
                }
            }
            None => {
                let mut ids: Vec<String> = state.bindings.keys().cloned().collect();
                ids.sort_unstable();
                state.bindings.clear();
                state.disposed.extend(ids);
            }
        }
    }
}

struct BindingState {
    options: BindingOptions,
    commands: Vec<Command>,
    auto_reply: Option<Value>,
}

impl BindingState {
    fn new(options: BindingOptions) -> Self {
        Self {
            options,
            commands: Vec::new(),
            auto_reply: None,
        }
    }
}

/// Binding owned by a [`SimEngine`].
pub struct SimBinding {
    src: Arc<str>,
    updates: mpsc::Sender<Reading>,
    state: Mutex<BindingState>,
}

impl SimBinding {
    /// Every command received so far, in order.
    pub fn commands(&self) -> Vec<Command> {
        self.state.lock().unwrap().commands.clone()
    }

    /// Number of [`Command::Read`]s received so far.
    pub fn reads(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .commands
            .iter()
            .filter(|c| matches!(c, Command::Read))
            .count()
    }

    /// Options the binding currently holds (creation options overlaid with
    /// any later `configure` calls).
    pub fn options(&self) -> BindingOptions {
        self.state.lock().unwrap().options.clone()
    }

    /// Makes the binding answer every subsequent read command immediately
    /// with `value`, tagged with its canonical id.
    pub fn set_auto_reply(&self, value: Value) {
        self.state.lock().unwrap().auto_reply = Some(value);
    }

    /// Injects one result tagged with the canonical id.
    pub fn push(&self, value: Value) -> bool {
        let src = self.src.to_string();
        self.push_as(&src, value)
    }

    /// Injects one result tagged with an arbitrary label, e.g. the invoked
    /// form `"cmd(1,2)"` of a source registered as `"cmd"`.
    pub fn push_as(&self, label: &str, value: Value) -> bool {
        self.updates.try_send(Reading::new(label, value)).is_ok()
    }
}

impl Binding for SimBinding {
    fn source(&self) -> &str {
        &self.src
    }

    fn configure(&self, opts: &BindingOptions) {
        self.state.lock().unwrap().options = opts.clone();
    }

    fn send(&self, cmd: Command) {
        let auto = {
            let mut state = self.state.lock().unwrap();
            state.commands.push(cmd.clone());
            match (&cmd, &state.auto_reply) {
                (Command::Read, Some(v)) => Some(v.clone()),
                _ => None,
            }
        };
        if let Some(value) = auto {
            self.push(value);
        }
    }
}
