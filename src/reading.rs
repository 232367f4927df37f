//! # Acquisition result payload.
//!
//! A [`Reading`] is what a binding pushes back after one acquisition: the
//! source label the engine tagged the result with, a [`Value`] payload, and
//! a wall-clock timestamp. The scheduler treats the payload as opaque —
//! only the label participates in routing.
//!
//! ## Example
//! ```rust
//! use readvisor::{Reading, Value};
//!
//! let r = Reading::new("plant/vacuum/pressure", Value::Double(2.4e-9));
//! assert_eq!(r.src.as_ref(), "plant/vacuum/pressure");
//! assert_eq!(r.value, Value::Double(2.4e-9));
//! ```

use std::sync::Arc;
use std::time::SystemTime;

/// Payload carried by one acquisition result.
///
/// A small tagged union covering the scalar shapes engines commonly
/// deliver. The scheduler never inspects it; it exists so results and
/// passthrough commands have a concrete, cloneable carrier.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No payload (e.g. a bare acknowledgement).
    #[default]
    Empty,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point scalar.
    Double(f64),
    /// Free-form string.
    Str(String),
}

/// One result pushed by a binding.
///
/// `src` is whatever label the engine stamped on the result. It may be the
/// *invoked* form of the source — canonical id plus trailing call
/// arguments — rather than the canonical id itself; routing handles both
/// (see the no-args fallback in the scheduler).
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    /// Source label the engine tagged this result with.
    pub src: Arc<str>,
    /// Acquired payload.
    pub value: Value,
    /// Wall-clock acquisition timestamp.
    pub at: SystemTime,
}

impl Reading {
    /// Creates a reading stamped with the current time.
    pub fn new(src: impl Into<Arc<str>>, value: Value) -> Self {
        Self {
            src: src.into(),
            value,
            at: SystemTime::now(),
        }
    }
}
