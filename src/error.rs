//! Error types used by the readvisor runtime and the reader-engine boundary.
//!
//! This module defines:
//!
//! - [`RuntimeError`] — errors raised by a [`MultiReader`](crate::MultiReader)
//!   handle itself.
//! - [`SourceError`] — errors raised while registering a source.
//! - [`RegistrationError`] — the failure a reader engine reports when it
//!   cannot create a binding.
//!
//! The enums provide helper methods (`as_label`, `as_message`) for
//! logging/metrics. None of these conditions are fatal to the scheduler:
//! after any of them the instance remains usable.

use thiserror::Error;

/// # Errors produced by a scheduler handle.
///
/// These represent failures of the handle/actor plumbing, not of any
/// individual source.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The scheduler actor is gone; the handle was used after `close()`.
    #[error("scheduler closed")]
    Closed,
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use readvisor::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::Closed.as_label(), "runtime_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Closed => "runtime_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::Closed => "scheduler closed".to_string(),
        }
    }
}

/// # Errors produced while registering a source.
///
/// Registration failures never poison the scheduler: a failed entry in a
/// batch is skipped and the remaining entries continue to register.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SourceError {
    /// A negative index was passed to `insert_source`.
    ///
    /// Configuration error: no state change, no binding created.
    #[error("index {index} is negative; source indices must be >= 0")]
    NegativeIndex {
        /// The rejected index.
        index: i32,
    },

    /// The reader engine refused to create a binding for the source.
    #[error("registration failed for {src}: {reason}")]
    Registration {
        /// The source id the binding was requested for.
        src: String,
        /// Engine-reported reason.
        reason: String,
    },

    /// The scheduler actor is gone; the handle was used after `close()`.
    #[error("scheduler closed")]
    Closed,
}

impl SourceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use readvisor::SourceError;
    ///
    /// let err = SourceError::NegativeIndex { index: -3 };
    /// assert_eq!(err.as_label(), "source_negative_index");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SourceError::NegativeIndex { .. } => "source_negative_index",
            SourceError::Registration { .. } => "source_registration_failed",
            SourceError::Closed => "runtime_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SourceError::NegativeIndex { index } => {
                format!("negative index: {index}")
            }
            SourceError::Registration { src, reason } => {
                format!("registration failed: src={src} reason={reason}")
            }
            SourceError::Closed => "scheduler closed".to_string(),
        }
    }
}

/// Failure a reader engine reports when it cannot create a binding.
///
/// Carried back to the caller as [`SourceError::Registration`] and
/// published on the bus as
/// [`EventKind::RegistrationFailed`](crate::EventKind::RegistrationFailed).
#[derive(Error, Debug, Clone)]
#[error("cannot create binding for {src}: {reason}")]
pub struct RegistrationError {
    /// The source id the binding was requested for.
    pub src: String,
    /// Engine-specific reason.
    pub reason: String,
}

impl From<RegistrationError> for SourceError {
    fn from(e: RegistrationError) -> Self {
        SourceError::Registration {
            src: e.src,
            reason: e.reason,
        }
    }
}
