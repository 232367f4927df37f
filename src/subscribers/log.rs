//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [source-added] src=pump/flow index=0
//! [read] src=pump/flow index=0
//! [update] src=pump/flow index=0
//! [unmatched] src=stranger
//! [cycle-complete] n=3
//! [rearm] delay_ms=500
//! [source-removed] src=pump/flow
//! [sources-cleared]
//! [registration-failed] src=bad reason="no transport"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use — implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Update => {
                println!("[update] src={:?} index={:?}", e.src, e.index);
            }
            EventKind::CycleComplete => {
                let n = e.cycle.as_ref().map(|c| c.len()).unwrap_or(0);
                println!("[cycle-complete] n={n}");
            }
            EventKind::ReadIssued => {
                println!("[read] src={:?} index={:?}", e.src, e.index);
            }
            EventKind::RearmScheduled => {
                println!("[rearm] delay_ms={:?}", e.delay_ms);
            }
            EventKind::SourceAdded => {
                println!("[source-added] src={:?} index={:?}", e.src, e.index);
            }
            EventKind::SourceRemoved => {
                println!("[source-removed] src={:?}", e.src);
            }
            EventKind::SourcesCleared => {
                println!("[sources-cleared]");
            }
            EventKind::RegistrationFailed => {
                println!("[registration-failed] src={:?} reason={:?}", e.src, e.reason);
            }
            EventKind::UpdateUnmatched => {
                println!("[unmatched] src={:?}", e.src);
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] name={:?} reason={:?}", e.src, e.reason);
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] name={:?} reason={:?}", e.src, e.reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
