//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [round-ok] round=3
//! [round-failed] round=10 mask=0x2
//! [probe-stalled] worker=queues round=4 timeout_ms=250
//! [probe-panicked] worker=queues round=4 reason="index out of bounds"
//! [report-faulted] round=7 reason="sink went away"
//! [verdict-sealed] round=25 passed=true
//! [shutdown-requested]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
#[derive(Debug, Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::RoundPassed => {
                if let Some(round) = e.round {
                    println!("[round-ok] round={round}");
                }
            }
            EventKind::RoundFailed => {
                if let (Some(round), Some(mask)) = (e.round, e.mask) {
                    println!("[round-failed] round={round} mask={mask}");
                }
            }
            EventKind::ProbeStalled => {
                println!(
                    "[probe-stalled] worker={:?} round={:?} timeout_ms={:?}",
                    e.worker, e.round, e.timeout_ms
                );
            }
            EventKind::ProbePanicked => {
                println!(
                    "[probe-panicked] worker={:?} round={:?} reason={:?}",
                    e.worker, e.round, e.reason
                );
            }
            EventKind::ReportFaulted => {
                println!("[report-faulted] round={:?} reason={:?}", e.round, e.reason);
            }
            EventKind::VerdictSealed => {
                if let (Some(round), Some(passed)) = (e.round, e.passed) {
                    println!("[verdict-sealed] round={round} passed={passed}");
                }
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.worker, e.reason
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={:?} reason={:?}",
                    e.worker, e.reason
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
