//! # Runtime events emitted by the supervisor and the aggregator.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Round events**: one per tick, pass or fail
//! - **Probe diagnostics**: a probe call stalled or panicked and was forced
//!   into a fault bit
//! - **Verdict / lifecycle**: the budget round sealed the printed verdict,
//!   or shutdown was requested
//! - **Subscriber diagnostics**: a subscriber queue overflowed or a
//!   subscriber panicked
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! worker names, round numbers, and the round's fault mask.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use checkvisor::{Event, EventKind, FaultMask};
//!
//! let ev = Event::new(EventKind::RoundFailed)
//!     .with_round(10)
//!     .with_mask(FaultMask::from_bits(0b10));
//!
//! assert_eq!(ev.kind, EventKind::RoundFailed);
//! assert_eq!(ev.round, Some(10));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::faults::FaultMask;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Round outcomes ===
    /// Every registered probe answered true for this round.
    ///
    /// Sets:
    /// - `round`: round number (1-based)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RoundPassed,

    /// At least one probe failed this round.
    ///
    /// Sets:
    /// - `round`: round number
    /// - `mask`: the round's fault bitmask (nonzero)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    RoundFailed,

    // === Probe diagnostics ===
    /// A probe did not answer within the configured deadline; its fault bit
    /// was forced for this round.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `round`: round number
    /// - `timeout_ms`: configured probe deadline (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ProbeStalled,

    /// A probe panicked; its fault bit was forced for this round.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `round`: round number
    /// - `reason`: panic message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ProbePanicked,

    // === Verdict / lifecycle ===
    /// The reporting step for one round panicked and was contained; the loop
    /// keeps ticking.
    ///
    /// Sets:
    /// - `round`: round number
    /// - `reason`: panic message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ReportFaulted,

    /// The round budget was reached and the printed verdict is now frozen.
    /// Emitted exactly once per supervisor lifetime.
    ///
    /// Sets:
    /// - `round`: the budget round
    /// - `passed`: whether "Test passed" was printed
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    VerdictSealed,

    /// Shutdown requested (cancellation or OS signal observed).
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ShutdownRequested,

    // === Subscriber diagnostics ===
    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `worker`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `worker`: subscriber name
    /// - `reason`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberPanicked,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Supervision round the event belongs to (1-based).
    pub round: Option<u64>,
    /// Worker (or subscriber) name, if applicable.
    pub worker: Option<Arc<str>>,
    /// Fault mask of the round, for round-failure events.
    pub mask: Option<FaultMask>,
    /// Probe deadline in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Whether the sealed verdict was a pass (only for `VerdictSealed`).
    pub passed: Option<bool>,
    /// Human-readable reason (panic messages, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            round: None,
            worker: None,
            mask: None,
            timeout_ms: None,
            passed: None,
            reason: None,
        }
    }

    /// Attaches a round number.
    #[inline]
    pub fn with_round(mut self, round: u64) -> Self {
        self.round = Some(round);
        self
    }

    /// Attaches a worker (or subscriber) name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches a fault mask.
    #[inline]
    pub fn with_mask(mut self, mask: FaultMask) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Attaches a probe deadline (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches the sealed verdict outcome.
    #[inline]
    pub fn with_passed(mut self, passed: bool) -> Self {
        self.passed = Some(passed);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_worker(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_worker(subscriber)
            .with_reason(info)
    }
}

/// Best-effort extraction of a panic payload's message.
pub(crate) fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_strictly_increasing() {
        let a = Event::new(EventKind::RoundPassed);
        let b = Event::new(EventKind::RoundPassed);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::new(EventKind::ProbeStalled)
            .with_worker("queues")
            .with_round(4)
            .with_timeout(Duration::from_millis(250));

        assert_eq!(ev.worker.as_deref(), Some("queues"));
        assert_eq!(ev.round, Some(4));
        assert_eq!(ev.timeout_ms, Some(250));
        assert!(ev.mask.is_none());
    }

    #[test]
    fn test_panic_reason_handles_common_payloads() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("str payload");
        assert_eq!(panic_reason(boxed.as_ref()), "str payload");

        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("string payload"));
        assert_eq!(panic_reason(boxed.as_ref()), "string payload");

        let boxed: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_reason(boxed.as_ref()), "non-string panic payload");
    }
}
