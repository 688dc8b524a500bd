//! # Heartbeat probe: liveness from a beat counter.
//!
//! A [`Heartbeat`] holds an atomic beat counter. The watched worker keeps a
//! cheap [`Pulse`] handle and calls [`Pulse::pulse`] whenever it makes
//! progress; the probe compares the counter against the value it saw at the
//! previous poll. An unchanged counter means the worker made no progress over
//! a full supervision period and is reported as not running.
//!
//! ## Rules
//! - Single poller: the supervisor is the only reader. Polling from several
//!   places would split the "since last poll" window between them.
//! - A heartbeat that has never pulsed reports `false` on the first poll -
//!   a worker that never started is a failed worker, not an unknown one.
//! - Counter wrap-around is a non-issue at u64 width.
//!
//! ## Example
//! ```rust
//! use checkvisor::{Heartbeat, Liveness};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let hb = Heartbeat::arc("block-queues");
//! let pulse = hb.pulse_handle();
//!
//! pulse.pulse();
//! assert!(hb.is_running().await);   // beat since last poll
//! assert!(!hb.is_running().await);  // nothing since, worker counts as stalled
//! # }
//! ```

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::probes::probe::Liveness;

/// Beat-counter probe, one per worker category.
///
/// The worker side holds a [`Pulse`] and beats it as it makes progress; the
/// supervisor polls [`Liveness::is_running`] once per round. No lock is
/// involved: the worker increments, the probe reads and remembers.
pub struct Heartbeat {
    name: Cow<'static, str>,
    beats: Arc<AtomicU64>,
    /// Counter value at the previous poll. Written only by the polling side.
    seen: AtomicU64,
}

impl Heartbeat {
    /// Creates a heartbeat with zero beats recorded.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            beats: Arc::new(AtomicU64::new(0)),
            seen: AtomicU64::new(0),
        }
    }

    /// Creates the heartbeat and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>) -> Arc<Self> {
        Arc::new(Self::new(name))
    }

    /// Returns the worker-side handle used to record progress.
    ///
    /// Handles are cheap to clone and safe to beat from any task or thread.
    pub fn pulse_handle(&self) -> Pulse {
        Pulse {
            beats: Arc::clone(&self.beats),
        }
    }

    /// Total beats recorded so far.
    pub fn beats(&self) -> u64 {
        self.beats.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Liveness for Heartbeat {
    fn name(&self) -> &str {
        &self.name
    }

    /// True iff the counter moved since the previous poll.
    async fn is_running(&self) -> bool {
        let now = self.beats.load(Ordering::Relaxed);
        let prev = self.seen.swap(now, Ordering::Relaxed);
        now != prev
    }
}

/// Worker-side handle to a [`Heartbeat`] counter.
#[derive(Clone)]
pub struct Pulse {
    beats: Arc<AtomicU64>,
}

impl Pulse {
    /// Records one unit of progress.
    #[inline]
    pub fn pulse(&self) {
        self.beats.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unpulsed_heartbeat_reports_not_running() {
        let hb = Heartbeat::new("never-started");
        assert!(!hb.is_running().await, "first observation must count as a failure");
    }

    #[tokio::test]
    async fn test_pulse_marks_alive_until_next_poll() {
        let hb = Heartbeat::new("worker");
        let pulse = hb.pulse_handle();

        pulse.pulse();
        assert!(hb.is_running().await);
        assert!(!hb.is_running().await, "no beat between polls means stalled");

        pulse.pulse();
        pulse.pulse();
        assert!(hb.is_running().await);
    }

    #[tokio::test]
    async fn test_pulse_handles_share_one_counter() {
        let hb = Heartbeat::new("worker");
        let a = hb.pulse_handle();
        let b = a.clone();

        a.pulse();
        b.pulse();
        assert_eq!(hb.beats(), 2);
        assert!(hb.is_running().await);
    }
}
