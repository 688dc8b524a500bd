//! # SubscriberSet: non-blocking fan-out over multiple subscribers.
//!
//! [`SubscriberSet`] distributes each [`Event`](crate::events::Event) to
//! multiple subscribers **without awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and republished on the bus
//!   (isolation).
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow (events are dropped for that
//!   subscriber, and an overflow diagnostic is published).
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        ├────────────────► [queue S2] ─► worker S2 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Bus, Event, EventKind, panic_reason};

use super::Subscribe;

/// Per-subscriber channel with metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// `bus` receives the overflow/panic diagnostics this set produces.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let s = Arc::clone(&sub);
            let diag = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let is_diag = matches!(
                        ev.kind,
                        EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
                    );
                    // A subscriber's own diagnostics would feed back into its
                    // queue forever.
                    if is_diag && ev.worker.as_deref() == Some(s.name()) {
                        continue;
                    }
                    let fut = s.on_event(ev.as_ref());
                    if let Err(payload) = AssertUnwindSafe(fut).catch_unwind().await {
                        // Panics on diagnostic events are swallowed: republishing
                        // them could ping-pong between two broken subscribers.
                        if !is_diag {
                            diag.publish(Event::subscriber_panicked(
                                s.name(),
                                panic_reason(payload.as_ref()),
                            ));
                        }
                    }
                }
            });

            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Fan-out one event to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is **full** or **closed**, the event is dropped
    /// for it and an overflow diagnostic is published.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    self.bus
                        .publish(Event::subscriber_overflow(channel.name, "full"));
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    self.bus
                        .publish(Event::subscriber_overflow(channel.name, "closed"));
                }
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Collector {
        kinds: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Collector {
        async fn on_event(&self, event: &Event) {
            self.kinds.lock().unwrap().push(event.kind);
        }

        fn name(&self) -> &'static str {
            "collector"
        }
    }

    #[tokio::test]
    async fn test_emit_reaches_subscriber_in_order() {
        let bus = Bus::new(16);
        let collector = Arc::new(Collector {
            kinds: Mutex::new(Vec::new()),
        });
        let set = SubscriberSet::new(vec![collector.clone() as Arc<dyn Subscribe>], bus);

        set.emit(&Event::new(EventKind::RoundPassed).with_round(1));
        set.emit(&Event::new(EventKind::RoundFailed).with_round(2));
        set.shutdown().await;

        let kinds = collector.kinds.lock().unwrap();
        assert_eq!(*kinds, vec![EventKind::RoundPassed, EventKind::RoundFailed]);
    }

    #[tokio::test]
    async fn test_panicking_subscriber_publishes_diagnostic() {
        struct Exploder;

        #[async_trait]
        impl Subscribe for Exploder {
            async fn on_event(&self, _event: &Event) {
                panic!("subscriber bug");
            }

            fn name(&self) -> &'static str {
                "exploder"
            }
        }

        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Exploder) as Arc<dyn Subscribe>], bus);

        set.emit(&Event::new(EventKind::RoundPassed).with_round(1));
        set.shutdown().await;

        let ev = rx.recv().await.expect("diagnostic event");
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.worker.as_deref(), Some("exploder"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber bug"));
    }
}
