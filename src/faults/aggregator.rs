//! # Produce one fault bitmask per supervision round.
//!
//! [`FaultAggregator`] owns the immutable slot table and, once per round,
//! polls every slot's probe in registration order, ORing each failing slot's
//! bit into a fresh [`FaultMask`].
//!
//! ## Containment
//! A probe call that misbehaves must not take the round (or the supervisor)
//! down with it, so each poll is isolated:
//!
//! ```text
//! poll_slot(slot):
//!   probe.is_running()  (catch_unwind, optional timeout)
//!       │
//!       ├─ Ok(true)   → slot healthy
//!       ├─ Ok(false)  → fault bit
//!       ├─ panic      → fault bit + ProbePanicked event
//!       └─ timeout    → fault bit + ProbeStalled event
//! ```
//!
//! ## Rules
//! - Slots are polled in registration order, one at a time; the mask is
//!   deterministic for deterministic probe answers.
//! - The produced mask only ever carries bits of registered slots.
//! - Zero registered slots produce a clear mask every round.
//! - A stalled probe consumes its full timeout before the next slot is
//!   polled; size the timeout well under the supervision period.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::time;

use crate::events::{Bus, Event, EventKind, panic_reason};
use crate::faults::{FaultMask, WorkerSlot};

/// Polls every registered worker slot and folds failures into a [`FaultMask`].
///
/// The slot table is fixed at build time; registration after the supervisor
/// has started is unsupported by construction.
pub struct FaultAggregator {
    slots: Vec<WorkerSlot>,
    /// Per-probe deadline; `None` leaves a hung probe hanging the round.
    probe_deadline: Option<Duration>,
    bus: Bus,
}

impl FaultAggregator {
    pub(crate) fn new(slots: Vec<WorkerSlot>, probe_deadline: Option<Duration>, bus: Bus) -> Self {
        Self {
            slots,
            probe_deadline,
            bus,
        }
    }

    /// The registered slots, in registration (= bit) order.
    pub fn slots(&self) -> &[WorkerSlot] {
        &self.slots
    }

    /// Number of registered slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no workers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Polls all slots once and returns the round's fault mask.
    ///
    /// `round` is only used to tag diagnostic events; the mask itself carries
    /// no round information.
    pub async fn poll_round(&self, round: u64) -> FaultMask {
        let mut mask = FaultMask::EMPTY;
        for slot in &self.slots {
            if !self.poll_slot(slot, round).await {
                mask = mask.with(slot.bit());
            }
        }
        mask
    }

    /// Maps a mask back to the names of the failed workers, in slot order.
    pub fn failed_workers(&self, mask: FaultMask) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|slot| mask.contains(slot.bit()))
            .map(WorkerSlot::name)
            .collect()
    }

    /// Polls one slot, converting a stall or panic into `false`.
    async fn poll_slot(&self, slot: &WorkerSlot, round: u64) -> bool {
        let poll = AssertUnwindSafe(slot.probe().is_running()).catch_unwind();

        let caught = match self.probe_deadline {
            Some(deadline) => match time::timeout(deadline, poll).await {
                Ok(caught) => caught,
                Err(_elapsed) => {
                    self.bus.publish(
                        Event::new(EventKind::ProbeStalled)
                            .with_worker(slot.name_arc())
                            .with_round(round)
                            .with_timeout(deadline),
                    );
                    return false;
                }
            },
            None => poll.await,
        };

        match caught {
            Ok(healthy) => healthy,
            Err(payload) => {
                self.bus.publish(
                    Event::new(EventKind::ProbePanicked)
                        .with_worker(slot.name_arc())
                        .with_round(round)
                        .with_reason(panic_reason(payload.as_ref())),
                );
                false
            }
        }
    }
}
