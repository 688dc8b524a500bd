//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the supervisor loop and the fault
//! aggregator.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Supervisor` (round outcomes, verdict seal, shutdown),
//!   `FaultAggregator` (probe stall/panic diagnostics), `SubscriberSet`
//!   workers (overflow/panic).
//! - **Consumers**: the supervisor's `subscriber_listener()` (fans out to
//!   `SubscriberSet`) and any receiver obtained via [`Bus::subscribe`].
//!
//! Round report *lines* never travel through the bus; they go through
//! [`ReportSink`](crate::ReportSink) synchronously so downstream harnesses
//! see deterministic content and order. Events are the parallel
//! observability channel.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};

pub(crate) use event::panic_reason;
