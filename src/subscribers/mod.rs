//! # Event subscribers for the supervisor runtime.
//!
//! This module provides the [`Subscribe`] trait and the fan-out machinery
//! for handling events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Supervisor/Aggregator ── publish(Event) ──► Bus ──► subscriber_listener
//!                                                            │
//!                                                   SubscriberSet::emit
//!                                               ┌────────┬───┴────┬────────┐
//!                                               ▼        ▼        ▼        ▼
//!                                           LogWriter  Metrics  Custom    ...
//! ```
//!
//! Subscribers observe; they cannot influence the verdict or the round
//! cadence. A slow or broken subscriber only ever loses its own events.

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
