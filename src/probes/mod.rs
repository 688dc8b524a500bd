//! # Liveness probes consumed by the supervisor.
//!
//! This module provides the probe-related types:
//! - [`Liveness`] - trait for exposing a worker's "still correctly running" signal
//! - [`ProbeFn`] - closure-backed probe implementation
//! - [`ProbeRef`] - shared reference to a probe (`Arc<dyn Liveness>`)
//! - [`Heartbeat`] / [`Pulse`] - beat-counter probe for workers that report progress

mod heartbeat;
mod probe;
mod probe_fn;

pub use heartbeat::{Heartbeat, Pulse};
pub use probe::{Liveness, ProbeRef};
pub use probe_fn::ProbeFn;
