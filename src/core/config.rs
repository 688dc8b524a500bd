//! # Supervisor configuration.
//!
//! Provides [`SupervisorConfig`], the compile/startup-time settings for the
//! supervision loop. There is no runtime reconfiguration: the values are
//! validated once by [`SupervisorBuilder::build`](crate::SupervisorBuilder::build)
//! and fixed for the supervisor's lifetime.
//!
//! ## Sentinel values
//! - `probe_timeout = 0s` → no per-probe deadline (a hung probe hangs the round)
//! - `bus_capacity` is clamped to a minimum of 1 by the bus

use std::time::Duration;

/// Settings for the supervision loop.
///
/// ## Field semantics
/// - `period`: time between round boundaries (absolute cadence, not
///   delay-after-work)
/// - `round_budget`: round at which the printed verdict is sealed
/// - `probe_timeout`: per-probe deadline (`0s` = none)
/// - `bus_capacity`: event bus ring buffer size
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Time between supervision rounds.
    ///
    /// Rounds are scheduled on absolute period boundaries; the time spent
    /// polling probes does not push later rounds back.
    pub period: Duration,

    /// Number of rounds after which the printed verdict is final.
    ///
    /// The loop keeps observing past this round; only the one-time summary
    /// line is tied to it.
    pub round_budget: u64,

    /// Deadline for a single probe call.
    ///
    /// - `Duration::ZERO` = no deadline
    /// - `> 0` = a probe that does not answer in time is recorded as a fault
    ///   for that round and a `ProbeStalled` event is published
    ///
    /// Stalled probes each consume a full deadline within the round, so keep
    /// `probe_timeout × worker count` well under `period`.
    pub probe_timeout: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` events observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl SupervisorConfig {
    /// Returns the per-probe deadline as an `Option`.
    ///
    /// - `None` → no deadline
    /// - `Some(d)` → applied per probe call
    #[inline]
    pub fn probe_deadline(&self) -> Option<Duration> {
        if self.probe_timeout == Duration::ZERO {
            None
        } else {
            Some(self.probe_timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SupervisorConfig {
    /// Default configuration:
    ///
    /// - `period = 5000ms`
    /// - `round_budget = 25`
    /// - `probe_timeout = 0s` (no deadline)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            period: Duration::from_millis(5000),
            round_budget: 25,
            probe_timeout: Duration::ZERO,
            bus_capacity: 1024,
        }
    }
}
