//! Fatal startup errors.
//!
//! Worker faults are never errors in this crate: a worker that stops running
//! becomes a bit in a [`FaultMask`](crate::FaultMask) and flows through the
//! reporting path as plain data. The only `Err` surface is
//! [`ConfigError`], raised by [`SupervisorBuilder::build`](crate::SupervisorBuilder::build)
//! when the configuration or the slot table is inconsistent. A configuration
//! fault is fatal: the supervisor must not start ticking on top of it.

use thiserror::Error;

/// # Errors detected while validating the supervisor setup.
///
/// All variants are raised before the first tick; once `build()` succeeds the
/// loop itself has no error path.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The supervision period is zero; the loop would spin without sleeping.
    #[error("supervision period must be non-zero")]
    ZeroPeriod,

    /// The round budget is zero; the verdict round would never exist.
    #[error("round budget must be at least 1")]
    ZeroRoundBudget,

    /// More workers registered than the fault bitmask has bits for.
    #[error("cannot watch {count} workers; the fault mask holds at most {max}")]
    SlotOverflow {
        /// Number of registered workers.
        count: usize,
        /// Bitmask capacity.
        max: usize,
    },

    /// Two registered workers share a name; reports would be ambiguous.
    #[error("worker {name:?} is already registered")]
    DuplicateWorker {
        /// The offending worker name.
        name: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use checkvisor::ConfigError;
    ///
    /// let err = ConfigError::ZeroPeriod;
    /// assert_eq!(err.as_label(), "config_zero_period");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroPeriod => "config_zero_period",
            ConfigError::ZeroRoundBudget => "config_zero_round_budget",
            ConfigError::SlotOverflow { .. } => "config_slot_overflow",
            ConfigError::DuplicateWorker { .. } => "config_duplicate_worker",
        }
    }
}
