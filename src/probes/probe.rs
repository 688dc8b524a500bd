//! # Liveness probe trait.
//!
//! This module defines the [`Liveness`] trait, the capability the supervisor
//! consumes for each monitored worker category. The common handle type is
//! [`ProbeRef`], an `Arc<dyn Liveness>` suitable for sharing across the runtime.
//!
//! A probe answers one question on demand - is the worker it watches still
//! correctly running - and must answer promptly: the supervisor polls every
//! probe once per round from its own task, and a probe that blocks stretches
//! the whole round (a configured probe timeout converts such a stall into a
//! fault bit instead).

use async_trait::async_trait;
use std::sync::Arc;

/// Shared handle to a liveness probe.
pub type ProbeRef = Arc<dyn Liveness>;

/// # A worker's liveness signal, polled once per supervision round.
///
/// Implementations belong to the worker side: if the answer requires
/// synchronization with the worker task, that synchronization is the probe's
/// responsibility, not the supervisor's. The supervisor only performs a
/// read-only query; probes must not mutate anything beyond their own
/// bookkeeping.
///
/// A probe that has not yet observed its worker reports `false` - a worker
/// that never started counts as a failed worker from the first round.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use checkvisor::Liveness;
///
/// struct QueueProbe {
///     ok: AtomicBool,
/// }
///
/// #[async_trait]
/// impl Liveness for QueueProbe {
///     fn name(&self) -> &str { "queues" }
///
///     async fn is_running(&self) -> bool {
///         self.ok.load(Ordering::Relaxed)
///     }
/// }
/// ```
#[async_trait]
pub trait Liveness: Send + Sync + 'static {
    /// Returns a stable, human-readable worker name used in reports and events.
    fn name(&self) -> &str;

    /// Returns whether the watched worker is still correctly running.
    ///
    /// Must return promptly; the supervisor polls from its own task while the
    /// worker runs concurrently.
    async fn is_running(&self) -> bool;
}
