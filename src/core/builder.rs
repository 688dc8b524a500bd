//! # Supervisor construction and startup validation.
//!
//! [`SupervisorBuilder`] collects everything the loop needs before the first
//! tick: the worker slots (probes registered in bit order), the report sink,
//! and any event subscribers. Registration after the loop starts is
//! unsupported by construction - `build()` consumes the builder and hands the
//! slot table to the supervisor as an immutable value.
//!
//! Validation is fatal: an inconsistent configuration returns
//! [`ConfigError`] and the supervisor never starts ticking.

use std::sync::Arc;

use crate::core::config::SupervisorConfig;
use crate::core::supervisor::Supervisor;
use crate::error::ConfigError;
use crate::events::Bus;
use crate::faults::{FaultAggregator, FaultMask, WorkerSlot};
use crate::probes::ProbeRef;
use crate::report::{ConsoleSink, ReportSink, RoundReporter};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for constructing a [`Supervisor`].
///
/// ## Example
/// ```rust
/// use checkvisor::{ProbeFn, Supervisor, SupervisorConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), checkvisor::ConfigError> {
/// let sup = Supervisor::builder(SupervisorConfig::default())
///     .watch(ProbeFn::arc("queues", || async { true }))
///     .watch(ProbeFn::arc("mutexes", || async { true }))
///     .build()?;
/// # let _ = sup;
/// # Ok(())
/// # }
/// ```
pub struct SupervisorBuilder {
    cfg: SupervisorConfig,
    probes: Vec<ProbeRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    sink: Option<Arc<dyn ReportSink>>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SupervisorConfig) -> Self {
        Self {
            cfg,
            probes: Vec::new(),
            subscribers: Vec::new(),
            sink: None,
        }
    }

    /// Registers one worker category to watch.
    ///
    /// The fault bit position equals the registration order; register in the
    /// order you want bits (and report entries) laid out.
    pub fn watch(mut self, probe: ProbeRef) -> Self {
        self.probes.push(probe);
        self
    }

    /// Sets the report sink. Defaults to [`ConsoleSink`].
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (round outcomes, probe
    /// diagnostics, verdict seal) through dedicated workers with bounded
    /// queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Validates the setup and builds the supervisor.
    ///
    /// All registered workers must be scheduled before the loop's first tick;
    /// the slot table is fixed from here on.
    pub fn build(self) -> Result<Supervisor, ConfigError> {
        self.validate()?;

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers, bus.clone()));

        let slots: Vec<WorkerSlot> = self
            .probes
            .into_iter()
            .enumerate()
            .map(|(bit, probe)| WorkerSlot::new(probe.name().to_string(), bit as u8, probe))
            .collect();
        let aggregator = FaultAggregator::new(slots, self.cfg.probe_deadline(), bus.clone());

        let sink = self.sink.unwrap_or_else(|| Arc::new(ConsoleSink));
        let reporter = RoundReporter::new(self.cfg.round_budget, sink);

        Ok(Supervisor::new_internal(
            self.cfg, bus, subs, aggregator, reporter,
        ))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cfg.period.is_zero() {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.cfg.round_budget == 0 {
            return Err(ConfigError::ZeroRoundBudget);
        }
        if self.probes.len() > FaultMask::CAPACITY {
            return Err(ConfigError::SlotOverflow {
                count: self.probes.len(),
                max: FaultMask::CAPACITY,
            });
        }
        for (i, probe) in self.probes.iter().enumerate() {
            if self.probes[..i].iter().any(|p| p.name() == probe.name()) {
                return Err(ConfigError::DuplicateWorker {
                    name: probe.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::ProbeFn;
    use std::time::Duration;

    fn probe(name: &'static str) -> ProbeRef {
        ProbeFn::arc(name, || async { true })
    }

    #[tokio::test]
    async fn test_build_accepts_zero_probes() {
        let sup = SupervisorBuilder::new(SupervisorConfig::default()).build();
        assert!(sup.is_ok(), "an empty slot table is a valid (vacuous) setup");
    }

    #[tokio::test]
    async fn test_zero_period_is_fatal() {
        let mut cfg = SupervisorConfig::default();
        cfg.period = Duration::ZERO;
        let err = SupervisorBuilder::new(cfg).build().err().expect("must fail");
        assert_eq!(err.as_label(), "config_zero_period");
    }

    #[tokio::test]
    async fn test_zero_round_budget_is_fatal() {
        let mut cfg = SupervisorConfig::default();
        cfg.round_budget = 0;
        let err = SupervisorBuilder::new(cfg).build().err().expect("must fail");
        assert_eq!(err.as_label(), "config_zero_round_budget");
    }

    #[tokio::test]
    async fn test_duplicate_worker_name_is_fatal() {
        let err = SupervisorBuilder::new(SupervisorConfig::default())
            .watch(probe("queues"))
            .watch(probe("queues"))
            .build()
            .err()
            .expect("must fail");
        match err {
            ConfigError::DuplicateWorker { name } => assert_eq!(name, "queues"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_slot_overflow_is_fatal() {
        let mut builder = SupervisorBuilder::new(SupervisorConfig::default());
        for i in 0..=FaultMask::CAPACITY {
            builder = builder.watch(ProbeFn::arc(format!("w{i}"), || async { true }));
        }
        let err = builder.build().err().expect("must fail");
        assert_eq!(err.as_label(), "config_slot_overflow");
    }

    #[tokio::test]
    async fn test_bits_assigned_in_registration_order() {
        let sup = SupervisorBuilder::new(SupervisorConfig::default())
            .watch(probe("a"))
            .watch(probe("b"))
            .watch(probe("c"))
            .build()
            .expect("valid setup");

        let names: Vec<_> = sup
            .aggregator()
            .slots()
            .iter()
            .map(|s| (s.name().to_string(), s.bit()))
            .collect();
        assert_eq!(
            names,
            vec![("a".into(), 0), ("b".into(), 1), ("c".into(), 2)]
        );
    }
}
