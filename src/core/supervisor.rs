//! # Supervisor: the periodic observe-aggregate-report loop.
//!
//! The [`Supervisor`] owns the event bus, a [`SubscriberSet`], the
//! [`FaultAggregator`] slot table, and the [`RoundReporter`]. It wakes on a
//! fixed cadence, produces one fault mask per round, hands it to the
//! reporter, publishes the round's events, and repeats until cancelled or
//! signalled.
//!
//! ## Key responsibilities
//! - drive rounds on **absolute period boundaries** (the time spent polling
//!   probes does not drift the cadence; missed boundaries are caught up)
//! - contain per-round failures: a stalled/panicked probe becomes a fault
//!   bit, a panicking reporting step becomes a `ReportFaulted` event - the
//!   loop itself never dies
//! - subscribe to the [`Bus`] and **fan-out** events via [`SubscriberSet`]
//! - end only on a [`CancellationToken`] (`run_until`) or an OS termination
//!   signal (`run`), returning the final [`Verdict`] snapshot
//!
//! ## High-level flow
//! ```text
//! run()/run_until(token):
//!   - subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!   - ticks = interval_at(now + period, period)      (absolute schedule)
//!   loop {
//!     select! {
//!       token cancelled ─► publish ShutdownRequested, break
//!       ticks.tick()    ─► observe_round():
//!                            mask   = aggregator.poll_round(round)
//!                            record = reporter.observe(mask)   (catch_unwind)
//!                            publish RoundPassed / RoundFailed
//!                            round == budget ─► publish VerdictSealed (once)
//!     }
//!   }
//!   return reporter verdict
//! ```
//!
//! The printed verdict freezes at the budget round; rounds keep being
//! observed and reported afterwards. Continuous observation is the point -
//! there is no "done" state, only a caller that stops listening.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::core::builder::SupervisorBuilder;
use crate::core::config::SupervisorConfig;
use crate::core::shutdown;
use crate::events::{Bus, Event, EventKind, panic_reason};
use crate::faults::FaultAggregator;
use crate::report::{RoundReporter, Verdict};
use crate::subscribers::SubscriberSet;

/// Coordinates the round cadence, fault aggregation, reporting, and event
/// delivery.
///
/// Built via [`Supervisor::builder`]; all worker slots are registered before
/// the first tick and immutable afterwards.
pub struct Supervisor {
    cfg: SupervisorConfig,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    aggregator: FaultAggregator,
    reporter: RoundReporter,
}

impl Supervisor {
    /// Returns a builder for the given configuration.
    pub fn builder(cfg: SupervisorConfig) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: SupervisorConfig,
        bus: Bus,
        subs: Arc<SubscriberSet>,
        aggregator: FaultAggregator,
        reporter: RoundReporter,
    ) -> Self {
        Self {
            cfg,
            bus,
            subs,
            aggregator,
            reporter,
        }
    }

    /// The event bus; subscribe before calling [`run`](Self::run) to observe
    /// rounds externally.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The slot table and polling machinery.
    pub fn aggregator(&self) -> &FaultAggregator {
        &self.aggregator
    }

    /// Snapshot of the cumulative verdict.
    pub fn verdict(&self) -> Verdict {
        self.reporter.verdict()
    }

    /// Runs the loop until the process receives a termination signal
    /// (SIGINT/SIGTERM/SIGQUIT, Ctrl-C on Windows).
    ///
    /// Returns the final verdict snapshot.
    pub async fn run(self) -> Verdict {
        let token = CancellationToken::new();
        let stop = token.clone();
        tokio::spawn(async move {
            let _ = shutdown::wait_for_shutdown_signal().await;
            stop.cancel();
        });
        self.run_until(token).await
    }

    /// Runs the loop until the token is cancelled.
    ///
    /// The first round happens one full period after this call (workers get
    /// one period of undisturbed execution before the first poll, and a
    /// worker that never runs is caught by the first round, not by round
    /// zero).
    pub async fn run_until(mut self, token: CancellationToken) -> Verdict {
        self.subscriber_listener();

        let mut ticks = time::interval_at(Instant::now() + self.cfg.period, self.cfg.period);
        // Catch up missed boundaries instead of sliding the grid.
        ticks.set_missed_tick_behavior(MissedTickBehavior::Burst);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    self.bus.publish(Event::new(EventKind::ShutdownRequested));
                    break;
                }
                _ = ticks.tick() => {
                    self.observe_round().await;
                }
            }
        }

        self.reporter.verdict()
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget).
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }

    /// One complete round: aggregate, report, publish.
    async fn observe_round(&mut self) {
        let round = self.reporter.verdict().rounds_observed() + 1;
        let mask = self.aggregator.poll_round(round).await;

        // The reporter mutates its verdict before emitting anything, so a
        // panicking sink leaves counting and stickiness intact; the round is
        // then accounted for even though its lines were lost.
        let reporter = &mut self.reporter;
        let record = match std::panic::catch_unwind(AssertUnwindSafe(|| reporter.observe(mask))) {
            Ok(record) => record,
            Err(payload) => {
                self.bus.publish(
                    Event::new(EventKind::ReportFaulted)
                        .with_round(round)
                        .with_reason(panic_reason(payload.as_ref())),
                );
                return;
            }
        };

        if record.passed() {
            self.bus
                .publish(Event::new(EventKind::RoundPassed).with_round(record.round()));
        } else {
            self.bus.publish(
                Event::new(EventKind::RoundFailed)
                    .with_round(record.round())
                    .with_mask(record.mask()),
            );
        }

        let verdict = self.reporter.verdict();
        if record.round() == verdict.round_budget() {
            self.bus.publish(
                Event::new(EventKind::VerdictSealed)
                    .with_round(record.round())
                    .with_passed(verdict.passed()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::{Heartbeat, ProbeFn};
    use crate::report::{MemorySink, Phase};
    use std::time::Duration;

    fn config(period_ms: u64, budget: u64) -> SupervisorConfig {
        let mut cfg = SupervisorConfig::default();
        cfg.period = Duration::from_millis(period_ms);
        cfg.round_budget = budget;
        cfg
    }

    async fn run_rounds(sup: Supervisor, periods: u64, period_ms: u64) -> Verdict {
        let token = CancellationToken::new();
        let stop = token.clone();
        let handle = tokio::spawn(sup.run_until(token));
        // Paused clock: sleeps auto-advance, landing just past the last boundary.
        time::sleep(Duration::from_millis(periods * period_ms + period_ms / 2)).await;
        stop.cancel();
        handle.await.expect("supervisor task")
    }

    #[tokio::test(start_paused = true)]
    async fn test_healthy_workers_pass_the_budget() {
        let sink = Arc::new(MemorySink::new());
        let sup = Supervisor::builder(config(100, 3))
            .watch(ProbeFn::arc("queues", || async { true }))
            .watch(ProbeFn::arc("mutexes", || async { true }))
            .watch(ProbeFn::arc("churn", || async { true }))
            .with_sink(sink.clone())
            .build()
            .expect("valid setup");

        let verdict = run_rounds(sup, 3, 100).await;

        assert!(verdict.passed());
        let lines = sink.lines();
        assert_eq!(
            lines,
            vec![
                "The test is ok for 1 round(s)",
                "The test is ok for 2 round(s)",
                "The test is ok for 3 round(s)",
                "Test passed",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_workers_pass_vacuously() {
        let sink = Arc::new(MemorySink::new());
        let sup = Supervisor::builder(config(100, 2))
            .with_sink(sink.clone())
            .build()
            .expect("valid setup");

        let verdict = run_rounds(sup, 2, 100).await;

        assert!(verdict.passed());
        assert!(sink.lines().contains(&"Test passed".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_worker_fails_rounds() {
        let sink = Arc::new(MemorySink::new());
        let hb = Heartbeat::arc("silent");
        let sup = Supervisor::builder(config(100, 2))
            .watch(hb)
            .with_sink(sink.clone())
            .build()
            .expect("valid setup");

        let verdict = run_rounds(sup, 2, 100).await;

        assert!(!verdict.passed());
        assert!(verdict.ever_failed());
        let lines = sink.lines();
        assert_eq!(lines[0], "Test failed: 1 round(s)");
        assert!(!lines.contains(&"Test passed".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_events_and_sealed_verdict() {
        let sup = Supervisor::builder(config(100, 2))
            .watch(ProbeFn::arc("steady", || async { true }))
            .with_sink(Arc::new(MemorySink::new()))
            .build()
            .expect("valid setup");
        let mut rx = sup.bus().subscribe();

        run_rounds(sup, 2, 100).await;

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push((ev.kind, ev.round));
        }
        assert_eq!(
            kinds,
            vec![
                (EventKind::RoundPassed, Some(1)),
                (EventKind::RoundPassed, Some(2)),
                (EventKind::VerdictSealed, Some(2)),
                (EventKind::ShutdownRequested, None),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_observation_continues_past_budget() {
        let sink = Arc::new(MemorySink::new());
        let sup = Supervisor::builder(config(100, 2))
            .watch(ProbeFn::arc("steady", || async { true }))
            .with_sink(sink.clone())
            .build()
            .expect("valid setup");

        let verdict = run_rounds(sup, 5, 100).await;

        assert_eq!(verdict.rounds_observed(), 5);
        assert_eq!(verdict.phase(), Phase::Continuing);
        let lines = sink.lines();
        assert_eq!(lines.iter().filter(|l| *l == "Test passed").count(), 1);
        assert_eq!(lines.last().unwrap(), "The test is ok for 5 round(s)");
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_sink_does_not_kill_the_loop() {
        struct BrokenSink;
        impl crate::report::ReportSink for BrokenSink {
            fn emit(&self, _line: &str) {
                panic!("sink went away");
            }
        }

        let sup = Supervisor::builder(config(100, 2))
            .watch(ProbeFn::arc("steady", || async { true }))
            .with_sink(Arc::new(BrokenSink))
            .build()
            .expect("valid setup");
        let mut rx = sup.bus().subscribe();

        let verdict = run_rounds(sup, 3, 100).await;

        assert_eq!(verdict.rounds_observed(), 3, "rounds still counted");

        let mut faulted = 0;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::ReportFaulted {
                faulted += 1;
                assert_eq!(ev.reason.as_deref(), Some("sink went away"));
            }
        }
        assert_eq!(faulted, 3, "every round's containment is reported");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pulsing_heartbeats_pass_end_to_end() {
        let sink = Arc::new(MemorySink::new());
        let hb = Heartbeat::arc("pump");
        let pulse = hb.pulse_handle();
        let worker = tokio::spawn(async move {
            loop {
                pulse.pulse();
                time::sleep(Duration::from_millis(10)).await;
            }
        });

        let sup = Supervisor::builder(config(100, 3))
            .watch(hb)
            .with_sink(sink.clone())
            .build()
            .expect("valid setup");

        let verdict = run_rounds(sup, 3, 100).await;
        worker.abort();

        assert!(verdict.passed());
        assert!(sink.lines().contains(&"Test passed".to_string()));
    }
}
