//! # checkvisor
//!
//! **Checkvisor** is a small periodic liveness supervisor for Rust.
//!
//! It runs alongside a fixed set of independently scheduled worker tasks,
//! polls each worker's liveness probe once per round, folds the results into
//! a fault bitmask, and renders a bounded-round pass/fail verdict. It detects
//! and reports; it never restarts or heals workers.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   worker #1  │   │   worker #2  │   │   worker #3  │
//!     │  (your task) │   │  (your task) │   │  (your task) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ Liveness         │ Liveness         │ Liveness
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor (periodic loop, fixed cadence)                        │
//! │  - FaultAggregator (slot table, one FaultMask per round)          │
//! │  - RoundReporter (verdict state + report lines via ReportSink)    │
//! │  - Bus (broadcast events) + SubscriberSet (fan-out)               │
//! └──────────────┬──────────────────────────┬─────────────────────────┘
//!                │ lines                    │ Events:
//!                ▼                          │ - RoundPassed/RoundFailed
//!        ReportSink (console/log)           │ - ProbeStalled/ProbePanicked
//!                                           │ - VerdictSealed
//!                                           ▼
//!                             ┌───────────────────────────┐
//!                             │   Bus (broadcast channel) │
//!                             └──────────┬────────────────┘
//!                                        ▼
//!                              subscriber_listener
//!                             ┌──────────┼──────────┐
//!                             ▼          ▼          ▼
//!                          [queue S1] [queue S2] [queue SN]
//!                             ▼          ▼          ▼
//!                          sub1.on   sub2.on    subN.on
//!                           _event()  _event()   _event()
//! ```
//!
//! ### One round
//! ```text
//! tick (absolute period boundary, no drift)
//!   ├─► FaultAggregator::poll_round
//!   │     for each WorkerSlot, in registration order:
//!   │       probe.is_running()          ── hung?     → ProbeStalled, bit forced
//!   │       (catch_unwind + timeout)    ── panicked? → ProbePanicked, bit forced
//!   │                                   ── false?    → bit set
//!   ├─► RoundReporter::observe(mask)
//!   │       rounds_observed += 1
//!   │       mask != 0 → ever_failed = true (sticky), "Test failed: N round(s)"
//!   │       mask == 0 → "The test is ok for N round(s)"
//!   │       N == round_budget && !ever_failed → "Test passed" (once, ever)
//!   └─► publish RoundPassed / RoundFailed (+ VerdictSealed on the budget round)
//! ```
//!
//! The loop never stops on its own: after the round budget the printed
//! verdict is frozen, but per-round observation and reporting continue until
//! the supervisor is cancelled or the process receives a termination signal.
//!
//! ## Features
//! | Area            | Description                                                        | Key types / traits                             |
//! |-----------------|--------------------------------------------------------------------|------------------------------------------------|
//! | **Probes**      | Liveness signals the supervisor consumes, one per worker category. | [`Liveness`], [`ProbeFn`], [`Heartbeat`]       |
//! | **Aggregation** | One fault bitmask per round, deterministic slot order.             | [`FaultAggregator`], [`FaultMask`]             |
//! | **Reporting**   | Round lines + sticky bounded-round verdict.                        | [`RoundReporter`], [`Verdict`], [`ReportSink`] |
//! | **Events**      | Broadcast observability with isolated subscribers.                 | [`Event`], [`EventKind`], [`Subscribe`]        |
//! | **Errors**      | Fatal startup validation (bad config halts before the first tick). | [`ConfigError`]                                |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] subscriber _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use checkvisor::{Heartbeat, Supervisor, SupervisorConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = SupervisorConfig::default();
//!     cfg.period = std::time::Duration::from_millis(50);
//!     cfg.round_budget = 3;
//!
//!     // One heartbeat per worker category; workers hold the Pulse end.
//!     let queues = Heartbeat::arc("queues");
//!     let pulse = queues.pulse_handle();
//!     tokio::spawn(async move {
//!         loop {
//!             pulse.pulse();
//!             tokio::time::sleep(std::time::Duration::from_millis(10)).await;
//!         }
//!     });
//!
//!     let sup = Supervisor::builder(cfg).watch(queues).build()?;
//!
//!     // Cancel shortly after the budget is reached; `run_until` returns the
//!     // final verdict snapshot.
//!     let token = CancellationToken::new();
//!     let stop = token.clone();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(std::time::Duration::from_millis(180)).await;
//!         stop.cancel();
//!     });
//!
//!     let verdict = sup.run_until(token).await;
//!     assert!(verdict.passed());
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod faults;
mod probes;
mod report;
mod subscribers;

// ---- Public re-exports ----

pub use core::{Supervisor, SupervisorBuilder, SupervisorConfig};
pub use error::ConfigError;
pub use events::{Bus, Event, EventKind};
pub use faults::{FaultAggregator, FaultMask, WorkerSlot};
pub use probes::{Heartbeat, Liveness, ProbeFn, ProbeRef, Pulse};
pub use report::{ConsoleSink, MemorySink, Phase, ReportSink, RoundRecord, RoundReporter, Verdict};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
