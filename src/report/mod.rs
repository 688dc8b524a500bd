//! # Round reporting and the bounded-round verdict.
//!
//! This module contains the reporting half of the supervisor:
//! - [`ReportSink`] - where the per-round lines go ([`ConsoleSink`],
//!   [`MemorySink`])
//! - [`RoundReporter`] - classifies each round's mask, emits the report
//!   lines, and owns the cumulative [`Verdict`]
//! - [`RoundRecord`], [`Phase`] - per-round result and verdict phase

mod reporter;
mod sink;

pub use reporter::{Phase, RoundRecord, RoundReporter, Verdict};
pub use sink::{ConsoleSink, MemorySink, ReportSink};
