//! # Report sinks: where the per-round lines go.
//!
//! [`ReportSink`] is the seam between the reporter and the output transport.
//! The supervisor only needs something that accepts one line at a time;
//! console printing, log forwarding, and in-memory capture are all
//! implementations of the same trait.
//!
//! Emission is synchronous on the supervisor's own task, so downstream
//! harnesses see lines in exactly the order rounds happen. Keep `emit` cheap;
//! a sink that blocks stretches every round.

use std::sync::Mutex;

/// Accepts one report line at a time.
pub trait ReportSink: Send + Sync + 'static {
    /// Emits a single line (without trailing newline).
    fn emit(&self, line: &str);
}

/// Prints report lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn emit(&self, line: &str) {
        println!("{line}");
    }
}

/// Captures report lines in memory; intended for harnesses and tests.
///
/// ## Example
/// ```rust
/// use checkvisor::{MemorySink, ReportSink};
///
/// let sink = MemorySink::new();
/// sink.emit("The test is ok for 1 round(s)");
/// assert_eq!(sink.lines(), vec!["The test is ok for 1 round(s)"]);
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything emitted so far, in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("sink poisoned").clone()
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines.lock().expect("sink poisoned").push(line.to_string());
    }
}
