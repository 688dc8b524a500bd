//! # Round classification and the cumulative verdict.
//!
//! [`RoundReporter`] consumes one [`FaultMask`] per round, updates the
//! cumulative [`Verdict`], and emits the human-readable report lines through
//! its [`ReportSink`]:
//!
//! ```text
//! observe(mask):
//!   rounds_observed += 1                        (round numbers start at 1)
//!   mask != 0 ─► ever_failed = true (sticky) ─► "Test failed: N round(s)"
//!   mask == 0 ─────────────────────────────────► "The test is ok for N round(s)"
//!   N == round_budget && !ever_failed ─────────► "Test passed"   (once, ever)
//! ```
//!
//! ## Rules
//! - `ever_failed` is monotonic: once set it stays set; later all-passing
//!   rounds do not clear it.
//! - "Test passed" can only be printed on the budget round itself. It is
//!   never re-emitted, and a failure on the budget round suppresses it.
//! - Rounds past the budget keep printing their per-round line; only the
//!   summary is frozen.
//! - All verdict mutation happens before any line is emitted, so a panicking
//!   sink cannot corrupt round numbering or stickiness.
//!
//! The exact line literals are a compatibility surface for downstream
//! harnesses; do not reword them.

use std::sync::Arc;

use crate::faults::FaultMask;
use crate::report::sink::ReportSink;

/// Verdict phase relative to the round budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fewer rounds observed than the budget; verdict still forming.
    Observing,
    /// Exactly the budget round; the printed verdict was just sealed.
    BudgetReached,
    /// Past the budget; observation continues, the summary does not change.
    Continuing,
}

/// Cumulative pass/fail state across rounds.
///
/// There is exactly one instance per supervisor, owned by [`RoundReporter`];
/// the copies handed out by [`RoundReporter::verdict`] are value snapshots.
#[derive(Debug, Clone, Copy)]
pub struct Verdict {
    rounds_observed: u64,
    ever_failed: bool,
    round_budget: u64,
}

impl Verdict {
    pub(crate) fn new(round_budget: u64) -> Self {
        Self {
            rounds_observed: 0,
            ever_failed: false,
            round_budget,
        }
    }

    /// Rounds observed so far.
    pub fn rounds_observed(&self) -> u64 {
        self.rounds_observed
    }

    /// True if any round ever failed. Sticky: never cleared.
    pub fn ever_failed(&self) -> bool {
        self.ever_failed
    }

    /// The fixed round budget.
    pub fn round_budget(&self) -> u64 {
        self.round_budget
    }

    /// Whether the observation so far amounts to a pass.
    ///
    /// Computable at any time: the budget must have been reached and no round
    /// may ever have failed. Note the *printed* summary is frozen at the
    /// budget round, while this value keeps tracking reality - a failure
    /// after the budget flips it to `false` even though nothing is reprinted.
    pub fn passed(&self) -> bool {
        self.rounds_observed >= self.round_budget && !self.ever_failed
    }

    /// Phase relative to the round budget.
    pub fn phase(&self) -> Phase {
        if self.rounds_observed < self.round_budget {
            Phase::Observing
        } else if self.rounds_observed == self.round_budget {
            Phase::BudgetReached
        } else {
            Phase::Continuing
        }
    }
}

/// Result of one observed round.
#[derive(Debug, Clone, Copy)]
pub struct RoundRecord {
    round: u64,
    mask: FaultMask,
}

impl RoundRecord {
    /// Round number (1-based, strictly increasing).
    pub fn round(&self) -> u64 {
        self.round
    }

    /// The round's fault mask.
    pub fn mask(&self) -> FaultMask {
        self.mask
    }

    /// True iff the mask is clear.
    pub fn passed(&self) -> bool {
        self.mask.is_clear()
    }
}

/// Classifies round masks, emits report lines, owns the [`Verdict`].
pub struct RoundReporter {
    verdict: Verdict,
    sink: Arc<dyn ReportSink>,
}

impl RoundReporter {
    /// Creates a reporter with a zeroed verdict.
    pub fn new(round_budget: u64, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            verdict: Verdict::new(round_budget),
            sink,
        }
    }

    /// Consumes one round's mask: count it, stick failures, emit lines.
    pub fn observe(&mut self, mask: FaultMask) -> RoundRecord {
        self.verdict.rounds_observed += 1;
        let round = self.verdict.rounds_observed;
        let passed = mask.is_clear();
        if !passed {
            self.verdict.ever_failed = true;
        }
        let seal_pass = round == self.verdict.round_budget && !self.verdict.ever_failed;

        // State is final from here on; emission cannot corrupt it.
        if passed {
            self.sink.emit(&format!("The test is ok for {round} round(s)"));
        } else {
            self.sink.emit(&format!("Test failed: {round} round(s)"));
        }
        if seal_pass {
            self.sink.emit("Test passed");
        }

        RoundRecord { round, mask }
    }

    /// Snapshot of the cumulative verdict.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sink::MemorySink;

    fn reporter(budget: u64) -> (RoundReporter, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (RoundReporter::new(budget, sink.clone()), sink)
    }

    fn fail_mask() -> FaultMask {
        FaultMask::EMPTY.with(1)
    }

    #[test]
    fn test_all_pass_rounds_reach_passed_verdict() {
        let (mut rep, sink) = reporter(25);
        for _ in 0..25 {
            rep.observe(FaultMask::EMPTY);
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), 26);
        for (i, line) in lines.iter().take(25).enumerate() {
            assert_eq!(line, &format!("The test is ok for {} round(s)", i + 1));
        }
        assert_eq!(lines[25], "Test passed");

        let verdict = rep.verdict();
        assert!(verdict.passed());
        assert_eq!(verdict.phase(), Phase::BudgetReached);
    }

    #[test]
    fn test_single_failure_is_sticky() {
        let (mut rep, sink) = reporter(25);
        for round in 1..=25u64 {
            let mask = if round == 10 { fail_mask() } else { FaultMask::EMPTY };
            rep.observe(mask);
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), 25, "no summary line may appear");
        assert_eq!(lines[9], "Test failed: 10 round(s)");
        assert_eq!(lines[8], "The test is ok for 9 round(s)");
        assert_eq!(lines[10], "The test is ok for 11 round(s)");
        assert!(!lines.contains(&"Test passed".to_string()));

        assert!(rep.verdict().ever_failed());
        assert!(!rep.verdict().passed());
    }

    #[test]
    fn test_failure_after_budget_still_prints_round_line() {
        let (mut rep, sink) = reporter(25);
        for _ in 0..25 {
            rep.observe(FaultMask::EMPTY);
        }
        assert!(rep.verdict().passed());

        rep.observe(fail_mask());

        let lines = sink.lines();
        assert_eq!(lines[25], "Test passed");
        assert_eq!(lines[26], "Test failed: 26 round(s)");
        assert_eq!(
            lines.iter().filter(|l| *l == "Test passed").count(),
            1,
            "frozen summary is never re-emitted or retracted"
        );
        assert_eq!(rep.verdict().phase(), Phase::Continuing);
    }

    #[test]
    fn test_passed_message_emitted_exactly_once() {
        let (mut rep, sink) = reporter(3);
        for _ in 0..10 {
            rep.observe(FaultMask::EMPTY);
        }

        let lines = sink.lines();
        assert_eq!(lines.iter().filter(|l| *l == "Test passed").count(), 1);
        assert_eq!(lines[3], "Test passed", "summary lands right after round 3");
    }

    #[test]
    fn test_budget_round_failure_suppresses_passed_message() {
        let (mut rep, sink) = reporter(3);
        rep.observe(FaultMask::EMPTY);
        rep.observe(FaultMask::EMPTY);
        rep.observe(fail_mask());

        let lines = sink.lines();
        assert_eq!(lines.last().unwrap(), "Test failed: 3 round(s)");
        assert!(!lines.contains(&"Test passed".to_string()));
    }

    #[test]
    fn test_round_numbers_are_strict_and_gapless() {
        let (mut rep, _sink) = reporter(5);
        for expected in 1..=8u64 {
            let record = rep.observe(FaultMask::EMPTY);
            assert_eq!(record.round(), expected);
        }
        assert_eq!(rep.verdict().rounds_observed(), 8);
    }

    #[test]
    fn test_later_passes_do_not_heal_failure() {
        let (mut rep, _sink) = reporter(3);
        rep.observe(fail_mask());
        for _ in 0..10 {
            rep.observe(FaultMask::EMPTY);
            assert!(rep.verdict().ever_failed(), "stickiness must be monotonic");
        }
        assert!(!rep.verdict().passed());
    }

    #[test]
    fn test_phase_progression() {
        let (mut rep, _sink) = reporter(2);
        assert_eq!(rep.verdict().phase(), Phase::Observing);
        rep.observe(FaultMask::EMPTY);
        assert_eq!(rep.verdict().phase(), Phase::Observing);
        rep.observe(FaultMask::EMPTY);
        assert_eq!(rep.verdict().phase(), Phase::BudgetReached);
        rep.observe(FaultMask::EMPTY);
        assert_eq!(rep.verdict().phase(), Phase::Continuing);
    }
}
