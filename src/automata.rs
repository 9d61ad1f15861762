//! Prefix-expression automata and their two-trace compositions.
//!
//! Each single-trace automaton is a one-shot acceptor: it scans events until
//! it sees one matching its pattern, records the consumed span as a letter
//! and stays accepted forever. Two such automata, one per trace, form a
//! [`TracePairExpression`]; once both sides have accepted, a joint predicate
//! over the two compressed matches decides the check.
//!
//! Three checks exist, differing in acceptance pattern and predicate
//! polarity:
//!
//! - [`CheckKind::ObservableMatch`] — accepts the next observable step
//!   (public input or output) on each side and requires the matched spans to
//!   denote the same event sequence. Its acceptance is the signal to keep
//!   searching forward from the reached positions.
//! - [`CheckKind::OutputDivergence`] — accepts the next public output (or
//!   trace end) on each side and requires the spans to differ. Its
//!   acceptance witnesses an observational-determinism violation.
//! - [`CheckKind::InputDivergence`] — accepts the next public input on each
//!   side and requires the spans to differ. Its acceptance means the two
//!   traces were fed different inputs, so the property holds vacuously on
//!   this branch.

use crate::event::{Event, EventKind};
use crate::letters::{CompressedMatch, Letter};
use crate::subword::subword_eq;
use crate::trace::Trace;

/// Result of offering one event to an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No decision yet.
    Pending,
    /// Accepted (side acceptance, or joint predicate satisfied).
    Accept,
    /// Joint predicate failed.
    Reject,
}

/// Which of the three two-trace checks a configuration runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    ObservableMatch,
    OutputDivergence,
    InputDivergence,
}

impl CheckKind {
    /// All checks, in the order they are bundled into a configuration set.
    pub const ALL: [CheckKind; 3] = [
        CheckKind::ObservableMatch,
        CheckKind::OutputDivergence,
        CheckKind::InputDivergence,
    ];

    /// Per-side acceptance pattern.
    pub fn accepts(self, kind: EventKind) -> bool {
        match self {
            CheckKind::ObservableMatch => {
                matches!(kind, EventKind::LowInput | EventKind::LowOutput)
            }
            CheckKind::OutputDivergence => {
                matches!(kind, EventKind::LowOutput | EventKind::End)
            }
            CheckKind::InputDivergence => matches!(kind, EventKind::LowInput),
        }
    }

    /// Joint-predicate polarity: does the check require the two matched
    /// spans to denote equal sequences, or different ones?
    pub fn wants_equal(self) -> bool {
        matches!(self, CheckKind::ObservableMatch)
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CheckKind::ObservableMatch => "observable-match",
            CheckKind::OutputDivergence => "output-divergence",
            CheckKind::InputDivergence => "input-divergence",
        };
        f.write_str(s)
    }
}

/// Single-trace one-shot acceptor with its compressed match.
#[derive(Debug, Clone)]
pub struct PrefixExpression {
    accepted: bool,
    matched: CompressedMatch,
}

impl PrefixExpression {
    fn new() -> Self {
        Self { accepted: false, matched: CompressedMatch::new() }
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn matched(&self) -> &CompressedMatch {
        &self.matched
    }

    fn step(&mut self, matches_pattern: bool, pos: usize) -> StepOutcome {
        if matches_pattern {
            self.accepted = true;
            self.matched.append(Letter::at(pos));
            StepOutcome::Accept
        } else {
            // a non-matching event is only ever seen from the initial state;
            // accepted sides are never stepped again
            debug_assert!(!self.accepted, "stepped an accepted automaton");
            StepOutcome::Pending
        }
    }
}

/// Two prefix expressions, one per trace, plus the joint predicate.
#[derive(Debug, Clone)]
pub struct TracePairExpression {
    check: CheckKind,
    sides: [PrefixExpression; 2],
}

impl TracePairExpression {
    pub fn new(check: CheckKind) -> Self {
        Self { check, sides: [PrefixExpression::new(), PrefixExpression::new()] }
    }

    pub fn check(&self) -> CheckKind {
        self.check
    }

    pub fn accepted(&self, side: usize) -> bool {
        self.sides[side].accepted()
    }

    pub fn both_accepted(&self) -> bool {
        self.sides.iter().all(PrefixExpression::accepted)
    }

    pub fn matched(&self, side: usize) -> &CompressedMatch {
        self.sides[side].matched()
    }

    /// Offer `event` (at trace position `pos`) to the given side.
    pub fn step(&mut self, side: usize, event: &Event, pos: usize) -> StepOutcome {
        assert!(side < 2, "side out of range");
        self.sides[side].step(self.check.accepts(event.kind), pos)
    }

    /// Evaluate the joint predicate. Defined only once both sides accepted.
    pub fn predicate(&self, t1: &Trace, t2: &Trace) -> bool {
        debug_assert!(self.both_accepted(), "predicate before both sides accepted");
        let eq = subword_eq(t1, self.sides[0].matched(), t2, self.sides[1].matched());
        if self.check.wants_equal() {
            eq
        } else {
            !eq
        }
    }
}
