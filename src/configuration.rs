//! Configurations: automata bound to a trace pair, and their bundles.
//!
//! A [`Configuration`] runs one two-trace check over a concrete pair of
//! traces, keeping a read cursor per trace. A [`ConfigurationSet`] bundles
//! the three complementary checks for one pair, all starting from the same
//! cursor positions; the bundle is retired as a unit.

use crate::automata::{CheckKind, StepOutcome, TracePairExpression};
use crate::trace::{TraceId, TraceSet};

/// One two-trace automaton instance bound to a trace pair and cursor state.
#[derive(Debug, Clone)]
pub struct Configuration {
    expr: TracePairExpression,
    traces: [TraceId; 2],
    positions: [usize; 2],
    failed: bool,
}

impl Configuration {
    /// Fresh configuration with cursors at the start of both traces.
    pub fn new(check: CheckKind, traces: [TraceId; 2]) -> Self {
        Self::with_positions(check, traces, [0, 0])
    }

    /// Continuation: cursors inherited from a parent that found a match.
    pub fn with_positions(check: CheckKind, traces: [TraceId; 2], positions: [usize; 2]) -> Self {
        Self { expr: TracePairExpression::new(check), traces, positions, failed: false }
    }

    pub fn check(&self) -> CheckKind {
        self.expr.check()
    }

    pub fn trace(&self, side: usize) -> TraceId {
        self.traces[side]
    }

    pub fn traces(&self) -> [TraceId; 2] {
        self.traces
    }

    pub fn position(&self, side: usize) -> usize {
        self.positions[side]
    }

    pub fn positions(&self) -> [usize; 2] {
        self.positions
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Whether a step on `side` is possible: the side has not yet accepted
    /// and its trace holds an event at the cursor.
    pub fn can_proceed(&self, side: usize, traces: &TraceSet) -> bool {
        !self.expr.accepted(side) && traces.get(self.traces[side]).len() > self.positions[side]
    }

    /// Consume one event on `side`.
    ///
    /// Reads the event under the cursor, feeds it to the automaton and
    /// advances the cursor regardless of the outcome. When the step
    /// completes the second side's acceptance, the joint predicate resolves:
    /// predicate-true surfaces as `Accept`, predicate-false marks the
    /// configuration failed and surfaces as `Reject`.
    ///
    /// Calling this when [`Configuration::can_proceed`] is false is a
    /// contract violation.
    pub fn step(&mut self, side: usize, traces: &TraceSet) -> StepOutcome {
        assert!(self.can_proceed(side, traces), "step on a side that cannot proceed");

        let pos = self.positions[side];
        let event = *traces.get(self.traces[side]).get(pos);
        let res = self.expr.step(side, &event, pos);
        self.positions[side] += 1;

        tracing::trace!(
            check = %self.check(),
            trace = %self.traces[side],
            pos,
            event = %event,
            outcome = ?res,
            "step"
        );

        match res {
            StepOutcome::Accept => {
                if self.expr.both_accepted() {
                    let t0 = traces.get(self.traces[0]);
                    let t1 = traces.get(self.traces[1]);
                    if self.expr.predicate(t0, t1) {
                        StepOutcome::Accept
                    } else {
                        self.failed = true;
                        StepOutcome::Reject
                    }
                } else {
                    StepOutcome::Pending
                }
            }
            StepOutcome::Reject => {
                self.failed = true;
                StepOutcome::Reject
            }
            StepOutcome::Pending => StepOutcome::Pending,
        }
    }
}

/// The three sibling configurations over one trace pair, retired as a unit.
#[derive(Debug)]
pub struct ConfigurationSet {
    configurations: [Configuration; 3],
    invalid: bool,
}

impl ConfigurationSet {
    /// Bundle for a newly paired couple of traces, cursors at zero.
    pub fn fresh(traces: [TraceId; 2]) -> Self {
        Self::continuation(traces, [0, 0])
    }

    /// Bundle restarting the search from previously reached cursors.
    pub fn continuation(traces: [TraceId; 2], positions: [usize; 2]) -> Self {
        Self {
            configurations: CheckKind::ALL
                .map(|check| Configuration::with_positions(check, traces, positions)),
            invalid: false,
        }
    }

    pub fn invalid(&self) -> bool {
        self.invalid
    }

    /// Retire the whole bundle; every sibling is discarded together.
    pub fn set_invalid(&mut self) {
        self.invalid = true;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Configuration> {
        self.configurations.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Configuration> {
        self.configurations.iter_mut()
    }
}
