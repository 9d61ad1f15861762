//! The monitor loop: ingestion, workbag scheduling and verdicts.
//!
//! Each round the monitor pulls newly available streams and events, offers
//! one step to every live configuration in every valid set, collects freshly
//! spawned continuation sets into a side queue, and periodically compacts
//! the workbag. It halts when no streams remain and the workbag is empty —
//! reporting that no violation was found — or as soon as a violation is
//! detected, when configured to do so.
//!
//! The engine is single-threaded cooperative: ingestion polls and never
//! blocks, so a slow stream merely makes no progress that round. The only
//! mutator of traces is ingestion; configurations read them by id through
//! the registry.

use std::ops::ControlFlow;

use similar::{ChangeTag, TextDiff};
use tracing::{debug, info, warn};

use crate::automata::{CheckKind, StepOutcome};
use crate::configuration::{Configuration, ConfigurationSet};
use crate::event::Event;
use crate::source::{EventSource, Inputs};
use crate::trace::{TraceId, TraceSet};
use crate::workbag::Workbag;

/// Knobs for one monitoring session.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct MonitorConfig {
    /// Halt with a `Violation` verdict the moment one is detected
    /// (default). When disabled, the run continues to input exhaustion and
    /// the first recorded violation is returned at the end.
    pub exit_on_violation: bool,

    /// Do not pair a trace with itself. A self-pair can never produce a
    /// violation (the matches are trivially equal), so skipping it is a
    /// pure reduction.
    pub skip_self_pairs: bool,

    /// Also spawn the mirrored (right, left) set for every new pair.
    pub mirrored_pairs: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { exit_on_violation: true, skip_self_pairs: false, mirrored_pairs: false }
    }
}

impl MonitorConfig {
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct MonitorConfigBuilder {
    exit_on_violation: Option<bool>,
    skip_self_pairs: Option<bool>,
    mirrored_pairs: Option<bool>,
}

impl MonitorConfigBuilder {
    pub fn exit_on_violation(mut self, value: bool) -> Self {
        self.exit_on_violation = Some(value);
        self
    }

    pub fn skip_self_pairs(mut self, value: bool) -> Self {
        self.skip_self_pairs = Some(value);
        self
    }

    pub fn mirrored_pairs(mut self, value: bool) -> Self {
        self.mirrored_pairs = Some(value);
        self
    }

    pub fn build(self) -> MonitorConfig {
        let defaults = MonitorConfig::default();
        MonitorConfig {
            exit_on_violation: self.exit_on_violation.unwrap_or(defaults.exit_on_violation),
            skip_self_pairs: self.skip_self_pairs.unwrap_or(defaults.skip_self_pairs),
            mirrored_pairs: self.mirrored_pairs.unwrap_or(defaults.mirrored_pairs),
        }
    }
}

/// Outcome of a monitoring run.
#[derive(Debug)]
#[non_exhaustive]
#[must_use = "monitoring verdict should be checked"]
pub enum Verdict {
    /// Input was exhausted without observing a violation.
    NoViolation,

    /// Observational determinism was violated for the given trace pair.
    Violation {
        left: TraceId,
        right: TraceId,
        /// Unified diff of the two traces' event listings.
        report: String,
    },
}

impl Verdict {
    pub fn is_violation(&self) -> bool {
        matches!(self, Verdict::Violation { .. })
    }

    /// Process-level status code: 0 when no violation was observed.
    pub fn exit_code(&self) -> i32 {
        if self.is_violation() {
            1
        } else {
            0
        }
    }
}

/// Counters describing a finished (or running) session.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct MonitorStats {
    pub rounds: u64,
    pub max_workbag: usize,
    pub traces: usize,
    pub sets_spawned: u64,
    pub compactions: u64,
    pub violations: u64,
}

/// How far one configuration got within a round.
enum Progress {
    /// Stepped (or could not step) without a decision.
    Idle,
    /// Joint predicate satisfied.
    Matched,
    /// Joint predicate failed; the configuration is now failed.
    Failed,
    /// Nothing can proceed and both traces are done.
    Exhausted,
}

struct OnlineStream {
    trace: TraceId,
    source: Box<dyn EventSource>,
}

/// The online observational-determinism monitor.
///
/// Owns every trace of the session (traces are never dropped, since later
/// configuration sets may reference early positions) and the workbag of
/// live configuration sets.
pub struct Monitor {
    config: MonitorConfig,
    traces: TraceSet,
    workbag: Workbag,
    /// Side queue collecting sets spawned during the current round.
    spawned: Workbag,
    online: Vec<OnlineStream>,
    stats: MonitorStats,
    first_violation: Option<Verdict>,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            traces: TraceSet::new(),
            workbag: Workbag::new(),
            spawned: Workbag::new(),
            online: Vec::new(),
            stats: MonitorStats::default(),
            first_violation: None,
        }
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    pub fn traces(&self) -> &TraceSet {
        &self.traces
    }

    /// Drive the monitor to a verdict over the given inputs.
    pub fn run<I: Inputs>(&mut self, inputs: &mut I) -> Verdict {
        loop {
            self.ingest(inputs);

            let invalid = match self.step_round() {
                ControlFlow::Break(verdict) => {
                    self.log_stats();
                    return verdict;
                }
                ControlFlow::Continue(invalid) => invalid,
            };

            self.maybe_compact(invalid);

            if self.workbag.is_empty() && inputs.done() {
                break;
            }
        }

        self.log_stats();
        match self.first_violation.take() {
            Some(verdict) => verdict,
            None => {
                info!("no violation of observational determinism found");
                Verdict::NoViolation
            }
        }
    }

    /// Pull at most one new stream and at most one event per online stream.
    fn ingest<I: Inputs>(&mut self, inputs: &mut I) {
        if let Some(source) = inputs.poll_new_stream() {
            let trace = self.traces.create();
            self.stats.traces = self.traces.len();
            debug!(%trace, "new input stream");
            self.spawn_fresh_sets(trace);
            self.online.push(OnlineStream { trace, source });
        }

        let traces = &mut self.traces;
        self.online.retain_mut(|stream| {
            if stream.source.has_event() {
                let event = stream.source.next_event();
                traces.get_mut(stream.trace).append(event);
            }
            // a stream may be done before it ever produced an event; it
            // still gets its terminal marker
            if stream.source.is_done() {
                let trace = traces.get_mut(stream.trace);
                let end_id = trace.len() as u64;
                trace.append(Event::end(end_id));
                trace.set_done();
                debug!(trace = %stream.trace, events = trace.len(), "stream finished");
                false
            } else {
                true
            }
        });
    }

    /// One fresh set per (known trace, new trace) pair.
    fn spawn_fresh_sets(&mut self, new_trace: TraceId) {
        let ids: Vec<TraceId> = self.traces.ids().collect();
        for known in ids {
            if self.config.skip_self_pairs && known == new_trace {
                continue;
            }
            self.workbag.push(ConfigurationSet::fresh([known, new_trace]));
            self.stats.sets_spawned += 1;

            if self.config.mirrored_pairs && known != new_trace {
                self.workbag.push(ConfigurationSet::fresh([new_trace, known]));
                self.stats.sets_spawned += 1;
            }
        }
    }

    /// Offer one step to every live configuration. Returns the number of
    /// invalid sets in the workbag, or breaks with a verdict when a
    /// violation must halt the run.
    fn step_round(&mut self) -> ControlFlow<Verdict, usize> {
        self.stats.rounds += 1;
        self.stats.max_workbag = self.stats.max_workbag.max(self.workbag.len());

        let Monitor { config, traces, workbag, spawned, stats, first_violation, .. } = self;

        let mut invalid = 0usize;
        for set in workbag.iter_mut() {
            if set.invalid() {
                invalid += 1;
                continue;
            }

            let mut any_live = false;
            let mut retired = false;
            let mut halt: Option<Verdict> = None;
            for cfg in set.iter_mut() {
                if cfg.failed() {
                    continue;
                }
                any_live = true;

                match advance(cfg, traces) {
                    Progress::Matched => {
                        retired = true;
                        match cfg.check() {
                            CheckKind::ObservableMatch => {
                                debug!(
                                    left = %cfg.trace(0),
                                    right = %cfg.trace(1),
                                    positions = ?cfg.positions(),
                                    "observable prefixes match; continuing the search"
                                );
                                spawned.push(ConfigurationSet::continuation(
                                    cfg.traces(),
                                    cfg.positions(),
                                ));
                                stats.sets_spawned += 1;
                            }
                            CheckKind::OutputDivergence => {
                                stats.violations += 1;
                                let verdict = violation_verdict(traces, cfg);
                                warn!(
                                    left = %cfg.trace(0),
                                    right = %cfg.trace(1),
                                    "observational determinism violated"
                                );
                                if config.exit_on_violation {
                                    halt = Some(verdict);
                                } else if first_violation.is_none() {
                                    *first_violation = Some(verdict);
                                }
                            }
                            CheckKind::InputDivergence => {
                                debug!(
                                    left = %cfg.trace(0),
                                    right = %cfg.trace(1),
                                    "input prefixes diverge; determinism holds vacuously here"
                                );
                            }
                        }
                        break;
                    }
                    Progress::Exhausted => {
                        retired = true;
                        break;
                    }
                    Progress::Idle | Progress::Failed => {}
                }
            }

            if retired || !any_live {
                set.set_invalid();
                invalid += 1;
            }

            if let Some(verdict) = halt {
                return ControlFlow::Break(verdict);
            }
        }

        ControlFlow::Continue(invalid)
    }

    /// Rebuild the workbag when the round spawned new sets or at least a
    /// third of it is invalid; otherwise leave it untouched to avoid
    /// needless copying.
    fn maybe_compact(&mut self, invalid: usize) {
        let total = self.workbag.len();
        if total == 0 && self.spawned.is_empty() {
            return;
        }
        if !self.spawned.is_empty() || invalid * 3 >= total {
            self.workbag.drain_valid_into(&mut self.spawned);
            self.workbag.swap(&mut self.spawned);
            self.spawned.clear();
            self.stats.compactions += 1;
        }
    }

    fn log_stats(&self) {
        info!(
            rounds = self.stats.rounds,
            traces = self.stats.traces,
            max_workbag = self.stats.max_workbag,
            sets_spawned = self.stats.sets_spawned,
            compactions = self.stats.compactions,
            violations = self.stats.violations,
            "monitoring finished"
        );
    }
}

/// Offer one step on each side that can proceed, in side order.
///
/// A joint accept or reject on the first side short-circuits the second.
/// When neither side can proceed and both traces are done, the
/// configuration has read everything it ever will.
fn advance(cfg: &mut Configuration, traces: &TraceSet) -> Progress {
    let mut progressed = false;
    for side in 0..2 {
        if cfg.can_proceed(side, traces) {
            progressed = true;
            match cfg.step(side, traces) {
                StepOutcome::Accept => return Progress::Matched,
                StepOutcome::Reject => return Progress::Failed,
                StepOutcome::Pending => {}
            }
        }
    }

    if !progressed
        && (0..2).all(|side| traces.get(cfg.trace(side)).is_done())
    {
        return Progress::Exhausted;
    }

    Progress::Idle
}

fn violation_verdict(traces: &TraceSet, cfg: &Configuration) -> Verdict {
    let left = cfg.trace(0);
    let right = cfg.trace(1);
    Verdict::Violation { left, right, report: trace_diff(traces, left, right) }
}

/// Unified diff of two traces' event listings, for violation reports.
fn trace_diff(traces: &TraceSet, left: TraceId, right: TraceId) -> String {
    let render = |id: TraceId| {
        let mut s = String::new();
        for event in traces.get(id).events() {
            s.push_str(&event.to_string());
            s.push('\n');
        }
        s
    };
    let left_str = render(left);
    let right_str = render(right);

    let mut out = format!("--- {left}\n+++ {right}\n");
    let diff = TextDiff::from_lines(&left_str, &right_str);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        out.push_str(sign);
        out.push_str(change.value());
        if !change.value().ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
