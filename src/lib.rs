//! hypermon: online monitoring of observational determinism.
//!
//! Observational determinism is a *hyperproperty*: it relates pairs of
//! execution traces rather than judging one trace in isolation. Whenever two
//! traces agree on their externally observable prefix, they must continue to
//! agree. This crate monitors the property incrementally, as events from
//! multiple live streams arrive online, by maintaining for every trace pair
//! a small bundle of prefix automata and re-spawning fresh bundles at every
//! confirmed match point so the search moves forward without re-scanning
//! history.
//!
//! # Quick start
//!
//! ```
//! use hypermon::{Event, Monitor, MonitorConfig, StaticInputs};
//!
//! let addr = 0x10;
//! let stream = vec![
//!     Event::low_input(1, addr, 1),
//!     Event::low_output(2, addr, 1),
//! ];
//! let mut inputs = StaticInputs::new(vec![stream.clone(), stream]);
//!
//! let mut monitor = Monitor::new(MonitorConfig::default());
//! let verdict = monitor.run(&mut inputs);
//! assert_eq!(verdict.exit_code(), 0);
//! ```
//!
//! Events can also be recorded to NDJSON files by instrumented producers and
//! replayed through [`NdjsonInputs`] (the default `ndjson` feature).
//!
//! # How it works
//!
//! For each pair of traces the monitor runs three complementary checks: one
//! matching the next observable step on both sides (whose success spawns a
//! continuation bundle at the reached positions), one detecting divergence
//! of the next public output or trace end (a violation), and one detecting
//! divergence of the next public input (the pair was fed different inputs,
//! so the property holds vacuously there). Consumed spans are kept as
//! compressed position intervals and compared with a letter-boundary-
//! agnostic lockstep walk.

pub mod automata;
pub mod configuration;
pub mod error;
pub mod event;
pub mod letters;
pub mod monitor;
#[cfg(feature = "ndjson")]
pub mod ndjson;
pub mod source;
pub mod subword;
pub mod trace;
pub mod workbag;

// Re-export core types for convenience
pub use automata::{CheckKind, StepOutcome};
pub use error::{Error, Result};
pub use event::{Event, EventKind};
pub use letters::{CompressedMatch, Letter};
pub use monitor::{Monitor, MonitorConfig, MonitorStats, Verdict};
#[cfg(feature = "ndjson")]
pub use ndjson::{EventRecorder, NdjsonInputs};
pub use source::{EventSource, Inputs, StaticInputs, StaticSource};
pub use subword::subword_eq;
pub use trace::{Trace, TraceId, TraceSet};
