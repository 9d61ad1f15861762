//! Trace events and their equality semantics.
//!
//! Events carry a discrete kind, a per-trace sequence id and an
//! (address, value) payload. Equality deliberately ignores the sequence id:
//! two traces agree on an observable step when the *content* of the step
//! matches, regardless of where in each trace it occurred. The reserved
//! terminal kind compares equal to itself unconditionally, so that two
//! finished traces can match on their endings without fabricating a payload.

use std::fmt;

#[cfg(feature = "ndjson")]
use serde::{Deserialize, Serialize};

/// Kind of a trace event.
///
/// `LowInput`/`LowOutput` are the externally observable steps that
/// observational determinism is judged over. `HighInput` and `Write` are
/// recorded but never accepted by any prefix automaton. `End` is the
/// synthetic terminal appended once when a stream finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ndjson", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "ndjson", serde(rename_all = "snake_case"))]
pub enum EventKind {
    /// Low-confidentiality (public) input.
    LowInput,
    /// High-confidentiality (secret) input.
    HighInput,
    /// Low-confidentiality (public) output.
    LowOutput,
    /// Memory write.
    Write,
    /// Terminal marker appended when a stream finishes.
    End,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::LowInput => "InputL",
            EventKind::HighInput => "InputH",
            EventKind::LowOutput => "OutputL",
            EventKind::Write => "Write",
            EventKind::End => "END",
        }
    }
}

/// One recorded event. Immutable once created.
#[derive(Debug, Clone, Copy, Eq)]
#[cfg_attr(feature = "ndjson", derive(Serialize, Deserialize))]
pub struct Event {
    pub kind: EventKind,
    /// Monotonically increasing sequence id within the owning trace.
    pub id: u64,
    pub addr: u64,
    pub value: u64,
}

impl Event {
    pub fn new(kind: EventKind, id: u64, addr: u64, value: u64) -> Self {
        Self { kind, id, addr, value }
    }

    pub fn low_input(id: u64, addr: u64, value: u64) -> Self {
        Self::new(EventKind::LowInput, id, addr, value)
    }

    pub fn high_input(id: u64, addr: u64, value: u64) -> Self {
        Self::new(EventKind::HighInput, id, addr, value)
    }

    pub fn low_output(id: u64, addr: u64, value: u64) -> Self {
        Self::new(EventKind::LowOutput, id, addr, value)
    }

    pub fn write(id: u64, addr: u64, value: u64) -> Self {
        Self::new(EventKind::Write, id, addr, value)
    }

    /// The synthetic terminal event. Payload is irrelevant for equality.
    pub fn end(id: u64) -> Self {
        Self::new(EventKind::End, id, 0, 0)
    }

    pub fn is_end(&self) -> bool {
        self.kind == EventKind::End
    }
}

impl PartialEq for Event {
    /// Sequence ids never participate in equality. Two `End` events are
    /// always equal; anything else matches on kind, addr and value.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && (self.kind == EventKind::End
                || (self.addr == other.addr && self.value == other.value))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(id={}, addr={:#x}, value={})",
            self.kind.as_str(),
            self.id,
            self.addr,
            self.value
        )
    }
}
