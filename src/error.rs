//! Typed errors for hypermon.
//!
//! Only runtime conditions surface as errors: failures of the stream layer
//! (missing files, malformed records) and I/O. Violations of the monitor's
//! own invariants — stepping a side that cannot proceed, indexing past a
//! trace's recorded length — are logic defects and panic instead; a detected
//! property violation is not an error at all but the monitor's intended
//! output (see [`crate::monitor::Verdict`]).

use thiserror::Error;

#[cfg(feature = "ndjson")]
use std::path::PathBuf;

/// Top-level error type for hypermon operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Error in the input stream layer.
    #[cfg(feature = "ndjson")]
    #[error("Input source error: {0}")]
    Source(#[from] SourceError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[cfg(feature = "ndjson")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error while opening or decoding recorded event streams.
#[cfg(feature = "ndjson")]
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// Event stream file not found or unreadable.
    #[error("Cannot read event stream {path}: {reason}")]
    FileRead { path: PathBuf, reason: String },

    /// A line is not a valid event record.
    #[error("{path}, line {line}: invalid event record: {reason}")]
    InvalidRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Result type alias using hypermon's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
