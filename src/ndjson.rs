//! NDJSON event stream recording and file-backed input sources.
//!
//! Instrumented producers record their events one JSON object per line via
//! [`EventRecorder`]; a later monitoring run feeds those files back in
//! through [`NdjsonInputs`]. One file is one stream:
//!
//! ```json
//! {"kind":"low_input","id":1,"addr":16,"value":1}
//! {"kind":"low_output","id":2,"addr":16,"value":1}
//! ```
//!
//! Files are parsed eagerly on open, with line-precise errors, so the
//! polling contract of [`crate::source::Inputs`] stays infallible while the
//! monitor runs. The synthetic terminal event is appended by the monitor's
//! ingestion, never recorded in the file.

use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, SourceError};
use crate::event::Event;
use crate::source::{EventSource, Inputs, StaticSource};

/// Records events as NDJSON, one object per line.
pub struct EventRecorder {
    writer: std::io::BufWriter<std::fs::File>,
    count: usize,
}

impl EventRecorder {
    /// Create a recorder writing to the given file path.
    pub fn create(path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::create(path)?;
        Ok(Self { writer: std::io::BufWriter::new(file), count: 0 })
    }

    /// Write one event as an NDJSON line.
    pub fn record(&mut self, event: &Event) -> Result<(), Error> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.count += 1;
        Ok(())
    }

    /// Flush buffered output and return the number of events recorded.
    pub fn finish(mut self) -> Result<usize, Error> {
        self.writer.flush()?;
        Ok(self.count)
    }

    /// Number of events recorded so far.
    pub fn count(&self) -> usize {
        self.count
    }
}

/// File-backed [`Inputs`]: one NDJSON file per stream.
#[derive(Debug)]
pub struct NdjsonInputs {
    pending: VecDeque<Vec<Event>>,
}

impl NdjsonInputs {
    /// Open one stream per path. All files are read and decoded up front;
    /// an unreadable file or malformed line fails the whole open.
    pub fn open<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<Self, Error> {
        let mut pending = VecDeque::new();
        for path in paths {
            let path = path.as_ref();
            let events = read_events(path)?;
            debug!(path = %path.display(), events = events.len(), "loaded event stream");
            pending.push_back(events);
        }
        Ok(Self { pending })
    }
}

impl Inputs for NdjsonInputs {
    fn poll_new_stream(&mut self) -> Option<Box<dyn EventSource>> {
        self.pending
            .pop_front()
            .map(|events| Box::new(StaticSource::new(events)) as Box<dyn EventSource>)
    }

    fn done(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Decode one NDJSON event file. Blank lines are skipped; an empty file is a
/// legal zero-event stream.
fn read_events(path: &Path) -> Result<Vec<Event>, Error> {
    let content = std::fs::read_to_string(path).map_err(|e| SourceError::FileRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut events = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event: Event =
            serde_json::from_str(line).map_err(|e| SourceError::InvalidRecord {
                path: PathBuf::from(path),
                line: i + 1,
                reason: e.to_string(),
            })?;
        events.push(event);
    }
    Ok(events)
}
