//! The ingestion contract: where events come from.
//!
//! The monitor never blocks on input. Each round it asks the [`Inputs`]
//! collaborator once for a new stream and polls every known stream for at
//! most one buffered event; a negative answer just means no progress on that
//! stream this round. How events are produced — files, sockets, an
//! instrumented process — is entirely behind these traits.

use crate::event::Event;

/// A single stream of incoming events, destined for one trace.
pub trait EventSource {
    /// Is an event currently buffered?
    fn has_event(&self) -> bool;

    /// Take the next buffered event. Defined only when
    /// [`EventSource::has_event`] returns true; calling it otherwise is a
    /// contract violation.
    fn next_event(&mut self) -> Event;

    /// The stream will produce no further events.
    fn is_done(&self) -> bool;
}

/// The collection of input streams feeding one monitoring session.
pub trait Inputs {
    /// Hand out a stream not seen before, at most one per call; `None` when
    /// no new source is available this round. Each underlying source is
    /// returned exactly once.
    fn poll_new_stream(&mut self) -> Option<Box<dyn EventSource>>;

    /// No further streams will ever become available. Streams already
    /// handed out may still be delivering events.
    fn done(&self) -> bool;
}

/// In-memory event source over a fixed event list.
pub struct StaticSource {
    events: std::vec::IntoIter<Event>,
}

impl StaticSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events: events.into_iter() }
    }
}

impl EventSource for StaticSource {
    fn has_event(&self) -> bool {
        self.events.len() > 0
    }

    fn next_event(&mut self) -> Event {
        self.events.next().expect("next_event without a buffered event")
    }

    fn is_done(&self) -> bool {
        self.events.len() == 0
    }
}

/// In-memory [`Inputs`] over fixed per-stream event lists, handing out one
/// stream per poll. The workhorse of scenario tests.
pub struct StaticInputs {
    pending: std::collections::VecDeque<Vec<Event>>,
}

impl StaticInputs {
    pub fn new(streams: Vec<Vec<Event>>) -> Self {
        Self { pending: streams.into() }
    }
}

impl Inputs for StaticInputs {
    fn poll_new_stream(&mut self) -> Option<Box<dyn EventSource>> {
        self.pending
            .pop_front()
            .map(|events| Box::new(StaticSource::new(events)) as Box<dyn EventSource>)
    }

    fn done(&self) -> bool {
        self.pending.is_empty()
    }
}
