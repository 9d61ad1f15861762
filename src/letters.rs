//! Compressed-match encoding: letters and letter sequences.
//!
//! A [`Letter`] is a closed interval of positions into one trace, recording
//! a contiguous span the automaton consumed for one observable step. A
//! [`CompressedMatch`] is the ordered sequence of letters one side of a
//! two-trace check has produced so far — a run-length compression of the
//! matched positions, not the raw events. Later comparison
//! ([`crate::subword::subword_eq`]) works over these spans, so a match over
//! a long consumed prefix stays a handful of intervals.
//!
//! Letters are produced in increasing, non-overlapping order within one
//! automaton run. The overwhelmingly common case is a single letter, so the
//! sequence stores one letter inline and only spills to a heap vector past
//! that.

use std::fmt;

/// A closed interval `[start, end]` of positions within one trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Letter {
    pub start: usize,
    pub end: usize,
}

impl Letter {
    /// Sentinel for an interval whose end is not yet known.
    pub const OPEN: usize = usize::MAX;

    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Single-position interval, the shape every acceptance step produces.
    pub fn at(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn is_open(&self) -> bool {
        self.end == Self::OPEN
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_open() {
            write!(f, "({}, _)", self.start)
        } else {
            write!(f, "({}, {})", self.start, self.end)
        }
    }
}

/// Small-size-optimized letter storage: one letter inline, a heap vector
/// past that.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Repr {
    Empty,
    One(Letter),
    Many(Vec<Letter>),
}

/// Ordered sequence of letters standing in for a consumed subsequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedMatch {
    repr: Repr,
}

impl CompressedMatch {
    pub fn new() -> Self {
        Self { repr: Repr::Empty }
    }

    /// Build from explicit letters, keeping the given chunking verbatim.
    ///
    /// Unlike [`CompressedMatch::append`] this performs no adjacency
    /// merging; used when re-ingesting a stored match whose letter layout
    /// must be preserved.
    pub fn from_letters(letters: impl IntoIterator<Item = Letter>) -> Self {
        let letters: Vec<Letter> = letters.into_iter().collect();
        let repr = match letters.len() {
            0 => Repr::Empty,
            1 => Repr::One(letters[0]),
            _ => Repr::Many(letters),
        };
        Self { repr }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.repr, Repr::Empty)
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Empty => 0,
            Repr::One(_) => 1,
            Repr::Many(v) => v.len(),
        }
    }

    pub fn get(&self, idx: usize) -> Letter {
        match &self.repr {
            Repr::Empty => panic!("letter index {idx} out of bounds"),
            Repr::One(l) => {
                assert!(idx == 0, "letter index {idx} out of bounds");
                *l
            }
            Repr::Many(v) => v[idx],
        }
    }

    pub fn last(&self) -> Option<Letter> {
        match &self.repr {
            Repr::Empty => None,
            Repr::One(l) => Some(*l),
            Repr::Many(v) => v.last().copied(),
        }
    }

    /// Append a consumed span.
    ///
    /// A letter starting right after the current last letter's end extends
    /// that letter in place, keeping the sequence run-length compressed; an
    /// open last letter is closed by the appended end. Anything else starts
    /// a new letter. Appended letters must be closed.
    pub fn append(&mut self, letter: Letter) {
        debug_assert!(!letter.is_open(), "appending an open letter");
        debug_assert!(letter.start != Letter::OPEN, "appending an unset start");

        let merge = match self.last() {
            None => {
                self.repr = Repr::One(letter);
                return;
            }
            Some(last) => {
                debug_assert!(
                    last.is_open() || letter.start > last.end,
                    "letters out of order"
                );
                last.is_open() || last.end + 1 == letter.start
            }
        };

        if merge {
            let last = self.last_mut().expect("non-empty by construction");
            last.end = letter.end;
        } else {
            self.push(letter);
        }
    }

    fn last_mut(&mut self) -> Option<&mut Letter> {
        match &mut self.repr {
            Repr::Empty => None,
            Repr::One(l) => Some(l),
            Repr::Many(v) => v.last_mut(),
        }
    }

    /// Start a new letter, spilling the inline slot to the heap if needed.
    fn push(&mut self, letter: Letter) {
        match &mut self.repr {
            Repr::Empty => self.repr = Repr::One(letter),
            Repr::One(first) => self.repr = Repr::Many(vec![*first, letter]),
            Repr::Many(v) => v.push(letter),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Letter> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

impl Default for CompressedMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CompressedMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.iter() {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}
