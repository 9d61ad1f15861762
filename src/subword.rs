//! Lockstep comparison of two compressed matches.
//!
//! This is the crux primitive of the monitor: it decides whether the event
//! subsequences denoted by two compressed matches are identical position by
//! position, *ignoring how each match is chunked into letters*. A letter
//! boundary on one side need not line up with a boundary on the other, so a
//! compact span representation can stand in for a materialized subsequence
//! equality check. Cost is proportional to the total consumed length, not
//! the letter count.

use crate::letters::CompressedMatch;
use crate::trace::Trace;

/// Walk state for one side: which letter we are in and the position within.
struct Cursor<'a> {
    m: &'a CompressedMatch,
    letter: usize,
    pos: usize,
    exhausted: bool,
}

impl<'a> Cursor<'a> {
    fn new(m: &'a CompressedMatch) -> Self {
        Self { m, letter: 0, pos: m.get(0).start, exhausted: false }
    }

    /// Advance one denoted position: within the current letter, or to the
    /// start of the next letter, or into the exhausted state.
    fn advance(&mut self) {
        if self.pos == self.m.get(self.letter).end {
            self.letter += 1;
            if self.letter == self.m.len() {
                self.exhausted = true;
            } else {
                self.pos = self.m.get(self.letter).start;
            }
        } else {
            self.pos += 1;
        }
    }
}

/// Decide whether `m1` over `t1` and `m2` over `t2` denote the same event
/// sequence, using event equality (sequence ids ignored, `End` equal to
/// `End`).
///
/// Both matches must be non-empty; handing an empty match to the comparison
/// is a contract violation of the caller.
pub fn subword_eq(t1: &Trace, m1: &CompressedMatch, t2: &Trace, m2: &CompressedMatch) -> bool {
    assert!(!m1.is_empty() && !m2.is_empty(), "subword_eq on an empty match");

    let mut c1 = Cursor::new(m1);
    let mut c2 = Cursor::new(m2);

    loop {
        if t1.get(c1.pos) != t2.get(c2.pos) {
            return false;
        }

        c1.advance();
        c2.advance();

        // The sequences match only when both sides run out in the same step.
        match (c1.exhausted, c2.exhausted) {
            (true, true) => return true,
            (false, false) => {}
            _ => return false,
        }
    }
}
