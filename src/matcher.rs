//! Streaming matcher.
//!
//! Consumes a live character cursor owned by the caller. The matcher
//! walks the transition table from state 0, remembers the furthest
//! accepting transition it crossed, and realizes longest-match semantics:
//! among all prefixes of the scanned run that are complete patterns, the
//! longest wins. On failure the cursor is restored to where the match
//! started; the caller must advance its own outer scan by at least one
//! character to avoid re-testing the same position forever.

use crate::automaton::Automaton;
use crate::types::{MatchOutcome, StateId, Transition, NO_RESULT};

/// A read-only forward character cursor, e.g. over an editor buffer.
///
/// Positions count characters from the start of the underlying text;
/// `position()` is the index of the character `peek()` would return.
pub trait Cursor {
    /// The character at the current position, or `None` at end of input
    fn peek(&self) -> Option<char>;
    /// Move one character forward. Returns false at end of input.
    fn advance(&mut self) -> bool;
    /// Move one character backward. Returns false at the start.
    fn retreat(&mut self) -> bool;
    /// Current character offset
    fn position(&self) -> usize;
}

/// Cursor over a byte slice. Each byte is one character position, mapped
/// through Latin-1 so values above 127 surface as non-ASCII characters.
#[derive(Debug, Clone)]
pub struct SliceCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceCursor<'a> {
    /// Cursor positioned at the start of `bytes`
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Cursor positioned at `pos`
    pub fn at(bytes: &'a [u8], pos: usize) -> Self {
        Self {
            bytes,
            pos: pos.min(bytes.len()),
        }
    }
}

impl Cursor for SliceCursor<'_> {
    fn peek(&self) -> Option<char> {
        self.bytes.get(self.pos).map(|&b| b as char)
    }

    fn advance(&mut self) -> bool {
        if self.pos < self.bytes.len() {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn retreat(&mut self) -> bool {
        if self.pos > 0 {
            self.pos -= 1;
            true
        } else {
            false
        }
    }

    fn position(&self) -> usize {
        self.pos
    }
}

/// Attempt a match starting at the cursor's current position.
///
/// On success the cursor is left at the exclusive end of the longest
/// matched pattern. On [`MatchOutcome::NoMatch`] or
/// [`MatchOutcome::UnsupportedCharacter`] the cursor is restored to its
/// start position. Both failures are expected outcomes, not errors.
pub fn match_at<'a>(automaton: &'a Automaton, cursor: &mut impl Cursor) -> MatchOutcome<'a> {
    let table = automaton.transitions();
    let start = cursor.position();

    let mut state: StateId = 0;
    // Scan position cache for this invocation only. Sharing it across
    // calls would make concurrent matching over one automaton unsound.
    let mut hint = 0usize;
    let mut best: Option<(i16, usize)> = None;
    let mut unsupported = false;

    loop {
        let Some(ch) = cursor.peek() else { break };
        // Checked before any transition lookup.
        if ch as u32 >= 128 {
            unsupported = true;
            break;
        }

        let Some(transition) = next_transition(table, state, ch as u8, &mut hint) else {
            break;
        };

        cursor.advance();
        if transition.result != NO_RESULT {
            best = Some((transition.result, cursor.position()));
        }
        state = transition.to;
    }

    match best {
        Some((offset, end)) => {
            rewind_to(cursor, end);
            match automaton.replacement(offset) {
                Ok(replacement) => MatchOutcome::Matched { replacement, end },
                Err(_) => {
                    rewind_to(cursor, start);
                    MatchOutcome::NoMatch
                }
            }
        }
        None => {
            rewind_to(cursor, start);
            if unsupported {
                MatchOutcome::UnsupportedCharacter
            } else {
                MatchOutcome::NoMatch
            }
        }
    }
}

/// Walk the cursor to `target` using only its own operations.
fn rewind_to(cursor: &mut impl Cursor, target: usize) {
    while cursor.position() > target && cursor.retreat() {}
    while cursor.position() < target && cursor.advance() {}
}

/// Find the transition for `(state, input)` with a forward-biased scan.
///
/// States visited during one match are strictly increasing, and the table
/// is sorted by `(from, input)`, so the search can resume from where the
/// previous step of this same match left off.
fn next_transition<'a>(
    table: &'a [Transition],
    state: StateId,
    input: u8,
    hint: &mut usize,
) -> Option<&'a Transition> {
    let resume = if *hint < table.len() && table[*hint].from < state {
        *hint
    } else {
        0
    };

    for (i, t) in table.iter().enumerate().skip(resume) {
        if t.from > state {
            break;
        }
        if t.from == state && t.input == input {
            *hint = i;
            return Some(t);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubstPair;

    fn automaton(specs: &[(&str, &str)]) -> Automaton {
        let pairs: Vec<SubstPair> = specs
            .iter()
            .map(|(p, w)| SubstPair::new(p.as_bytes(), w.as_bytes()))
            .collect();
        Automaton::build(&pairs).unwrap()
    }

    #[test]
    fn test_exact_pattern_matches_itself() {
        let a = automaton(&[("\\rightarrow", "\u{2192}")]);
        let mut cursor = SliceCursor::new(b"\\rightarrow");
        let outcome = match_at(&a, &mut cursor);
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                replacement: "\u{2192}".as_bytes(),
                end: 11,
            }
        );
        assert_eq!(cursor.position(), 11);
    }

    #[test]
    fn test_longest_match_wins() {
        // "ab" -> X, "abc" -> Y: the longer pattern takes precedence when
        // the input carries it to completion.
        let a = automaton(&[("ab", "X"), ("abc", "Y")]);

        let mut cursor = SliceCursor::new(b"abc");
        let outcome = match_at(&a, &mut cursor);
        assert_eq!(outcome.replacement(), Some(&b"Y"[..]));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_backtracks_to_shorter_accepted_prefix() {
        let a = automaton(&[("ab", "X"), ("abc", "Y")]);

        let mut cursor = SliceCursor::new(b"abd");
        let outcome = match_at(&a, &mut cursor);
        assert_eq!(outcome.replacement(), Some(&b"X"[..]));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_incomplete_prefix_is_no_match() {
        let a = automaton(&[("ab", "X"), ("abc", "Y")]);

        let mut cursor = SliceCursor::new(b"a");
        assert_eq!(match_at(&a, &mut cursor), MatchOutcome::NoMatch);
        assert_eq!(cursor.position(), 0, "cursor must be restored");
    }

    #[test]
    fn test_empty_input_is_no_match() {
        let a = automaton(&[("ab", "X")]);
        let mut cursor = SliceCursor::new(b"");
        assert_eq!(match_at(&a, &mut cursor), MatchOutcome::NoMatch);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_no_transition_from_state_zero_is_no_match() {
        let a = automaton(&[("ab", "X")]);
        let mut cursor = SliceCursor::new(b"zz");
        assert_eq!(match_at(&a, &mut cursor), MatchOutcome::NoMatch);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_non_ascii_short_circuits() {
        let a = automaton(&[("ab", "X")]);
        let mut cursor = SliceCursor::new(&[0xE2, 0x86, 0x92]);
        assert_eq!(match_at(&a, &mut cursor), MatchOutcome::UnsupportedCharacter);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_non_ascii_after_accepted_prefix_keeps_the_match() {
        // The scan stops at the non-ASCII byte, but a best result was
        // already recorded; stopping returns it like any other stop.
        let a = automaton(&[("ab", "X")]);
        let mut cursor = SliceCursor::new(&[b'a', b'b', 0xC3, 0xA9]);
        let outcome = match_at(&a, &mut cursor);
        assert_eq!(outcome.replacement(), Some(&b"X"[..]));
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_match_from_mid_buffer_position() {
        let a = automaton(&[("\\to", ">")]);
        let text = b"see \\to here";
        let mut cursor = SliceCursor::at(text, 4);
        let outcome = match_at(&a, &mut cursor);
        assert_eq!(outcome.replacement(), Some(&b">"[..]));
        assert_eq!(cursor.position(), 7);
    }

    #[test]
    fn test_trailing_text_after_match_is_ignored() {
        let a = automaton(&[("abc", "Y")]);
        let mut cursor = SliceCursor::new(b"abcdef");
        let outcome = match_at(&a, &mut cursor);
        assert_eq!(outcome.replacement(), Some(&b"Y"[..]));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_match_ending_at_end_of_input() {
        // The terminal transition lands exactly on the last character.
        let a = automaton(&[("end", "E")]);
        let mut cursor = SliceCursor::new(b"end");
        let outcome = match_at(&a, &mut cursor);
        assert_eq!(outcome.replacement(), Some(&b"E"[..]));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_repeated_matches_on_one_automaton() {
        // The scan hint is local to each invocation, so interleaved or
        // repeated matches never poison each other.
        let a = automaton(&[("aa", "1"), ("bb", "2")]);

        let mut c1 = SliceCursor::new(b"bb");
        assert_eq!(match_at(&a, &mut c1).replacement(), Some(&b"2"[..]));

        let mut c2 = SliceCursor::new(b"aa");
        assert_eq!(match_at(&a, &mut c2).replacement(), Some(&b"1"[..]));

        let mut c3 = SliceCursor::new(b"bb");
        assert_eq!(match_at(&a, &mut c3).replacement(), Some(&b"2"[..]));
    }

    #[test]
    fn test_failure_after_deep_partial_walk_restores_start() {
        // A long shared prefix is consumed before the dead end; the
        // cursor must come all the way back to where the match began.
        let a = automaton(&[("\\rightarrow", "X")]);
        let mut cursor = SliceCursor::at(b"..\\rightarroz", 2);
        assert_eq!(match_at(&a, &mut cursor), MatchOutcome::NoMatch);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_rewind_to_moves_both_directions() {
        let mut cursor = SliceCursor::at(b"abcdef", 4);
        rewind_to(&mut cursor, 1);
        assert_eq!(cursor.position(), 1);
        rewind_to(&mut cursor, 5);
        assert_eq!(cursor.position(), 5);
        rewind_to(&mut cursor, 5);
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_slice_cursor_contract() {
        let mut cursor = SliceCursor::new(b"ab");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.position(), 0);
        assert!(cursor.advance());
        assert_eq!(cursor.peek(), Some('b'));
        assert!(cursor.advance());
        assert_eq!(cursor.peek(), None);
        assert!(!cursor.advance());
        assert!(cursor.retreat());
        assert_eq!(cursor.peek(), Some('b'));
        assert!(cursor.retreat());
        assert!(!cursor.retreat());
    }
}
