/// State identifier in the transition table. State 0 is the unique
/// initial state and never carries a replacement result.
pub type StateId = u32;

/// Sentinel result offset meaning "this transition completes no pattern".
pub const NO_RESULT: i16 = -1;

/// Highest byte value allowed inside a pattern. Patterns are literal
/// ASCII and must not contain NUL, so the valid domain is 1..=126.
pub(crate) const MAX_PATTERN_BYTE: u8 = 126;

/// A single `(state, input) -> (state, result)` edge of the automaton.
///
/// `result` is the offset of a replacement in the packed buffer, or
/// [`NO_RESULT`] if following this edge completes no pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Source state
    pub from: StateId,
    /// Input byte consumed by this edge
    pub input: u8,
    /// Destination state
    pub to: StateId,
    /// Replacement buffer offset, or -1
    pub result: i16,
}

impl Transition {
    /// Composite sort key. The flattened table is ordered by `(from, input)`,
    /// which the matcher's forward-biased scan relies on.
    pub(crate) fn key(&self) -> (StateId, u8) {
        (self.from, self.input)
    }
}

/// A raw (pattern, replacement) pair before compilation.
///
/// The pattern is the literal trigger text; the replacement is the final
/// byte string to substitute. Symbolic notation (e.g. `U+2192`) must be
/// resolved upstream, before the pair reaches the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstPair {
    /// Literal ASCII trigger
    pub pattern: Vec<u8>,
    /// Replacement payload
    pub replacement: Vec<u8>,
}

impl SubstPair {
    /// Create a new pair from anything byte-like
    pub fn new(pattern: impl Into<Vec<u8>>, replacement: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Result of a single match attempt against a cursor.
///
/// The two failure variants are expected, frequent outcomes the caller
/// checks, not errors. After either failure the cursor is restored to the
/// position it had when the match started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome<'a> {
    /// A pattern matched. The cursor now sits at `end`, the exclusive end
    /// of the longest matched pattern.
    Matched {
        /// Replacement payload associated with the matched pattern
        replacement: &'a [u8],
        /// Exclusive end position of the match
        end: usize,
    },
    /// No pattern prefix of the scanned run was complete
    NoMatch,
    /// A character outside the ASCII domain was reached before any match
    UnsupportedCharacter,
}

impl<'a> MatchOutcome<'a> {
    /// True if a pattern matched
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }

    /// The replacement payload, if a pattern matched
    pub fn replacement(&self) -> Option<&'a [u8]> {
        match self {
            MatchOutcome::Matched { replacement, .. } => Some(replacement),
            _ => None,
        }
    }
}
