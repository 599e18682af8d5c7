//! Substitution Engine - a compact matching table for literal trigger sequences
//!
//! This library lets an editor component recognize special escape
//! sequences (e.g. `\rightarrow`) and replace them with intended output
//! without rescanning the full text for every candidate pattern on every
//! keystroke. It provides:
//! - A shared-prefix transition table built from possibly-overlapping
//!   literal patterns
//! - A packed replacement buffer with O(1) offset lookup
//! - Streaming longest-match semantics over a caller-owned cursor
//! - Binary persistence with byte-for-byte self-verification
//! - A parser for user-editable `pattern=replacement` key-value text
//!
//! # Example
//!
//! ```rust
//! use subst_engine::{match_at, parse_substitutions, Automaton, MatchOutcome, SliceCursor};
//!
//! let text = r"
//! [Substitutions]
//! \rightarrow=U+2192
//! \Rightarrow=U+21D2
//! ";
//!
//! // Parse pairs and compile the automaton
//! let pairs = parse_substitutions(text).unwrap();
//! let automaton = Automaton::build(&pairs).unwrap();
//!
//! // Match against a cursor the caller owns
//! let mut cursor = SliceCursor::new(b"\\rightarrow and more");
//! match match_at(&automaton, &mut cursor) {
//!     MatchOutcome::Matched { replacement, end } => {
//!         assert_eq!(replacement, "\u{2192}".as_bytes());
//!         assert_eq!(end, 11);
//!     }
//!     _ => panic!("expected a match"),
//! }
//! ```
//!
//! # Matching semantics
//!
//! A match starts at the cursor's current position and consumes
//! characters while transitions exist. Among all prefixes of the scanned
//! run that are complete patterns, the longest wins; on failure the
//! cursor is restored to its start. Patterns are literal ASCII only (no
//! wildcards, no Unicode triggers); a character outside the ASCII domain
//! stops the scan immediately.
//!
//! The pattern set is compiled wholesale; changing it means rebuilding
//! the automaton. Once built, an automaton is immutable and safe to
//! share for concurrent read-only matching.

pub mod automaton;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod pack;
pub mod persist;
pub mod types;

mod builder;

// Re-export commonly used items
pub use automaton::Automaton;
pub use error::{ConstructionErrorKind, Result, SubstError};
pub use loader::{parse_substitutions, parse_substitutions_from_file};
pub use matcher::{match_at, Cursor, SliceCursor};
pub use pack::ReplacementBuffer;
pub use persist::{load, save};
pub use types::{MatchOutcome, StateId, SubstPair, Transition, NO_RESULT};
