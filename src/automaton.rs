//! The compiled automaton: one transition table and one replacement
//! buffer with matched lifetimes. Built once per pattern-set change,
//! read-only during matching; replacing patterns means rebuilding.

use crate::builder::build_transitions;
use crate::error::Result;
use crate::pack::ReplacementBuffer;
use crate::types::{StateId, SubstPair, Transition};

/// A compiled substitution automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    transitions: Vec<Transition>,
    buffer: ReplacementBuffer,
    state_count: StateId,
}

impl Automaton {
    /// Compile an ordered set of (pattern, replacement) pairs.
    ///
    /// Packs the replacements, then builds the shared-prefix transition
    /// table. The input pairs are no longer needed afterwards.
    pub fn build(pairs: &[SubstPair]) -> Result<Self> {
        let buffer = ReplacementBuffer::pack(pairs)?;
        let (transitions, state_count) = build_transitions(pairs, &buffer)?;
        Ok(Self {
            transitions,
            buffer,
            state_count,
        })
    }

    /// Reassemble an automaton from persisted parts.
    pub(crate) fn from_parts(
        transitions: Vec<Transition>,
        buffer: ReplacementBuffer,
        state_count: StateId,
    ) -> Self {
        Self {
            transitions,
            buffer,
            state_count,
        }
    }

    /// The flattened transition table, sorted by `(from, input)`
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The packed replacement buffer
    pub fn buffer(&self) -> &ReplacementBuffer {
        &self.buffer
    }

    /// Number of distinct states, state 0 included
    pub fn state_count(&self) -> StateId {
        self.state_count
    }

    /// Look up the replacement stored at `offset`
    pub fn replacement(&self, offset: i16) -> Result<&[u8]> {
        self.buffer.slot(offset)
    }
}
