//! Automaton construction.
//!
//! Walks each pattern from state 0, reusing transitions created by earlier
//! patterns that share a prefix and allocating fresh states otherwise. The
//! terminal transition of each pattern is tagged with the offset of its
//! replacement in the packed buffer. The working map is keyed by the
//! explicit `(state, input)` pair and flattened into a sorted table at the
//! end, which the matcher's scan depends on.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::error::{ConstructionErrorKind, Result, SubstError};
use crate::pack::ReplacementBuffer;
use crate::types::{StateId, SubstPair, Transition, MAX_PATTERN_BYTE, NO_RESULT};

/// Build the flattened transition table for `pairs`, whose replacements
/// have already been packed into `buffer`. Returns the table and the
/// number of distinct states (state 0 included).
pub(crate) fn build_transitions(
    pairs: &[SubstPair],
    buffer: &ReplacementBuffer,
) -> Result<(Vec<Transition>, StateId)> {
    if pairs.is_empty() {
        return Err(SubstError::construction(
            ConstructionErrorKind::EmptyPatternSet,
            "no substitutions supplied",
        ));
    }

    let mut map: BTreeMap<(StateId, u8), Transition> = BTreeMap::new();
    let mut next_state: StateId = 1;

    for (i, pair) in pairs.iter().enumerate() {
        validate_pattern(&pair.pattern)?;

        let mut state: StateId = 0;
        let mut last_key = None;

        for &byte in &pair.pattern {
            let key = (state, byte);
            match map.get(&key) {
                Some(existing) => {
                    // A reused key must carry the input byte it was created
                    // with. The pair key makes this structural: the byte is
                    // part of the key itself, so a mismatch cannot occur.
                    debug_assert_eq!(existing.input, byte);
                    state = existing.to;
                }
                None => {
                    if next_state == StateId::MAX {
                        return Err(SubstError::construction(
                            ConstructionErrorKind::StateSpaceExhausted,
                            "state counter exhausted",
                        ));
                    }
                    let transition = Transition {
                        from: state,
                        input: byte,
                        to: next_state,
                        result: NO_RESULT,
                    };
                    debug!(
                        "inserting {} -- {:?} -> {}",
                        state, byte as char, next_state
                    );
                    map.insert(key, transition);
                    state = next_state;
                    next_state += 1;
                }
            }
            last_key = Some(key);
        }

        // Patterns are validated non-empty, so the terminal key exists.
        let terminal = last_key
            .and_then(|key| map.get_mut(&key))
            .ok_or_else(|| {
                SubstError::construction(
                    ConstructionErrorKind::EmptyPattern,
                    "pattern walked no transitions",
                )
            })?;

        if terminal.result != NO_RESULT {
            warn!(
                "duplicate pattern {:?}: last writer wins",
                String::from_utf8_lossy(&pair.pattern)
            );
        }
        terminal.result = buffer.offset_of(i);
    }

    // BTreeMap iteration order is exactly the (from, input) composite key
    // order the matcher requires.
    let transitions: Vec<Transition> = map.into_values().collect();
    debug!(
        "built {} transitions over {} states",
        transitions.len(),
        next_state
    );

    Ok((transitions, next_state))
}

fn validate_pattern(pattern: &[u8]) -> Result<()> {
    if pattern.is_empty() {
        return Err(SubstError::construction(
            ConstructionErrorKind::EmptyPattern,
            "empty pattern",
        ));
    }
    if let Some(&byte) = pattern.iter().find(|&&b| b == 0 || b > MAX_PATTERN_BYTE) {
        return Err(SubstError::construction(
            ConstructionErrorKind::NonAsciiPattern,
            format!(
                "pattern {:?} contains unsupported byte {:#04x}",
                String::from_utf8_lossy(pattern),
                byte
            ),
        ));
    }
    Ok(())
}
