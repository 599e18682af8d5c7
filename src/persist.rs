//! Automaton persistence.
//!
//! One binary file per automaton, little-endian fixed-width integers,
//! written and read with the same symmetric layout:
//!
//! ```text
//! u32 transition_count
//! transition_count x { u32 from, u8 input, u32 to, i16 result }
//! u32 slot_count
//! u64 stride
//! u64 buffer_size
//! buffer_size bytes of packed replacement buffer
//! ```
//!
//! `save` immediately re-reads the file and compares it byte-for-byte
//! against what it wrote. A mismatch only makes the persisted copy
//! suspect; the in-memory automaton is fully constructed before the first
//! byte hits the disk and stays valid.

use std::fs;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::automaton::Automaton;
use crate::error::{Result, SubstError};
use crate::pack::ReplacementBuffer;
use crate::types::{StateId, Transition, NO_RESULT};

/// Maximum transition count accepted on load (guards allocation against
/// corrupt or malicious count fields).
const MAX_TRANSITION_COUNT: u32 = 1 << 22;

/// Maximum replacement buffer size accepted on load. Result offsets are
/// i16, so anything near this limit is already unreachable.
const MAX_BUFFER_SIZE: u64 = 1 << 20;

/// Persist `automaton` to `path` and verify the written copy.
///
/// Returns [`SubstError::VerificationFailed`] when the file reads back
/// different from what was written; the in-memory automaton remains valid
/// either way.
pub fn save(automaton: &Automaton, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let encoded = encode(automaton);

    debug!(
        "dumping automaton to {} ({} transitions, {} buffer bytes)",
        path.display(),
        automaton.transitions().len(),
        automaton.buffer().as_bytes().len()
    );
    fs::write(path, &encoded)?;

    let written = fs::read(path)?;
    if written != encoded {
        warn!(
            "verification failed: {} differs from the automaton just written",
            path.display()
        );
        return Err(SubstError::VerificationFailed);
    }
    debug!("verified {} byte-for-byte", path.display());

    Ok(())
}

/// Load an automaton previously written by [`save`].
pub fn load(path: impl AsRef<Path>) -> Result<Automaton> {
    let path = path.as_ref();
    debug!("reading automaton from {}", path.display());
    let file = fs::File::open(path)?;
    decode(&mut std::io::BufReader::new(file))
}

fn encode(automaton: &Automaton) -> Vec<u8> {
    let transitions = automaton.transitions();
    let buffer = automaton.buffer();

    let mut out = Vec::with_capacity(4 + transitions.len() * 11 + 20 + buffer.as_bytes().len());
    out.extend_from_slice(&(transitions.len() as u32).to_le_bytes());
    for t in transitions {
        out.extend_from_slice(&t.from.to_le_bytes());
        out.push(t.input);
        out.extend_from_slice(&t.to.to_le_bytes());
        out.extend_from_slice(&t.result.to_le_bytes());
    }
    out.extend_from_slice(&(buffer.count() as u32).to_le_bytes());
    out.extend_from_slice(&(buffer.stride() as u64).to_le_bytes());
    out.extend_from_slice(&(buffer.as_bytes().len() as u64).to_le_bytes());
    out.extend_from_slice(buffer.as_bytes());

    out
}

fn decode<R: Read>(reader: &mut R) -> Result<Automaton> {
    let transition_count = read_u32(reader)?;
    if transition_count == 0 {
        return Err(SubstError::InvalidFormat(
            "automaton has no transitions".to_string(),
        ));
    }
    if transition_count > MAX_TRANSITION_COUNT {
        return Err(SubstError::InvalidFormat(format!(
            "transition count {} exceeds limit of {}",
            transition_count, MAX_TRANSITION_COUNT
        )));
    }

    let mut transitions = Vec::with_capacity(transition_count as usize);
    for _ in 0..transition_count {
        let from = read_u32(reader)?;
        let input = read_u8(reader)?;
        let to = read_u32(reader)?;
        let result = read_i16(reader)?;
        transitions.push(Transition {
            from,
            input,
            to,
            result,
        });
    }

    // The matcher's scan precondition: sorted by (from, input), no
    // duplicate keys.
    for pair in transitions.windows(2) {
        if pair[0].key() >= pair[1].key() {
            return Err(SubstError::InvalidFormat(format!(
                "transition table not sorted at key ({}, {})",
                pair[1].from, pair[1].input
            )));
        }
    }

    let slot_count = read_u32(reader)? as usize;
    let stride = read_u64(reader)? as usize;
    let buffer_size = read_u64(reader)?;
    if buffer_size > MAX_BUFFER_SIZE {
        return Err(SubstError::InvalidFormat(format!(
            "buffer size {} exceeds limit of {}",
            buffer_size, MAX_BUFFER_SIZE
        )));
    }

    let mut bytes = vec![0u8; buffer_size as usize];
    reader.read_exact(&mut bytes)?;
    let buffer = ReplacementBuffer::from_parts(bytes, stride, slot_count)?;

    for t in &transitions {
        if t.result != NO_RESULT && buffer.slot(t.result).is_err() {
            return Err(SubstError::InvalidFormat(format!(
                "result offset {} is not a slot boundary",
                t.result
            )));
        }
    }

    // States are allocated contiguously from 1, and every state except 0
    // is some transition's target.
    let state_count: StateId = transitions.iter().map(|t| t.to).max().unwrap_or(0) + 1;

    debug!(
        "automaton read: {} transitions, {} states, {} buffer bytes",
        transitions.len(),
        state_count,
        buffer_size
    );

    Ok(Automaton::from_parts(transitions, buffer, state_count))
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_i16<R: Read>(reader: &mut R) -> Result<i16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(i16::from_le_bytes(buf))
}
