//! Packed replacement buffer.
//!
//! Every replacement is copied into one contiguous region partitioned into
//! fixed-size NUL-padded slots, so a replacement's location is a plain
//! offset and the whole region serializes as a single opaque blob.

use log::debug;

use crate::error::{ConstructionErrorKind, Result, SubstError};
use crate::types::SubstPair;

/// Contiguous NUL-padded storage for replacement payloads.
///
/// Slot `i` starts at byte offset `i * stride` where
/// `stride = max replacement length + 1`; the trailing NUL padding
/// guarantees every slot holds at least one NUL terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementBuffer {
    bytes: Vec<u8>,
    stride: usize,
    count: usize,
}

impl ReplacementBuffer {
    /// Pack the replacements of `pairs` into a fresh buffer, preserving
    /// their order. Slot `i` holds the replacement of `pairs[i]` and its
    /// offset is `i * stride`.
    pub fn pack(pairs: &[SubstPair]) -> Result<Self> {
        if pairs.is_empty() {
            return Err(SubstError::construction(
                ConstructionErrorKind::EmptyPatternSet,
                "no substitutions supplied",
            ));
        }

        let longest = pairs.iter().map(|p| p.replacement.len()).max().unwrap_or(0);
        let stride = longest + 1;
        let count = pairs.len();

        // Offsets are persisted as i16, so the last slot must still fit.
        let last_offset = (count - 1) * stride;
        if last_offset > i16::MAX as usize {
            return Err(SubstError::construction(
                ConstructionErrorKind::OffsetSpaceExhausted,
                format!(
                    "replacement offset {} exceeds the i16 offset domain",
                    last_offset
                ),
            ));
        }

        debug!(
            "packing {} replacements, stride = {}, buffer size = {}",
            count,
            stride,
            count * stride
        );

        let mut bytes = vec![0u8; count * stride];
        for (i, pair) in pairs.iter().enumerate() {
            let start = i * stride;
            bytes[start..start + pair.replacement.len()].copy_from_slice(&pair.replacement);
        }

        Ok(Self {
            bytes,
            stride,
            count,
        })
    }

    /// Reassemble a buffer from its persisted parts.
    pub(crate) fn from_parts(bytes: Vec<u8>, stride: usize, count: usize) -> Result<Self> {
        if stride == 0 || count == 0 || bytes.len() != stride * count {
            return Err(SubstError::InvalidFormat(format!(
                "buffer size {} does not match {} slots of stride {}",
                bytes.len(),
                count,
                stride
            )));
        }
        Ok(Self {
            bytes,
            stride,
            count,
        })
    }

    /// Look up the replacement stored at `offset`, trimmed of its NUL
    /// padding. The offset must be an exact slot boundary.
    pub fn slot(&self, offset: i16) -> Result<&[u8]> {
        if offset < 0 {
            return Err(SubstError::InvalidOffset(offset));
        }
        let offset = offset as usize;
        if offset >= self.bytes.len() || offset % self.stride != 0 {
            return Err(SubstError::InvalidOffset(offset as i16));
        }

        let slot = &self.bytes[offset..offset + self.stride];
        let len = slot.iter().position(|&b| b == 0).unwrap_or(self.stride);
        Ok(&slot[..len])
    }

    /// Byte offset of slot `index`. Pack-time offset checks guarantee the
    /// cast fits for every valid index.
    pub(crate) fn offset_of(&self, index: usize) -> i16 {
        debug_assert!(index < self.count);
        (index * self.stride) as i16
    }

    /// Slot size in bytes
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of slots
    pub fn count(&self) -> usize {
        self.count
    }

    /// The raw packed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
