//! Substitution source parsing.
//!
//! Substitutions live in user-editable key-value text with an INI-style
//! `[Substitutions]` group, one `pattern=replacement` pair per line.
//! Replacements may use `U+XXXX` code-point notation, which is resolved
//! to UTF-8 here so the automaton only ever sees final literal bytes.
//!
//! ```text
//! [Substitutions]
//! # LaTeX-ish arrows
//! \rightarrow=U+2192
//! \Rightarrow=U+21D2
//! \dots=...
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::error::{Result, SubstError};
use crate::types::SubstPair;

/// Group header holding the substitution pairs
const SUBST_GROUP: &str = "Substitutions";

/// `U+XXXX` code-point notation, up to six hex digits
static CODEPOINT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^U\+([0-9A-Fa-f]{1,6})$").expect("CODEPOINT_PATTERN: hardcoded regex is invalid")
});

/// Parse substitution pairs from key-value text.
///
/// Lines outside the `[Substitutions]` group are ignored; a missing group
/// is an error. Pair order follows line order, which the builder and
/// packer preserve.
pub fn parse_substitutions(text: &str) -> Result<Vec<SubstPair>> {
    let mut pairs = Vec::new();
    let mut in_group = false;
    let mut group_seen = false;

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1; // 1-based line numbers
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_group = name == SUBST_GROUP;
            group_seen |= in_group;
            continue;
        }

        if !in_group {
            continue;
        }

        let (pattern, value) = line.split_once('=').ok_or_else(|| {
            SubstError::ParseErrorAtLine {
                line: line_num,
                message: format!("Expected pattern=replacement, got: {}", line),
            }
        })?;
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(SubstError::ParseErrorAtLine {
                line: line_num,
                message: "Empty pattern".to_string(),
            });
        }

        let replacement = resolve_replacement(value.trim(), line_num)?;
        pairs.push(SubstPair::new(pattern.as_bytes(), replacement));
    }

    if !group_seen {
        return Err(SubstError::ParseError(format!(
            "Substitution group \"{}\" missing",
            SUBST_GROUP
        )));
    }

    Ok(pairs)
}

/// Parse substitution pairs from a file.
pub fn parse_substitutions_from_file(path: impl AsRef<Path>) -> Result<Vec<SubstPair>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        SubstError::ParseError(format!(
            "Failed to read substitutions file '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_substitutions(&text)
}

/// Resolve `U+XXXX` notation to UTF-8; anything else passes through as
/// literal bytes.
fn resolve_replacement(value: &str, line_num: usize) -> Result<Vec<u8>> {
    let Some(captures) = CODEPOINT_PATTERN.captures(value) else {
        return Ok(value.as_bytes().to_vec());
    };

    let hex = &captures[1];
    let code = u32::from_str_radix(hex, 16).map_err(|_| SubstError::ParseErrorAtLine {
        line: line_num,
        message: format!("Invalid code point: {}", value),
    })?;
    let ch = char::from_u32(code).ok_or_else(|| SubstError::ParseErrorAtLine {
        line: line_num,
        message: format!("U+{} is not a Unicode scalar value", hex),
    })?;

    let mut buf = [0u8; 4];
    Ok(ch.encode_utf8(&mut buf).as_bytes().to_vec())
}
