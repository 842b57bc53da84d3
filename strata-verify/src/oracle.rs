//! Reference model of what a CHAR/VARCHAR column should return after a round trip.
//!
//! Lengths are measured in Unicode codepoints, never in bytes or UTF-16 units.
//! The model does not share code with the byte-level helpers in the storage engine.

use crate::corpus::InputCorpus;
use crate::scenario::{StringKind, TestCase};

const PAD: char = ' ';

/// Number of Unicode codepoints in `s`
pub fn codepoint_count(s: &str) -> usize {
    s.chars().count()
}

/// The first `n` codepoints of `s` (all of `s` if it is shorter)
pub fn codepoint_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate `value` to at most `max_length` codepoints.
///
/// A negative `max_length` disables enforcement.
pub fn enforce_max_length(value: Option<&str>, max_length: i64) -> Option<String> {
    let s = value?;
    let Ok(max) = usize::try_from(max_length) else {
        return Some(s.to_string());
    };
    if codepoint_count(s) <= max {
        return Some(s.to_string());
    }
    Some(codepoint_prefix(s, max).to_string())
}

/// Expected CHAR value: truncated when too long, space-padded to `max_length`
/// codepoints when too short and `trim` is off.
pub fn compute_padded(value: Option<&str>, max_length: i64, trim: bool) -> Option<String> {
    let s = value?;
    let Ok(max) = usize::try_from(max_length) else {
        return Some(s.to_string());
    };
    let count = codepoint_count(s);
    if count > max {
        return enforce_max_length(Some(s), max_length);
    }
    if trim || count == max {
        return Some(s.to_string());
    }

    // Every pad is one byte, so the byte target is the original length plus the shortfall.
    let target = s.len() + (max - count);
    let mut padded = String::with_capacity(target);
    padded.push_str(s);
    while padded.len() < target {
        padded.push(PAD);
    }
    Some(padded)
}

/// Expected read-back for every corpus value under `case`
pub fn expected_output(case: &TestCase, corpus: &InputCorpus) -> Vec<Option<String>> {
    let max_length = i64::from(case.max_length);
    corpus
        .iter()
        .map(|value| match case.kind {
            StringKind::Char => compute_padded(value, max_length, case.trim),
            StringKind::Varchar => enforce_max_length(value, max_length),
        })
        .collect()
}
