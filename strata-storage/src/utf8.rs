//! Byte-level UTF-8 helpers: the writer truncates to the declared length, the
//! reader pads CHAR values back out.
//!
//! These work on raw column bytes and count codepoints by lead bytes, so they never
//! need to decode a full string and never cut inside a multi-byte sequence.

const SPACE: u8 = b' ';

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Number of codepoints in `bytes`
pub fn codepoint_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| !is_continuation(b)).count()
}

/// Longest prefix of `bytes` holding at most `max` codepoints
pub fn truncate_to_codepoints(bytes: &[u8], max: usize) -> &[u8] {
    let mut seen = 0;
    for (idx, &b) in bytes.iter().enumerate() {
        if !is_continuation(b) {
            if seen == max {
                return &bytes[..idx];
            }
            seen += 1;
        }
    }
    bytes
}

/// Copy of `bytes` right-padded with spaces up to `len` codepoints
pub fn pad_to_codepoints(bytes: &[u8], len: usize) -> Vec<u8> {
    let count = codepoint_count(bytes);
    let pad = len.saturating_sub(count);
    let mut out = Vec::with_capacity(bytes.len() + pad);
    out.extend_from_slice(bytes);
    out.resize(bytes.len() + pad, SPACE);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codepoint_count() {
        assert_eq!(codepoint_count(b""), 0);
        assert_eq!(codepoint_count("abc".as_bytes()), 3);
        assert_eq!(codepoint_count("αβγ".as_bytes()), 3);
        assert_eq!(codepoint_count("എന്താ".as_bytes()), 5);
        assert_eq!(codepoint_count("🌻🐝🍯".as_bytes()), 3);
        assert_eq!(codepoint_count("✏️📝✏️".as_bytes()), 5);
    }

    #[test]
    fn test_truncate_never_splits() {
        assert_eq!(truncate_to_codepoints("αβγδ".as_bytes(), 3), "αβγ".as_bytes());
        assert_eq!(truncate_to_codepoints("🌻🐝🍯".as_bytes(), 2), "🌻🐝".as_bytes());
        assert_eq!(truncate_to_codepoints("🌻🐝🍯".as_bytes(), 0), b"");
        assert_eq!(truncate_to_codepoints("αβ".as_bytes(), 5), "αβ".as_bytes());
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad_to_codepoints("αβ".as_bytes(), 4), "αβ  ".as_bytes());
        assert_eq!(pad_to_codepoints("🌻".as_bytes(), 1), "🌻".as_bytes());
        assert_eq!(pad_to_codepoints("αβγ".as_bytes(), 2), "αβγ".as_bytes());
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn truncation_is_valid_utf8_prefix(s in "\\PC{0,12}", max in 0usize..8) {
                let cut = truncate_to_codepoints(s.as_bytes(), max);
                let text = std::str::from_utf8(cut).unwrap();
                prop_assert!(s.starts_with(text));
                prop_assert_eq!(text.chars().count(), s.chars().count().min(max));
            }

            #[test]
            fn padding_reaches_length(s in "\\PC{0,6}", len in 0usize..10) {
                let padded = pad_to_codepoints(s.as_bytes(), len);
                prop_assert_eq!(codepoint_count(&padded), s.chars().count().max(len));
            }
        }
    }
}
