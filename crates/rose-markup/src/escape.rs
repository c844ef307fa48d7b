//! Backslash escaping for quoted attribute values.
//!
//! Inside a quoted `text` value the characters `\` and `"` must be written as
//! `\\` and `\"`. A decoded character therefore occupies one or two source
//! characters, and every offset translation between display text and source
//! goes through [`EscapedChars`].

use std::ops::Range;

/// The escape character.
pub const ESCAPE_CHAR: char = '\\';

/// The escape character as a byte, for byte-level scanners.
pub const ESCAPE_BYTE: u8 = b'\\';

/// Characters that must be escaped inside a quoted value.
pub const REQUIRE_ESCAPE: [char; 2] = ['\\', '"'];

/// Whether `ch` needs a backslash in front of it inside a quoted value.
#[must_use]
pub fn requires_escape(ch: char) -> bool {
    REQUIRE_ESCAPE.contains(&ch)
}

/// Escape `text` for use inside a quoted value.
///
/// When `quote_require_escape` is false the text is returned unchanged: plain
/// runs between tags are stored verbatim.
#[must_use]
pub fn stuff_escape(text: &str, quote_require_escape: bool) -> String {
    if !quote_require_escape {
        return text.to_owned();
    }
    let mut out = String::with_capacity(escaped_len(text));
    for ch in text.chars() {
        if requires_escape(ch) {
            out.push(ESCAPE_CHAR);
        }
        out.push(ch);
    }
    out
}

/// Remove escape backslashes, keeping the character each one protects.
///
/// A lone trailing backslash protects nothing and is dropped.
#[must_use]
pub fn drop_escape(text: &str, quote_require_escape: bool) -> String {
    if !quote_require_escape {
        return text.to_owned();
    }
    EscapedChars::new(text, true).map(|c| c.ch).collect()
}

/// Length in bytes of `text` once escaped.
#[must_use]
pub fn escaped_len(text: &str) -> usize {
    text.len() + text.chars().filter(|&c| requires_escape(c)).count()
}

/// One decoded character of a raw (possibly escaped) source slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapedChar {
    /// The decoded character.
    pub ch: char,
    /// Byte range in the raw slice, including a leading backslash.
    pub source: Range<usize>,
    /// Byte offset of the character in the decoded text.
    pub decoded: usize,
}

/// Iterator decoding a raw source slice character by character.
///
/// With `quote_require_escape` set, a backslash is consumed together with the
/// character after it. Without it every character stands for itself.
pub struct EscapedChars<'a> {
    raw: &'a str,
    pos: usize,
    decoded: usize,
    quote_require_escape: bool,
}

impl<'a> EscapedChars<'a> {
    /// Decode `raw` from its first byte.
    #[must_use]
    pub const fn new(raw: &'a str, quote_require_escape: bool) -> Self {
        Self {
            raw,
            pos: 0,
            decoded: 0,
            quote_require_escape,
        }
    }
}

impl Iterator for EscapedChars<'_> {
    type Item = EscapedChar;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.raw;
        let start = self.pos;
        let mut rest = raw.get(start..)?.chars();
        let mut ch = rest.next()?;
        let mut end = start + ch.len_utf8();
        if self.quote_require_escape && ch == ESCAPE_CHAR {
            match rest.next() {
                Some(escaped) => {
                    ch = escaped;
                    end += escaped.len_utf8();
                }
                None => {
                    self.pos = end;
                    return None;
                }
            }
        }
        self.pos = end;
        let decoded = self.decoded;
        self.decoded += ch.len_utf8();
        Some(EscapedChar {
            ch,
            source: start..end,
            decoded,
        })
    }
}

/// Number of raw bytes that encode the first `decoded_len` decoded bytes.
///
/// Returns `None` when `decoded_len` does not fall on a character boundary of
/// the decoded text or runs past its end.
#[must_use]
pub fn source_len_of_decoded(
    raw: &str,
    decoded_len: usize,
    quote_require_escape: bool,
) -> Option<usize> {
    if decoded_len == 0 {
        return Some(0);
    }
    for c in EscapedChars::new(raw, quote_require_escape) {
        let end = c.decoded + c.ch.len_utf8();
        if end == decoded_len {
            return Some(c.source.end);
        }
        if end > decoded_len {
            return None;
        }
    }
    None
}

/// Number of decoded bytes produced by the first `source_len` raw bytes.
///
/// A character only counts when all of its raw bytes (backslash included) lie
/// within `source_len`.
#[must_use]
pub fn decoded_len_of_source(raw: &str, source_len: usize, quote_require_escape: bool) -> usize {
    EscapedChars::new(raw, quote_require_escape)
        .take_while(|c| c.source.end <= source_len)
        .last()
        .map_or(0, |c| c.decoded + c.ch.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stuff_escape_quotes_and_backslashes() {
        assert_eq!(stuff_escape(r#"a"b\c"#, true), r#"a\"b\\c"#);
        assert_eq!(stuff_escape(r#"a"b"#, false), r#"a"b"#);
    }

    #[test]
    fn test_drop_escape_keeps_protected_char() {
        assert_eq!(drop_escape(r#"a\"b\\c\x"#, true), r#"a"b\cx"#);
        assert_eq!(drop_escape("tail\\", true), "tail");
    }

    #[test]
    fn test_escaped_chars_ranges() {
        let chars: Vec<_> = EscapedChars::new(r#"\"é"#, true).collect();
        assert_eq!(chars[0].ch, '"');
        assert_eq!(chars[0].source, 0..2);
        assert_eq!(chars[1].source, 2..4);
        assert_eq!(chars[1].decoded, 1);
    }

    #[test]
    fn test_source_len_of_decoded() {
        let raw = r#"a\"b"#;
        assert_eq!(source_len_of_decoded(raw, 0, true), Some(0));
        assert_eq!(source_len_of_decoded(raw, 2, true), Some(3));
        assert_eq!(source_len_of_decoded(raw, 3, true), Some(4));
        assert_eq!(source_len_of_decoded(raw, 4, true), None);
        assert_eq!(source_len_of_decoded("中", 1, false), None);
    }

    #[test]
    fn test_decoded_len_of_source_floors_inside_escape() {
        let raw = r#"a\"b"#;
        assert_eq!(decoded_len_of_source(raw, 2, true), 1);
        assert_eq!(decoded_len_of_source(raw, 3, true), 2);
    }
}
