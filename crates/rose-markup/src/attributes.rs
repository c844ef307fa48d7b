//! The attribute-list grammar shared by every tag.
//!
//! ```text
//! list  := entry (SEP entry)*        SEP is one space or line feed
//! entry := key '=' value
//! key   := [A-Za-z0-9_]+
//! value := '"' (char | '\' char)* '"' | (char - '"' - SEP)*
//! ```
//!
//! Parsing is all-or-nothing: any violation rejects the whole list so the
//! caller can fall back to showing the span as literal text.

use std::ops::Range;

use crate::escape::{ESCAPE_BYTE, drop_escape};

/// One `key=value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub key: String,
    /// Value with escapes removed.
    pub value: String,
    /// Byte range of the raw value in the markup source (inside the
    /// quotes for quoted values).
    pub span: Range<usize>,
}

/// Parsed attribute list of one tag, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<Attribute>,
}

impl Attributes {
    /// Build a list from already parsed entries.
    #[must_use]
    pub const fn from_entries(entries: Vec<Attribute>) -> Self {
        Self { entries }
    }

    /// Entry for `key`. A repeated key resolves to its last occurrence.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.entries.iter().rev().find(|a| a.key == key)
    }

    /// Decoded value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attribute(key).map(|a| a.value.as_str())
    }

    /// Decoded value of `key`, or the empty string.
    #[must_use]
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    /// Source range of the raw value of `key`.
    #[must_use]
    pub fn span(&self, key: &str) -> Option<Range<usize>> {
        self.attribute(key).map(|a| a.span.clone())
    }

    /// Boolean value of `key`: `yes`/`true`/`on`/`1` or `no`/`false`/`off`/`0`.
    ///
    /// Missing or unrecognised values yield `default`.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(str::trim) {
            Some(v)
                if v.eq_ignore_ascii_case("yes")
                    || v.eq_ignore_ascii_case("true")
                    || v.eq_ignore_ascii_case("on")
                    || v == "1" =>
            {
                true
            }
            Some(v)
                if v.eq_ignore_ascii_case("no")
                    || v.eq_ignore_ascii_case("false")
                    || v.eq_ignore_ascii_case("off")
                    || v == "0" =>
            {
                false
            }
            _ => default,
        }
    }

    /// Integer value of `key`, if present and numeric.
    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter()
    }
}

const fn is_separator(b: u8) -> bool {
    b == b' ' || b == b'\n'
}

const fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Parse an attribute list.
///
/// `base` is the byte offset of `text` in the enclosing source, so the value
/// spans recorded in the result index the source directly.
///
/// Returns `None` when the list is empty or malformed.
#[must_use]
pub fn parse_attributes(text: &str, base: usize) -> Option<Attributes> {
    let bytes = text.as_bytes();
    let (&first, &last) = (bytes.first()?, bytes.last()?);
    if is_separator(first) || is_separator(last) {
        return None;
    }

    // STEP 1: split into entries at separators outside quotes.
    let mut entries = Vec::new();
    let mut entry_start = 0;
    let mut in_quote = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        if b == ESCAPE_BYTE {
            escaped = true;
        } else if b == b'"' {
            in_quote = !in_quote;
        } else if is_separator(b) && !in_quote {
            entries.push(entry_start..i);
            entry_start = i + 1;
        }
    }
    if in_quote {
        return None;
    }
    entries.push(entry_start..bytes.len());

    // STEP 2: each entry must be key=value.
    let mut parsed = Vec::with_capacity(entries.len());
    for range in entries {
        parsed.push(parse_entry(text, range, base)?);
    }
    Some(Attributes::from_entries(parsed))
}

fn parse_entry(text: &str, range: Range<usize>, base: usize) -> Option<Attribute> {
    let entry = &text[range.clone()];
    let eq = entry.find('=')?;
    let key = &entry[..eq];
    if key.is_empty() || !key.bytes().all(is_key_byte) {
        return None;
    }

    let raw = &entry[eq + 1..];
    let value_start = range.start + eq + 1;
    let (inner, span) = if let Some(quoted) = raw.strip_prefix('"') {
        let inner = quoted.strip_suffix('"')?;
        if !closes_only_at_end(quoted) {
            return None;
        }
        (inner, base + value_start + 1..base + value_start + 1 + inner.len())
    } else {
        if raw.contains('"') {
            return None;
        }
        (raw, base + value_start..base + value_start + raw.len())
    };

    Some(Attribute {
        key: key.to_owned(),
        value: drop_escape(inner, true),
        span,
    })
}

/// Whether the first unescaped quote in `quoted` is its final byte.
fn closes_only_at_end(quoted: &str) -> bool {
    let mut escaped = false;
    for (i, b) in quoted.bytes().enumerate() {
        if escaped {
            escaped = false;
        } else if b == ESCAPE_BYTE {
            escaped = true;
        } else if b == b'"' {
            return i + 1 == quoted.len();
        }
    }
    false
}
