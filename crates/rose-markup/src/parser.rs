//! Splitting markup source into segments.
//!
//! The scanner walks the source byte by byte. Every byte it reacts to (`<`,
//! `>`, `"`, `\`, `/`) is ASCII, so byte offsets it produces always fall on
//! UTF-8 character boundaries.
//!
//! A tag is recognised only if all of the following hold:
//! 1. `<` is followed by a recognised name and then `>`, a space or a line feed;
//! 2. the opening tag's `>` is found outside of quotes;
//! 3. `</name>` is found after it, outside of quotes;
//! 4. exactly one of (opening tag, body) carries a valid attribute list.
//!
//! Anything else is literal text.

use crate::attributes::parse_attributes;
use crate::escape::ESCAPE_BYTE;
use crate::segment::{Segment, Tag, TagKind, TextSpan};

/// Scanner state while looking at a possible tag opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any tag.
    Text,
    /// Reading a tag name that began at the `<` at this offset.
    TagName(usize),
}

const fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Split `src` into text runs and recognised tags, in source order.
///
/// Adjacent literal text (including rejected tags) is merged into a single
/// [`Segment::Text`]. The concatenation of all segment ranges covers `src`
/// exactly.
#[must_use]
pub fn split_segments(src: &str) -> Vec<Segment<'_>> {
    let bytes = src.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        // STEP 1: read the tag name. A '<' inside the name restarts the scan.
        let mut state = ScanState::Text;
        let mut j = i;
        let lt = loop {
            match state {
                ScanState::Text => {
                    state = ScanState::TagName(j);
                    j += 1;
                }
                ScanState::TagName(lt) => {
                    while j < bytes.len() && is_name_byte(bytes[j]) {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j] == b'<' {
                        state = ScanState::Text;
                        continue;
                    }
                    break lt;
                }
            }
        };

        let name = &src[lt + 1..j];
        let terminated = bytes
            .get(j)
            .is_some_and(|&b| b == b'>' || b == b' ' || b == b'\n');
        let Some(kind) = TagKind::from_name(name).filter(|_| terminated) else {
            i = lt + 1;
            continue;
        };

        // STEP 2: the rest of the tag.
        if let Some(tag) = parse_tag(src, lt, kind, j) {
            if lt > text_start {
                segments.push(Segment::Text(TextSpan {
                    start: text_start,
                    text: &src[text_start..lt],
                }));
            }
            tracing::trace!(target: "markup.parse", tag = %kind, start = tag.start, end = tag.end, "tag");
            i = tag.end;
            text_start = tag.end;
            segments.push(Segment::from_tag(kind, tag));
        } else {
            tracing::trace!(target: "markup.parse", tag = %kind, start = lt, "malformed tag kept as text");
            i = lt + 1;
        }
    }

    if text_start < bytes.len() {
        segments.push(Segment::Text(TextSpan {
            start: text_start,
            text: &src[text_start..],
        }));
    }
    segments
}

/// Parse the tag whose `<` is at `lt` and whose name ends at `name_end`.
fn parse_tag(src: &str, lt: usize, kind: TagKind, name_end: usize) -> Option<Tag> {
    let gt = find_unquoted(src, name_end, b">")?;
    let open_attrs = if gt == name_end {
        ""
    } else {
        // Skip the single separator after the name.
        &src[name_end + 1..gt]
    };

    let body_start = gt + 1;
    let closing = format!("</{}>", kind.name());
    let close_at = find_unquoted(src, body_start, closing.as_bytes())?;
    let body = &src[body_start..close_at];

    let attributes = match (open_attrs.is_empty(), body.is_empty()) {
        (false, true) => parse_attributes(open_attrs, name_end + 1)?,
        (true, false) => parse_attributes(body, body_start)?,
        _ => return None,
    };

    Some(Tag {
        start: lt,
        end: close_at + closing.len(),
        attributes,
    })
}

/// Offset of the first occurrence of `needle` at or after `from` that is not
/// inside a double-quoted string.
fn find_unquoted(src: &str, from: usize, needle: &[u8]) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut in_quote = false;
    let mut escaped = false;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        if escaped {
            escaped = false;
        } else if b == ESCAPE_BYTE {
            escaped = true;
        } else if b == b'"' {
            in_quote = !in_quote;
        } else if !in_quote && bytes[i..].starts_with(needle) {
            return Some(i);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_unquoted_skips_quoted_gt() {
        assert_eq!(find_unquoted(r#"a=">" b>"#, 0, b">"), Some(7));
        assert_eq!(find_unquoted(r#"a="\">" >"#, 0, b">"), Some(8));
    }
}
