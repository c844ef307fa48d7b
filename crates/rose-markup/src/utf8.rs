//! UTF-8 decoding that reports bad input instead of unwinding.
//!
//! Markup usually arrives as `&str`, but hosts that read raw buffers can hand
//! over bytes. [`Utf8Chars`] yields one `Result` per code point so a caller can
//! skip an undecodable run and keep laying out the rest.

use crate::error::EncodingError;

/// One decoded code point and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedChar {
    /// The decoded character.
    pub ch: char,
    /// Byte offset of the first byte of the sequence.
    pub offset: usize,
    /// Length of the sequence in bytes (1..=4).
    pub len: usize,
}

/// Iterator over the code points of a byte slice.
///
/// Invalid sequences produce an `Err` and decoding resumes after the bytes
/// that could not be used.
pub struct Utf8Chars<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Utf8Chars<'a> {
    /// Start decoding `bytes` from the beginning.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

/// Expected sequence length for a lead byte, or `None` for a byte that
/// cannot start a sequence.
const fn sequence_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

impl Iterator for Utf8Chars<'_> {
    type Item = Result<DecodedChar, EncodingError>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.pos;
        let lead = *self.bytes.get(offset)?;

        let Some(len) = sequence_len(lead) else {
            self.pos += 1;
            return Some(Err(EncodingError::InvalidSequence { offset, len: 1 }));
        };

        let Some(chunk) = self.bytes.get(offset..offset + len) else {
            self.pos = self.bytes.len();
            return Some(Err(EncodingError::Truncated { offset }));
        };

        match std::str::from_utf8(chunk) {
            Ok(s) => {
                self.pos += len;
                s.chars()
                    .next()
                    .map(|ch| Ok(DecodedChar { ch, offset, len }))
            }
            Err(e) => {
                // Skip the lead byte plus any continuation bytes that were
                // valid, never fewer than one byte.
                let skip = e.error_len().unwrap_or(len).max(1);
                self.pos += skip;
                Some(Err(EncodingError::InvalidSequence { offset, len: skip }))
            }
        }
    }
}

/// Decode `bytes`, dropping every undecodable sequence.
///
/// Returns the decoded text and the errors that were skipped, in order.
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> (String, Vec<EncodingError>) {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return (s.to_owned(), Vec::new());
    }

    let mut text = String::with_capacity(bytes.len());
    let mut errors = Vec::new();
    for decoded in Utf8Chars::new(bytes) {
        match decoded {
            Ok(c) => text.push(c.ch),
            Err(e) => errors.push(e),
        }
    }
    (text, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_multibyte() {
        let chars: Vec<_> = Utf8Chars::new("a中".as_bytes()).collect();
        assert_eq!(chars.len(), 2);
        assert_eq!(
            chars[1],
            Ok(DecodedChar {
                ch: '中',
                offset: 1,
                len: 3
            })
        );
    }

    #[test]
    fn test_reports_invalid_lead_byte() {
        let chars: Vec<_> = Utf8Chars::new(&[b'a', 0xFF, b'b']).collect();
        assert_eq!(
            chars[1],
            Err(EncodingError::InvalidSequence { offset: 1, len: 1 })
        );
        assert!(matches!(chars[2], Ok(DecodedChar { ch: 'b', .. })));
    }

    #[test]
    fn test_reports_truncated_tail() {
        let chars: Vec<_> = Utf8Chars::new(&[b'a', 0xE4, 0xB8]).collect();
        assert_eq!(chars[1], Err(EncodingError::Truncated { offset: 1 }));
    }

    #[test]
    fn test_decode_lossy_keeps_valid_text() {
        let (text, errors) = decode_lossy(&[b'o', b'k', 0xC0, b'!']);
        assert_eq!(text, "ok!");
        assert_eq!(errors.len(), 1);
    }
}
