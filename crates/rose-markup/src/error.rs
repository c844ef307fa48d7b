//! Error types for the markup layer.
//!
//! Malformed markup is never an error: it degrades to literal text. Only
//! byte-level decoding and explicit colour parsing report failures.

use thiserror::Error;

/// A byte sequence that is not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// A lead byte followed by bytes that do not form a code point.
    #[error("invalid UTF-8 sequence of {len} byte(s) at offset {offset}")]
    InvalidSequence {
        /// Byte offset of the first invalid byte.
        offset: usize,
        /// Number of bytes skipped.
        len: usize,
    },
    /// The input ended in the middle of a multi-byte sequence.
    #[error("truncated UTF-8 sequence at offset {offset}")]
    Truncated {
        /// Byte offset of the incomplete sequence.
        offset: usize,
    },
}

impl EncodingError {
    /// Byte offset where the problem starts.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::InvalidSequence { offset, .. } | Self::Truncated { offset } => *offset,
        }
    }
}

/// A colour string that is neither `a,r,g,b` nor a known colour name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed colour '{0}'")]
pub struct ColorError(pub String);
