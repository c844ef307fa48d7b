//! Errors reported when an engine is constructed.
//!
//! Everything that can go wrong while laying out markup degrades gracefully,
//! so the only recoverable errors concern the inputs themselves.

use rose_markup::EncodingError;
use thiserror::Error;

/// Rejected construction input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrateError {
    /// `max_width` was zero or negative.
    #[error("maximum width must be positive, got {0}")]
    InvalidWidth(i32),
    /// `font_size` was zero.
    #[error("default font size must be positive")]
    InvalidFontSize,
    /// `hdpi_scale` was below 1.
    #[error("pixel density scale must be at least 1, got {0}")]
    InvalidScale(i32),
    /// `screen_ratio` was not a finite positive number.
    #[error("screen ratio must be a finite positive number")]
    InvalidScreenRatio,
    /// An editable document was given bytes that are not UTF-8.
    #[error("editable source is not valid UTF-8: {0}")]
    Encoding(#[from] EncodingError),
}
