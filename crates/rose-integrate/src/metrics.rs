//! Text measurement collaborator.
//!
//! Layout never touches fonts directly. It asks a [`TextMetrics`]
//! implementation for widths and line heights and, through the provided
//! [`TextMetrics::split_to_width`], for line breaks.

use serde::Serialize;

use crate::geometry::Size;
use crate::linebreak;

/// Face variations a text item can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TextStyle {
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
    /// Underlined (hyperlinks).
    pub underline: bool,
}

impl TextStyle {
    /// Style with every flag off.
    pub const PLAIN: Self = Self {
        bold: false,
        italic: false,
        underline: false,
    };
}

/// Measures text for layout.
///
/// Implementations are shared between engines and threads, hence the
/// `Send + Sync` bound; caching is up to the implementation.
pub trait TextMetrics: Send + Sync {
    /// Size of `text` rendered on one line.
    fn measure(&self, text: &str, font_size: u32, style: TextStyle) -> Size;

    /// Height of one line of text at `font_size`.
    fn line_height(&self, font_size: u32) -> i32;

    /// Width of `text` rendered on one line.
    fn text_width(&self, text: &str, font_size: u32, style: TextStyle) -> i32 {
        self.measure(text, font_size, style).w
    }

    /// Split `text` into consecutive chunks that each fit `max_width`.
    ///
    /// The chunks concatenate back to `text` exactly. A chunk wider than
    /// `max_width` only occurs when a single grapheme does not fit.
    fn split_to_width<'t>(
        &self,
        text: &'t str,
        font_size: u32,
        style: TextStyle,
        max_width: i32,
    ) -> Vec<&'t str> {
        linebreak::split_to_width(self, text, font_size, style, max_width)
    }
}

/// Fixed-advance metrics that need no font files.
///
/// Every character advances `round(0.6 * font_size)` pixels, wide East Asian
/// characters advance `font_size`, control characters advance nothing, and a
/// line is `round(1.2 * font_size)` high. Deterministic results make it the
/// metrics of choice for tests and headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMetrics;

impl ApproximateMetrics {
    /// Horizontal advance of one character.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn advance(ch: char, font_size: u32) -> i32 {
        let size = font_size as i32;
        if ch.is_control() {
            0
        } else if linebreak::is_cjk_char(ch) {
            size
        } else {
            (size * 6 + 5) / 10
        }
    }
}

impl TextMetrics for ApproximateMetrics {
    #[allow(clippy::cast_possible_wrap)]
    fn measure(&self, text: &str, font_size: u32, _style: TextStyle) -> Size {
        let w = text.chars().map(|ch| Self::advance(ch, font_size)).sum();
        Size::new(w, self.line_height(font_size))
    }

    #[allow(clippy::cast_possible_wrap)]
    fn line_height(&self, font_size: u32) -> i32 {
        (font_size as i32 * 12 + 5) / 10
    }
}
