//! Fonts and fontdue-backed text measurement.
//!
//! A [`FontSet`] holds a regular face and, when found, bold, italic and
//! bold-italic variants. [`FontdueMetrics`] measures with the same per-glyph
//! advances the [`Renderer`](crate::Renderer) uses to place glyphs, so laid
//! out rectangles and drawn text agree.

use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use rose_integrate::{Size, TextMetrics, TextStyle};

use crate::error::RenderError;

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\msyh.ttc",
];

const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/Library/Fonts/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/Library/Fonts/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// A regular face plus optional style variants.
pub struct FontSet {
    regular: Font,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
}

impl FontSet {
    /// Use `regular` for every style.
    #[must_use]
    pub const fn new(regular: Font) -> Self {
        Self {
            regular,
            bold: None,
            italic: None,
            bold_italic: None,
        }
    }

    /// Parse a font file's contents.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Font`] if the bytes are not a font.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, RenderError> {
        Font::from_bytes(data, FontSettings::default())
            .map(Self::new)
            .map_err(RenderError::Font)
    }

    /// Load a font file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let data = std::fs::read(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data)
    }

    /// Search the usual system locations for a regular face and its variants.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoFont`] if no regular face is found.
    pub fn load_system() -> Result<Self, RenderError> {
        let regular = load_font_from_paths(FONT_SEARCH_PATHS, "regular").ok_or(
            RenderError::NoFont {
                searched: FONT_SEARCH_PATHS.len(),
            },
        )?;
        Ok(Self {
            regular,
            bold: load_font_from_paths(FONT_BOLD_SEARCH_PATHS, "bold"),
            italic: load_font_from_paths(FONT_ITALIC_SEARCH_PATHS, "italic"),
            bold_italic: load_font_from_paths(FONT_BOLD_ITALIC_SEARCH_PATHS, "bold-italic"),
        })
    }

    /// The best available face for `style`, falling back through
    /// exact match, partial match and regular.
    #[must_use]
    pub fn select(&self, style: TextStyle) -> &Font {
        let variant = match (style.bold, style.italic) {
            (true, true) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.italic.as_ref()),
            (true, false) => self.bold.as_ref(),
            (false, true) => self.italic.as_ref(),
            (false, false) => None,
        };
        variant.unwrap_or(&self.regular)
    }
}

fn load_font_from_paths(paths: &[&str], label: &str) -> Option<Font> {
    for path in paths {
        if let Ok(data) = std::fs::read(path)
            && let Ok(font) = Font::from_bytes(data, FontSettings::default())
        {
            tracing::debug!(target: "render.font", path, label, "font loaded");
            return Some(font);
        }
    }
    None
}

/// Line height for `font_size`: 1.2 times the size, rounded.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn line_height(font_size: u32) -> i32 {
    (font_size as i32 * 12 + 5) / 10
}

/// [`TextMetrics`] backed by fontdue's per-glyph metrics.
///
/// Uses `Font::metrics()` rather than `Font::rasterize()`, so measuring
/// never generates bitmaps.
#[derive(Clone)]
pub struct FontdueMetrics {
    fonts: Arc<FontSet>,
}

impl FontdueMetrics {
    /// Measure with `fonts`.
    #[must_use]
    pub const fn new(fonts: Arc<FontSet>) -> Self {
        Self { fonts }
    }

    /// The fonts being measured.
    #[must_use]
    pub const fn fonts(&self) -> &Arc<FontSet> {
        &self.fonts
    }
}

impl TextMetrics for FontdueMetrics {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn measure(&self, text: &str, font_size: u32, style: TextStyle) -> Size {
        let font = self.fonts.select(style);
        let px = font_size as f32;
        // Same cursor advancement as Renderer::draw_text.
        let width: f32 = text
            .chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| font.metrics(ch, px).advance_width)
            .sum();
        Size::new(width.ceil() as i32, self.line_height(font_size))
    }

    fn line_height(&self, font_size: u32) -> i32 {
        line_height(font_size)
    }
}
