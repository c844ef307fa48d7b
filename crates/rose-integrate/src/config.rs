//! Layout constraints and presentation defaults for one engine instance.
//!
//! Hosts usually build an [`IntegrateConfig`] in code, but the type also
//! deserialises from a configuration file (every field has a default):
//!
//! ```toml
//! max_width = 320
//! font_size = 16
//! font_color = "255,40,40,40"
//! editable = true
//! ```

use rose_markup::Color;
use serde::{Deserialize, Serialize};

use crate::error::IntegrateError;

/// Construction parameters of an [`Integrate`](crate::Integrate) engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrateConfig {
    /// Maximum line width in pixels. Floored to a multiple of `hdpi_scale`.
    pub max_width: i32,
    /// Default font size for text without an explicit `font_size`.
    pub font_size: u32,
    /// Default text colour.
    pub font_color: Color,
    /// Enables cursor placement and source editing.
    pub editable: bool,
    /// Treat every tag as one indivisible editing unit.
    pub atom_markup: bool,
    /// Align row items on a common bottom (otherwise centre them).
    pub align_bottom: bool,
    /// Device pixel density multiple. Sizes are aligned to it.
    pub hdpi_scale: i32,
    /// Screen density ratio; images are scaled down adaptively above 1.
    pub screen_ratio: f64,
    /// Horizontal space kept between a floating image and flowing text.
    pub float_gap: i32,
    /// Colour of resolvable hyperlinks.
    pub link_color: Color,
    /// Colour of hyperlinks whose destination does not resolve.
    pub broken_link_color: Color,
    /// Colours addressable by numeric index in `<format color="N">`.
    pub palette: Vec<Color>,
}

impl Default for IntegrateConfig {
    fn default() -> Self {
        Self {
            max_width: 400,
            font_size: 14,
            font_color: Color::BLACK,
            editable: false,
            atom_markup: false,
            align_bottom: true,
            hdpi_scale: 1,
            screen_ratio: 1.0,
            float_gap: 0,
            link_color: Color::LINK,
            broken_link_color: Color::BROKEN_LINK,
            palette: Vec::new(),
        }
    }
}

impl IntegrateConfig {
    /// Default configuration with the given width and font size.
    #[must_use]
    pub fn new(max_width: i32, font_size: u32) -> Self {
        Self {
            max_width,
            font_size,
            ..Self::default()
        }
    }

    /// Set [`editable`](Self::editable).
    #[must_use]
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Set [`atom_markup`](Self::atom_markup).
    #[must_use]
    pub fn with_atom_markup(mut self, atom_markup: bool) -> Self {
        self.atom_markup = atom_markup;
        self
    }

    /// Set [`font_color`](Self::font_color).
    #[must_use]
    pub fn with_font_color(mut self, color: Color) -> Self {
        self.font_color = color;
        self
    }

    /// Set [`hdpi_scale`](Self::hdpi_scale).
    #[must_use]
    pub fn with_hdpi_scale(mut self, scale: i32) -> Self {
        self.hdpi_scale = scale;
        self
    }

    /// Set [`screen_ratio`](Self::screen_ratio).
    #[must_use]
    pub fn with_screen_ratio(mut self, ratio: f64) -> Self {
        self.screen_ratio = ratio;
        self
    }

    /// Check the constraints an engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first constraint that is violated.
    pub fn validate(&self) -> Result<(), IntegrateError> {
        if self.max_width <= 0 {
            return Err(IntegrateError::InvalidWidth(self.max_width));
        }
        if self.font_size == 0 {
            return Err(IntegrateError::InvalidFontSize);
        }
        if self.hdpi_scale < 1 {
            return Err(IntegrateError::InvalidScale(self.hdpi_scale));
        }
        if !self.screen_ratio.is_finite() || self.screen_ratio <= 0.0 {
            return Err(IntegrateError::InvalidScreenRatio);
        }
        if self.max_width < self.hdpi_scale {
            return Err(IntegrateError::InvalidWidth(self.max_width));
        }
        Ok(())
    }
}
