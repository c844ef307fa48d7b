//! The engine: a source string and the items laid out from it.

use std::collections::BTreeMap;

use rose_common::warning::warn_once;
use rose_markup::Color;
use rose_markup::utf8::decode_lossy;

use crate::builder::RunBuilder;
use crate::config::IntegrateConfig;
use crate::error::IntegrateError;
use crate::geometry::{Point, Size, align_ceil, align_floor};
use crate::item::Item;
use crate::resources::{AnimationHandle, Environment};

/// A laid-out markup document.
///
/// The source string is the single source of truth. Items are derived from
/// it and rebuilt from scratch whenever the source or a layout constraint
/// changes; editing operations never mutate an engine but return the new
/// source for the caller to build the next one from.
pub struct Integrate {
    pub(crate) src: String,
    pub(crate) config: IntegrateConfig,
    pub(crate) env: Environment,
    pub(crate) items: Vec<Item>,
    pub(crate) min_row_height: i32,
    pub(crate) generation: u64,
    pub(crate) layout_offset: Point,
    /// Animations started by painting, keyed by item index.
    pub(crate) anims: BTreeMap<usize, AnimationHandle>,
}

impl Integrate {
    /// Parse and lay out `src`.
    ///
    /// # Errors
    ///
    /// Returns an error when `config` fails [`IntegrateConfig::validate`].
    pub fn new(src: &str, config: IntegrateConfig, env: Environment) -> Result<Self, IntegrateError> {
        config.validate()?;
        Ok(Self::with_generation(src, config, env, 0))
    }

    /// Lay out a source given as raw bytes.
    ///
    /// A read-only document skips undecodable bytes and lays out the rest. An
    /// editable document must round-trip its source exactly, so it rejects
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrateError::Encoding`] for invalid UTF-8 in an editable
    /// document, and the errors of [`Integrate::new`].
    pub fn from_bytes(
        bytes: &[u8],
        config: IntegrateConfig,
        env: Environment,
    ) -> Result<Self, IntegrateError> {
        let (src, errors) = decode_lossy(bytes);
        if let Some(first) = errors.first() {
            if config.editable {
                return Err(IntegrateError::Encoding(first.clone()));
            }
            warn_once(
                "integrate",
                &format!("skipped {} undecodable byte sequence(s): {first}", errors.len()),
            );
        }
        Self::new(&src, config, env)
    }

    /// Build a sibling engine for an edited source.
    pub(crate) fn derive(&self, src: &str) -> Self {
        Self::with_generation(src, self.config.clone(), self.env.clone(), self.generation + 1)
    }

    fn with_generation(src: &str, mut config: IntegrateConfig, env: Environment, generation: u64) -> Self {
        config.max_width = align_floor(config.max_width, config.hdpi_scale);
        let min_row_height = env.metrics.line_height(config.font_size).max(1);
        let src = if config.editable {
            src.replace('\r', "")
        } else {
            src.to_owned()
        };
        let mut engine = Self {
            src,
            config,
            env,
            items: Vec::new(),
            min_row_height,
            generation,
            layout_offset: Point::default(),
            anims: BTreeMap::new(),
        };
        engine.layout();
        engine
    }

    fn layout(&mut self) {
        self.release_animations();
        self.items = RunBuilder::new(&self.src, &self.config, &self.env, self.min_row_height).build();
        tracing::debug!(
            target: "integrate.layout",
            generation = self.generation,
            items = self.items.len(),
            "document laid out"
        );
    }

    fn relayout(&mut self) {
        self.generation += 1;
        self.layout();
    }

    /// The markup source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.src
    }

    /// The configuration in effect, with `max_width` aligned.
    #[must_use]
    pub const fn config(&self) -> &IntegrateConfig {
        &self.config
    }

    /// The collaborators.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.env
    }

    /// Items in document order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Whether editing operations are enabled.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        self.config.editable
    }

    /// Line width in pixels.
    #[must_use]
    pub const fn max_width(&self) -> i32 {
        self.config.max_width
    }

    /// Line height of the default font, the height of an empty row.
    #[must_use]
    pub const fn min_row_height(&self) -> i32 {
        self.min_row_height
    }

    /// Incremented on every relayout. Locations carry it so stale ones can
    /// be told apart.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Where the document is drawn on screen.
    #[must_use]
    pub const fn layout_offset(&self) -> Point {
        self.layout_offset
    }

    /// Bounding box of every item, rounded up to the density multiple.
    #[must_use]
    pub fn get_size(&self) -> Size {
        let (w, h) = self.items.iter().fold((0, 0), |(w, h), item| {
            (w.max(item.rect.right()), h.max(item.rect.bottom()))
        });
        let scale = self.config.hdpi_scale;
        Size::new(align_ceil(w, scale), align_ceil(h, scale))
    }

    /// Replace the source and lay it out again.
    pub fn set_source(&mut self, src: &str) {
        self.src = if self.config.editable {
            src.replace('\r', "")
        } else {
            src.to_owned()
        };
        self.relayout();
    }

    /// Change the line width and lay out again.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrateError::InvalidWidth`] when `max_width` is not
    /// positive or narrower than the density multiple.
    pub fn set_max_width(&mut self, max_width: i32) -> Result<(), IntegrateError> {
        let mut config = self.config.clone();
        config.max_width = max_width;
        config.validate()?;
        self.config.max_width = align_floor(max_width, config.hdpi_scale);
        self.relayout();
        Ok(())
    }

    /// Change the colour of text without an explicit colour.
    pub fn set_default_font_color(&mut self, color: Color) {
        if self.config.font_color != color {
            self.config.font_color = color;
            self.relayout();
        }
    }

    /// Move the document on screen. Affects only animation passes.
    pub const fn set_layout_offset(&mut self, offset: Point) {
        self.layout_offset = offset;
    }

    /// Drop the source and every item.
    pub fn clear(&mut self) {
        self.release_animations();
        self.src.clear();
        self.items.clear();
        self.generation += 1;
    }

    pub(crate) fn release_animations(&mut self) {
        if self.anims.is_empty() {
            return;
        }
        let anims = std::mem::take(&mut self.anims);
        if let Some(host) = &self.env.animations {
            for handle in anims.into_values() {
                host.release_animation(handle);
            }
        }
    }
}

impl Drop for Integrate {
    fn drop(&mut self) {
        self.release_animations();
    }
}

impl std::fmt::Debug for Integrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Integrate")
            .field("src", &self.src)
            .field("items", &self.items.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_width_is_aligned_to_density() {
        let config = IntegrateConfig::new(101, 14).with_hdpi_scale(2);
        let engine = Integrate::new("x", config, Environment::default()).unwrap();
        assert_eq!(engine.max_width(), 100);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = IntegrateConfig::new(0, 14);
        assert_eq!(
            Integrate::new("x", config, Environment::default()).unwrap_err(),
            IntegrateError::InvalidWidth(0)
        );
    }

    #[test]
    fn test_from_bytes_policies() {
        let bytes = b"ab\xffcd";
        let engine = Integrate::from_bytes(bytes, IntegrateConfig::default(), Environment::default())
            .unwrap();
        assert_eq!(engine.source(), "abcd");

        let editable = IntegrateConfig::default().with_editable(true);
        assert!(matches!(
            Integrate::from_bytes(bytes, editable, Environment::default()),
            Err(IntegrateError::Encoding(_))
        ));
    }
}
