//! Pixel output for the rose rich-text engine.
//!
//! The engine treats fonts, bitmaps and animation playback as collaborators.
//! This crate provides file-system and software implementations of them and
//! rasterises the engine's display list:
//!
//! - [`FontdueMetrics`] measures text with fontdue fonts from a [`FontSet`]
//! - [`FileImageSource`] decodes raster (`image`) and SVG (`usvg`/`resvg`)
//!   files on demand and caches them
//! - [`AnimationRegistry`] plays registered frame sequences
//! - [`Renderer`] executes a [`DisplayList`](rose_integrate::DisplayList) onto
//!   an RGBA canvas
//!
//! [`get_surface`] ties them together for a whole document.

pub mod animation;
pub mod error;
pub mod font_metrics;
pub mod image_loader;
pub mod renderer;

use std::sync::Arc;

use image::RgbaImage;
use rose_integrate::Integrate;
use rose_markup::Color;

pub use animation::AnimationRegistry;
pub use error::RenderError;
pub use font_metrics::{FontSet, FontdueMetrics};
pub use image_loader::{FileImageSource, ImageFormat, ImageLoaderPipeline, detect_format};
pub use renderer::Renderer;

/// Paint `engine` onto a canvas of its laid-out size.
///
/// Animations are started (see [`Integrate::display_list`]) but not drawn;
/// hosts draw them in separate passes.
#[must_use]
pub fn get_surface(
    engine: &mut Integrate,
    fonts: Option<Arc<FontSet>>,
    background: Color,
) -> RgbaImage {
    let size = engine.get_size();
    let width = u32::try_from(size.w).unwrap_or(0);
    let height = u32::try_from(size.h).unwrap_or(0);
    let mut renderer = Renderer::new(width, height, background, fonts);
    renderer.render(&engine.display_list());
    tracing::debug!(target: "render", width, height, "surface painted");
    renderer.into_image()
}
