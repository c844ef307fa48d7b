//! Errors raised while loading fonts and decoding images.

use std::path::PathBuf;

use thiserror::Error;

/// A font or image could not be turned into pixels.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Reading a file failed.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// The file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No regular font was found on any search path.
    #[error("no usable font found ({searched} paths searched)")]
    NoFont {
        /// Number of paths tried.
        searched: usize,
    },

    /// The font file could not be parsed.
    #[error("failed to parse font: {0}")]
    Font(&'static str),

    /// The SVG document could not be parsed.
    #[error("failed to parse SVG: {0}")]
    Svg(#[from] usvg::Error),

    /// The SVG document has no area.
    #[error("SVG has zero-size dimensions")]
    EmptySvg,

    /// A pixmap of the requested size could not be allocated.
    #[error("failed to allocate a {0}x{1} pixmap")]
    Pixmap(u32, u32),

    /// The raster image could not be decoded.
    #[error("could not decode image: {0}")]
    Raster(#[from] image::ImageError),
}
