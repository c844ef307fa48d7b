//! Image loading pipeline: read, detect format, and decode.
//!
//! 1. **Read**: [`FileImageSource`] resolves markup paths against a root
//!    directory and caches every outcome, misses included.
//! 2. **Detect**: [`detect_format()`] tells SVG from raster by extension
//!    and magic bytes.
//! 3. **Decode**: the [`ImageDecoder`] trait with [`SvgDecoder`] and
//!    [`RasterDecoder`] implementations.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use rose_common::image::LoadedImage;
use rose_integrate::ImageSource;

use crate::error::RenderError;

/// Detected image format.
///
/// The `image` crate tells raster sub-formats (PNG/JPEG/GIF/WebP/…) apart by
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// SVG vector image (decoded via usvg + resvg).
    Svg,
    /// Raster image (decoded via the `image` crate).
    Raster,
}

/// Detect whether `bytes` hold an SVG or a raster image.
///
/// A `.svg` extension wins; otherwise the first 256 bytes after leading
/// whitespace are sniffed for `<?xml` or `<svg`.
#[must_use]
pub fn detect_format(path: &str, bytes: &[u8]) -> ImageFormat {
    if Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    {
        return ImageFormat::Svg;
    }

    let trimmed = bytes
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take(256)
        .copied()
        .collect::<Vec<u8>>();
    if trimmed.starts_with(b"<?xml") || trimmed.starts_with(b"<svg") {
        return ImageFormat::Svg;
    }

    ImageFormat::Raster
}

/// A decoder that can turn raw bytes into a [`LoadedImage`].
pub trait ImageDecoder: Send + Sync {
    /// Human-readable name (for diagnostics).
    fn name(&self) -> &'static str;

    /// Whether this decoder handles the given format.
    fn supports(&self, format: ImageFormat) -> bool;

    /// Decode `bytes` into RGBA pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be decoded by this decoder.
    fn decode(&self, bytes: &[u8]) -> Result<LoadedImage, RenderError>;
}

/// Decodes SVG images via usvg → resvg rasterisation.
pub struct SvgDecoder;

impl ImageDecoder for SvgDecoder {
    fn name(&self) -> &'static str {
        "SVG (resvg)"
    }

    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Svg
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn decode(&self, bytes: &[u8]) -> Result<LoadedImage, RenderError> {
        let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())?;

        let size = tree.size();
        let (w, h) = (size.width().ceil() as u32, size.height().ceil() as u32);
        if w == 0 || h == 0 {
            return Err(RenderError::EmptySvg);
        }

        let mut pixmap = tiny_skia::Pixmap::new(w, h).ok_or(RenderError::Pixmap(w, h))?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha.
        let mut data = pixmap.take();
        for px in data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a > 0 && a < 255 {
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        Ok(LoadedImage::new(w, h, data))
    }
}

/// Decodes raster images (PNG, JPEG, GIF, WebP, …) via the `image` crate.
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn name(&self) -> &'static str {
        "Raster (image crate)"
    }

    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Raster
    }

    fn decode(&self, bytes: &[u8]) -> Result<LoadedImage, RenderError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (w, h) = rgba.dimensions();
        Ok(LoadedImage::new(w, h, rgba.into_raw()))
    }
}

/// Detects the format and dispatches to the matching decoder.
pub struct ImageLoaderPipeline {
    decoders: Vec<Box<dyn ImageDecoder>>,
}

impl ImageLoaderPipeline {
    /// Create a pipeline with the default decoders (SVG + raster).
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: vec![Box::new(SvgDecoder), Box::new(RasterDecoder)],
        }
    }

    /// Decode `bytes` read from `path`.
    ///
    /// # Errors
    ///
    /// Returns the decoder's error; raster decoding reports unsupported
    /// formats itself.
    pub fn decode(&self, bytes: &[u8], path: &str) -> Result<LoadedImage, RenderError> {
        let format = detect_format(path, bytes);
        let decoder = self
            .decoders
            .iter()
            .find(|decoder| decoder.supports(format))
            .unwrap_or(&self.decoders[self.decoders.len() - 1]);
        tracing::trace!(target: "render.image", path, decoder = decoder.name(), "decoding");
        decoder.decode(bytes)
    }
}

impl Default for ImageLoaderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Image lookup on the file system.
///
/// Markup paths are resolved against a root directory. Every lookup outcome
/// is cached, so a missing `@2x` variant costs one failed read per process.
pub struct FileImageSource {
    root: PathBuf,
    pipeline: ImageLoaderPipeline,
    cache: Mutex<HashMap<String, Option<Arc<LoadedImage>>>>,
}

impl FileImageSource {
    /// Resolve image paths against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pipeline: ImageLoaderPipeline::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Read and decode `path` without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(&self, path: &str) -> Result<LoadedImage, RenderError> {
        let file = self.root.join(path);
        let bytes = std::fs::read(&file).map_err(|source| RenderError::Io { path: file, source })?;
        self.pipeline.decode(&bytes, path)
    }

    /// Number of cached lookups.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl ImageSource for FileImageSource {
    fn get_image(&self, path: &str) -> Option<Arc<LoadedImage>> {
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
        {
            return hit.clone();
        }

        let image = match self.load(path) {
            Ok(image) => {
                tracing::debug!(
                    target: "render.image",
                    path,
                    width = image.width(),
                    height = image.height(),
                    "image decoded"
                );
                Some(Arc::new(image))
            }
            Err(error) => {
                // The engine warns once the final candidate misses.
                tracing::debug!(target: "render.image", path, %error, "image lookup failed");
                None
            }
        };
        let _ = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_owned(), image.clone());
        image
    }
}
