//! Decoded image data shared between the image source, layout and the
//! rasteriser.

use std::fmt;

/// Decoded image data for an `<img>` item.
///
/// Contains the decoded RGBA pixel data and display dimensions. Layout only
/// reads the dimensions; the rasteriser samples the pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct LoadedImage {
    /// Width of the image in pixels.
    width: u32,
    /// Height of the image in pixels.
    height: u32,
    /// Raw RGBA pixel data (width * height * 4 bytes).
    rgba_data: Vec<u8>,
}

impl LoadedImage {
    /// Create a new `LoadedImage` from decoded RGBA pixel data.
    ///
    /// # Arguments
    ///
    /// * `width` - Width of the image in pixels
    /// * `height` - Height of the image in pixels
    /// * `rgba_data` - Raw RGBA pixel data (must be `width * height * 4` bytes)
    #[must_use]
    pub const fn new(width: u32, height: u32, rgba_data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_data,
        }
    }

    /// Create an image filled with a single RGBA colour.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        Self::new(width, height, rgba.repeat(pixels))
    }

    /// Width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// RGBA value of the pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = self.rgba_data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

impl fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba_data.len())
            .finish()
    }
}
