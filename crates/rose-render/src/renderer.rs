//! Software renderer.
//!
//! Executes a [`DisplayList`] to an RGBA buffer using fontdue for text
//! rasterisation.
//!
//! ```text
//! Markup → Items → Paint → Render
//!                    ↓        ↓
//!              DisplayList → Pixels
//! ```
//!
//! The renderer knows nothing about markup or layout. It only executes
//! drawing commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use image::{ImageBuffer, Rgba, RgbaImage};
use rose_common::image::LoadedImage;
use rose_integrate::{DisplayCommand, DisplayList, Rect, TextStyle};
use rose_markup::Color;

use crate::font_metrics::FontSet;

/// Software renderer that executes a display list to a pixel buffer.
pub struct Renderer {
    buffer: RgbaImage,
    /// Without fonts, text commands draw nothing.
    fonts: Option<Arc<FontSet>>,
}

impl Renderer {
    /// Create a `width` x `height` canvas filled with `background`.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Color, fonts: Option<Arc<FontSet>>) -> Self {
        let buffer = ImageBuffer::from_pixel(width, height, Rgba(background.to_rgba()));
        if fonts.is_none() {
            tracing::debug!(target: "render", "no fonts; text will not be drawn");
        }
        Self { buffer, fonts }
    }

    /// Execute a display list, drawing all commands in order.
    pub fn render(&mut self, display_list: &DisplayList) {
        for command in display_list.commands() {
            self.execute_command(command);
        }
    }

    fn execute_command(&mut self, command: &DisplayCommand) {
        match command {
            DisplayCommand::FillRect { rect, color } => self.fill_rect(*rect, *color),
            DisplayCommand::StrokeRect { rect, width, color } => {
                self.stroke_rect(*rect, *width, *color);
            }
            DisplayCommand::DrawText {
                x,
                y,
                text,
                font_size,
                style,
                color,
            } => self.draw_text(text, *x, *y, *font_size, *style, *color),
            DisplayCommand::DrawImage { rect, image } => self.draw_image(image, *rect),
        }
    }

    /// Fill `rect`, blending by the colour's alpha.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rgba = color.to_rgba();
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.blend_pixel(x, y, rgba, 255);
            }
        }
    }

    /// Outline `rect` with lines `width` pixels thick, drawn inside it.
    pub fn stroke_rect(&mut self, rect: Rect, width: i32, color: Color) {
        let width = width.min(rect.w / 2).min(rect.h / 2).max(0);
        let inner_h = rect.h - 2 * width;
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, width), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - width, rect.w, width), color);
        self.fill_rect(Rect::new(rect.x, rect.y + width, width, inner_h), color);
        self.fill_rect(
            Rect::new(rect.right() - width, rect.y + width, width, inner_h),
            color,
        );
    }

    /// Draw an image scaled to `rect`.
    ///
    /// Uses nearest-neighbour sampling and alpha-blends onto the buffer.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn draw_image(&mut self, image: &LoadedImage, rect: Rect) {
        let (src_w, src_h) = image.dimensions();
        if src_w == 0 || src_h == 0 || rect.w <= 0 || rect.h <= 0 {
            return;
        }
        let (dest_w, dest_h) = (rect.w as u64, rect.h as u64);
        let data = image.rgba_data();

        for dy in 0..rect.h {
            for dx in 0..rect.w {
                let sx = ((dx as u64 * u64::from(src_w)) / dest_w).min(u64::from(src_w) - 1);
                let sy = ((dy as u64 * u64::from(src_h)) / dest_h).min(u64::from(src_h) - 1);
                let idx = ((sy * u64::from(src_w) + sx) * 4) as usize;
                let Some(px) = data.get(idx..idx + 4) else {
                    continue;
                };
                self.blend_pixel(rect.x + dx, rect.y + dy, [px[0], px[1], px[2], px[3]], 255);
            }
        }
    }

    /// Draw one line of text with its line box top at `y`.
    #[allow(
        clippy::too_many_arguments,
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap
    )]
    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font_size: u32,
        style: TextStyle,
        color: Color,
    ) {
        let Some(fonts) = self.fonts.clone() else {
            return;
        };
        let font = fonts.select(style);
        let px = font_size as f32;
        let ascent = font.horizontal_line_metrics(px).map_or(px, |m| m.ascent);
        let baseline = y + ascent.round() as i32;
        let rgba = color.to_rgba();
        let mut cursor_x = x as f32;

        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            let (metrics, bitmap) = font.rasterize(ch, px);
            let glyph_x = cursor_x as i32 + metrics.xmin;
            let glyph_y = baseline - metrics.ymin - metrics.height as i32;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage > 0 {
                        self.blend_pixel(glyph_x + gx as i32, glyph_y + gy as i32, rgba, coverage);
                    }
                }
            }
            cursor_x += metrics.advance_width;
        }
    }

    #[allow(clippy::cast_sign_loss)]
    fn blend_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4], coverage: u8) {
        if x < 0 || y < 0 || x as u32 >= self.buffer.width() || y as u32 >= self.buffer.height() {
            return;
        }
        let alpha = u8::try_from(u16::from(rgba[3]) * u16::from(coverage) / 255).unwrap_or(255);
        if alpha == 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let fg = Rgba(rgba);
        if alpha == 255 {
            self.buffer.put_pixel(x, y, fg);
        } else {
            let bg = *self.buffer.get_pixel(x, y);
            self.buffer.put_pixel(x, y, alpha_blend(fg, bg, alpha));
        }
    }

    /// The rendered pixels.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Take the rendered pixels.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }

    /// Save the rendered image to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be saved to the given path.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer
            .save(path)
            .map_err(|e| anyhow::anyhow!("failed to save image to '{}': {e}", path.display()))
    }
}

/// Composite `fg` at opacity `alpha` over `bg` (source-over).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let bg_a = f32::from(bg[3]) / 255.0 * (1.0 - a);
    let out_a = a + bg_a;
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        (f32::from(fg[i]).mul_add(a, f32::from(bg[i]) * bg_a) / out_a).round() as u8
    };
    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
}
