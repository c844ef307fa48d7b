//! Drawing commands produced from a laid-out document.

use std::sync::Arc;

use rose_common::image::LoadedImage;
use rose_markup::Color;

use crate::geometry::Rect;
use crate::metrics::TextStyle;

/// A single drawing command, in document coordinates.
#[derive(Debug, Clone)]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid colour. Used for underlines.
    FillRect {
        /// Area to fill.
        rect: Rect,
        /// Fill colour.
        color: Color,
    },
    /// Draw an outline inside `rect`.
    StrokeRect {
        /// Outer edge of the outline.
        rect: Rect,
        /// Line width in pixels.
        width: i32,
        /// Line colour.
        color: Color,
    },
    /// Draw one run of text on a single line.
    DrawText {
        /// Left edge.
        x: i32,
        /// Top of the line box.
        y: i32,
        /// The text.
        text: String,
        /// Font size in pixels.
        font_size: u32,
        /// Face flags.
        style: TextStyle,
        /// Text colour.
        color: Color,
    },
    /// Blit a bitmap scaled to `rect`.
    DrawImage {
        /// Destination.
        rect: Rect,
        /// Decoded bitmap.
        image: Arc<LoadedImage>,
    },
}

/// A list of drawing commands in painting order.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Get the commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
