//! Floating images.
//!
//! A floating image is taken out of the line flow. Rows that overlap a left
//! float start to its right; rows that overlap a right (or centred) float end
//! at its left edge.

use serde::Serialize;

use crate::geometry::Rect;

/// Which edge of the line a float narrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FloatSide {
    /// Raises the row's minimum x.
    Left,
    /// Lowers the row's maximum x.
    Right,
}

/// A single float that has been placed.
#[derive(Debug, Clone)]
pub struct PlacedFloat {
    /// Which side this float narrows.
    pub side: FloatSide,
    /// Document rectangle of the float.
    pub rect: Rect,
}

/// Tracks placed floats while a document is laid out.
#[derive(Debug, Clone, Default)]
pub struct FloatContext {
    /// Floats that push rows to the right.
    pub left_floats: Vec<PlacedFloat>,
    /// Floats that cut rows short.
    pub right_floats: Vec<PlacedFloat>,
    /// Floats stacked on a previous item; they narrow nothing.
    pub overlays: Vec<Rect>,
    /// Width of the line.
    pub containing_width: i32,
    /// Space kept between a float and the row.
    pub gap: i32,
}

impl FloatContext {
    /// Create a context for lines of `containing_width` pixels.
    #[must_use]
    pub const fn new(containing_width: i32, gap: i32) -> Self {
        Self {
            left_floats: Vec::new(),
            right_floats: Vec::new(),
            overlays: Vec::new(),
            containing_width,
            gap,
        }
    }

    fn all_rects(&self) -> impl Iterator<Item = &Rect> {
        self.left_floats
            .iter()
            .chain(&self.right_floats)
            .map(|f| &f.rect)
            .chain(&self.overlays)
    }

    /// Record a float. `None` places an overlay.
    pub fn add(&mut self, side: Option<FloatSide>, rect: Rect) {
        match side {
            Some(side @ FloatSide::Left) => self.left_floats.push(PlacedFloat { side, rect }),
            Some(side @ FloatSide::Right) => self.right_floats.push(PlacedFloat { side, rect }),
            None => self.overlays.push(rect),
        }
    }

    /// First free x of a row spanning `[y, y + h)`, never past the line.
    #[must_use]
    pub fn min_x(&self, y: i32, h: i32) -> i32 {
        self.left_floats
            .iter()
            .filter(|f| f.rect.overlaps_rows(y, h))
            .map(|f| f.rect.right() + self.gap)
            .fold(0, i32::max)
            .min(self.containing_width)
    }

    /// End of the usable part of a row spanning `[y, y + h)`.
    #[must_use]
    pub fn max_x(&self, y: i32, h: i32) -> i32 {
        self.right_floats
            .iter()
            .filter(|f| f.rect.overlaps_rows(y, h))
            .map(|f| f.rect.x - self.gap)
            .fold(self.containing_width, i32::min)
    }

    /// Whether any flow-narrowing float overlaps the row `[y, y + h)`.
    #[must_use]
    pub fn narrows(&self, y: i32, h: i32) -> bool {
        self.left_floats
            .iter()
            .chain(&self.right_floats)
            .any(|f| f.rect.overlaps_rows(y, h))
    }

    /// Lowest y at or below `desired_y` where a float spanning
    /// `[x, x + width)` sits below every float it overlaps horizontally.
    #[must_use]
    pub fn lowest_y(&self, x: i32, width: i32, desired_y: i32) -> i32 {
        self.all_rects()
            .filter(|r| r.right() > x && r.x < x + width)
            .map(Rect::bottom)
            .fold(desired_y, i32::max)
    }
}
