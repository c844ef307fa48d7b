//! Integer pixel geometry.
//!
//! Layout works in whole pixels so that a cursor rectangle produced by the
//! engine maps back to the exact same caret when it is fed in as a point.

use serde::Serialize;

/// An axis-aligned rectangle. `w` and `h` may be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// x coordinate one past the right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// y coordinate one past the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Whether the point lies inside. Empty rectangles contain nothing.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether the two rectangles share at least one pixel.
    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether the vertical band `[y, y + h)` overlaps this rectangle.
    #[must_use]
    pub const fn overlaps_rows(&self, y: i32, h: i32) -> bool {
        self.y < y + h && self.bottom() > y
    }

    /// The rectangle moved by `(dx, dy)`.
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// A pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A pixel extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Size {
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// Round `value` up to a multiple of `align` (`align >= 1`).
#[must_use]
pub const fn align_ceil(value: i32, align: i32) -> i32 {
    if align <= 1 {
        return value;
    }
    (value + align - 1).div_euclid(align) * align
}

/// Round `value` down to a multiple of `align` (`align >= 1`).
#[must_use]
pub const fn align_floor(value: i32, align: i32) -> i32 {
    if align <= 1 {
        return value;
    }
    value.div_euclid(align) * align
}
