//! Row state machine.
//!
//! Items join the current row left to right. [`LayoutState::down_one_line`]
//! closes the row: items are aligned on a common bottom (or centre), their
//! hit-testing rectangles are set to the full row band, and the cursor moves
//! to the first free x of the next row.

pub mod float;

use crate::geometry::Rect;
use crate::item::{Align, Item};

pub use float::{FloatContext, FloatSide, PlacedFloat};

/// Cursor, row and float bookkeeping of one layout pass.
#[derive(Debug)]
pub struct LayoutState {
    max_width: i32,
    min_row_height: i32,
    align_bottom: bool,
    x: i32,
    y: i32,
    row_height: i32,
    row: Vec<usize>,
    items: Vec<Item>,
    floats: FloatContext,
}

impl LayoutState {
    /// Start at the document origin.
    #[must_use]
    pub const fn new(max_width: i32, min_row_height: i32, align_bottom: bool, float_gap: i32) -> Self {
        Self {
            max_width,
            min_row_height,
            align_bottom,
            x: 0,
            y: 0,
            row_height: min_row_height,
            row: Vec::new(),
            items: Vec::new(),
            floats: FloatContext::new(max_width, float_gap),
        }
    }

    /// Current x.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Top of the current row.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Height of the current row so far.
    #[must_use]
    pub const fn row_height(&self) -> i32 {
        self.row_height
    }

    /// Line width.
    #[must_use]
    pub const fn max_width(&self) -> i32 {
        self.max_width
    }

    /// Whether no in-flow item has joined the current row.
    #[must_use]
    pub fn row_is_empty(&self) -> bool {
        self.row.is_empty()
    }

    /// Items placed so far.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The floats placed so far.
    #[must_use]
    pub const fn floats(&self) -> &FloatContext {
        &self.floats
    }

    /// First free x of the current row.
    #[must_use]
    pub fn min_x(&self) -> i32 {
        self.floats.min_x(self.y, self.row_height)
    }

    /// End of the usable part of the current row.
    #[must_use]
    pub fn max_x(&self) -> i32 {
        self.floats.max_x(self.y, self.row_height)
    }

    /// Width left on the current row.
    #[must_use]
    pub fn remaining_width(&self) -> i32 {
        self.max_x() - self.x
    }

    /// Whether floats make the current row narrower than the line.
    #[must_use]
    pub fn narrowed_by_floats(&self) -> bool {
        self.floats.narrows(self.y, self.row_height)
    }

    /// Move the cursor horizontally.
    pub const fn set_x(&mut self, x: i32) {
        self.x = x;
    }

    /// Y at which a float spanning `[x, x + width)` may be placed.
    #[must_use]
    pub fn floating_y(&self, x: i32, width: i32) -> i32 {
        self.floats.lowest_y(x, width, self.y)
    }

    /// Append an item and return its index.
    pub fn add_item(&mut self, mut item: Item) -> usize {
        let index = self.items.len();
        if item.floating {
            item.holden_rect = item.rect;
            let side = match item.align {
                Align::Left | Align::Here => Some(FloatSide::Left),
                Align::Middle | Align::Right => Some(FloatSide::Right),
                Align::Back => None,
            };
            self.floats.add(side, item.rect);
            if side == Some(FloatSide::Left) && item.rect.overlaps_rows(self.y, self.row_height) {
                self.x = self.x.max(self.min_x());
            }
        } else {
            self.x += item.rect.w;
            self.row_height = self.row_height.max(item.rect.h);
            self.row.push(index);
        }
        self.items.push(item);
        index
    }

    /// Close the current row and start the next one.
    ///
    /// # Panics
    ///
    /// Panics if the row overflowed the line without an item that is itself
    /// too wide to fit, which means the builder lost track of the cursor.
    pub fn down_one_line(&mut self) {
        self.adjust_last_row();
        let overwide = self
            .row
            .iter()
            .any(|&i| self.items[i].rect.right() > self.max_width);
        assert!(
            self.x <= self.max_width || overwide,
            "row ends at x={} past the line width {} without an over-wide item",
            self.x,
            self.max_width
        );
        self.row.clear();
        tracing::trace!(
            target: "integrate.layout",
            y = self.y,
            row_height = self.row_height,
            "row closed"
        );
        self.y += self.row_height;
        self.row_height = self.min_row_height;
        self.x = self.min_x();
    }

    fn adjust_last_row(&mut self) {
        for &i in &self.row {
            let item = &mut self.items[i];
            let gap = self.row_height - item.rect.h;
            item.rect.y += if self.align_bottom { gap } else { gap / 2 };
            item.holden_rect = Rect::new(item.rect.x, self.y, item.rect.w, self.row_height);
        }
    }

    /// Finish the pass and hand over the items.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}
