//! Hit testing and in-place editing of the markup source.
//!
//! Every mutating operation returns the complete new source together with
//! the cursor rectangle computed on a fresh layout of it. The engine itself
//! is never modified; the caller replaces it (or calls
//! [`Integrate::set_source`]) when it accepts the edit.

pub mod caret;
pub mod selection;

use std::ops::Range;

use rose_markup::{drop_markup, stuff_escape};
use serde::Serialize;

use crate::engine::Integrate;
use crate::geometry::Rect;
use crate::item::Content;

pub use caret::Caret;
pub use selection::{SelectionAction, SelectionOutcome};

use caret::Unit;

/// The item under a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemLocation {
    /// Item index.
    pub index: usize,
    /// The item's hit-testing rectangle.
    pub rect: Rect,
    /// Layout generation the index belongs to.
    pub generation: u64,
}

/// Outcome of an edit: the whole new source and where the cursor goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditResult {
    /// The complete new markup source.
    pub source: String,
    /// Cursor rectangle in the layout of `source`.
    pub cursor: Rect,
}

impl EditResult {
    /// A result that leaves the source alone.
    #[must_use]
    pub const fn unchanged(source: String, cursor: Rect) -> Self {
        Self { source, cursor }
    }
}

impl Integrate {
    /// Map a point to the item that owns it.
    ///
    /// Floating items are matched by their own rectangle. Otherwise the scan
    /// follows document order: a row item containing the point wins, a point
    /// left of a row's items belongs to the first of them, and a point above
    /// a row belongs to the last item of the row before. A point below the
    /// last row yields the last item only with `fail_to_back`.
    #[must_use]
    pub fn location_from_pixel(&self, x: i32, y: i32, fail_to_back: bool) -> Option<ItemLocation> {
        if self.items.is_empty() || x < 0 || y < 0 {
            return None;
        }
        let found = |index: usize| ItemLocation {
            index,
            rect: self.items[index].holden_rect,
            generation: self.generation,
        };

        if let Some(index) = self
            .items
            .iter()
            .position(|item| item.floating && item.rect.contains(x, y))
        {
            return Some(found(index));
        }

        let mut previous = None;
        for (index, item) in self.items.iter().enumerate() {
            if item.floating {
                continue;
            }
            let row = item.holden_rect;
            if row.contains(x, y) || (row.overlaps_rows(y, 1) && x < row.x) {
                return Some(found(index));
            }
            if y < row.y {
                return Some(found(previous.unwrap_or(index)));
            }
            previous = Some(index);
        }

        let last = previous.unwrap_or(self.items.len() - 1);
        let on_last_row = self.items[last].holden_rect.overlaps_rows(y, 1);
        (fail_to_back || on_last_row).then(|| found(last))
    }

    /// Cursor rectangle nearest to a point. Zero when not editable.
    #[must_use]
    pub fn editable_at(&self, x: i32, y: i32) -> Rect {
        if !self.config.editable || x < 0 || y < 0 {
            return Rect::default();
        }
        self.caret_from_pixel(x, y)
            .map_or_else(Rect::default, |caret| self.caret_rect(caret))
    }

    /// Cursor rectangle at a text-space offset: `item.pos` plus a count of
    /// decoded characters into the item.
    #[must_use]
    pub fn editable_at2(&self, text_pos: usize) -> Rect {
        if !self.config.editable || self.items.is_empty() {
            return Rect::default();
        }
        let index = self
            .items
            .partition_point(|item| item.pos <= text_pos)
            .saturating_sub(1);
        let item = &self.items[index];
        let dx = if text_pos <= item.pos {
            0
        } else if !item.text_type() {
            item.rect.w
        } else {
            let end = item
                .text
                .char_indices()
                .nth(text_pos - item.pos)
                .map_or(item.text.len(), |(i, _)| i);
            self.env
                .metrics
                .text_width(&item.text[..end], item.font_size, item.style)
        };
        let row = item.holden_rect;
        Rect::new(row.x + dx, row.y, 0, row.h)
    }

    /// Cursor rectangle for a source offset.
    #[must_use]
    pub fn calculate_cursor(&self, src_pos: usize) -> Rect {
        if self.items.is_empty() {
            return Rect::default();
        }
        self.caret_rect(self.caret_at_source(src_pos))
    }

    /// Source offset of the caret nearest to a point.
    #[must_use]
    pub fn calculate_src_pos(&self, x: i32, y: i32) -> usize {
        self.caret_from_pixel(x, y)
            .map_or(0, |caret| self.caret_source_pos(caret))
    }

    /// Row band under a point, with `x` moved to the point (or to the end
    /// of the row when the point is past it).
    #[must_use]
    pub fn holden_rect(&self, x: i32, y: i32) -> Rect {
        let mut last: Option<Rect> = None;
        for item in self.items.iter().filter(|item| !item.floating) {
            let row = item.holden_rect;
            if row.contains(x, y) {
                return Rect { x, ..row };
            }
            if let Some(prev) = last.filter(|prev| row.y != prev.y && y < row.y) {
                return Rect { x: prev.right(), ..prev };
            }
            last = Some(row);
        }
        last.map_or_else(Rect::default, |row| Rect { x: row.right(), ..row })
    }

    /// Hyperlink destination under a point.
    #[must_use]
    pub fn ref_at(&self, x: i32, y: i32) -> Option<&str> {
        if x < 0 || y < 0 {
            return None;
        }
        self.items
            .iter()
            .find(|item| item.rect.w > 0 && item.rect.contains(x, y))
            .and_then(|item| item.ref_to.as_deref())
    }

    /// Cursor rectangle one row up or down from a cursor position.
    /// `None` when there is no such row.
    #[must_use]
    pub fn key_arrow(&self, x: i32, y: i32, up: bool) -> Option<Rect> {
        let location = self.location_from_pixel(x, y, true)?;
        let current = self.items[location.index].holden_rect;
        let flow = || self.items.iter().filter(|item| !item.floating);
        let target = if up {
            flow()
                .rev()
                .find(|item| item.holden_rect.bottom() <= current.y)
        } else {
            flow().find(|item| item.holden_rect.y >= current.bottom())
        }?;
        Some(self.editable_at(x, target.holden_rect.y))
    }

    /// Whether a cursor position is at or past the end of the document.
    #[must_use]
    pub fn at_end(&self, x: i32, y: i32) -> bool {
        if !self.config.editable {
            return true;
        }
        self.items.last().is_none_or(|item| {
            let row = item.holden_rect;
            x >= row.right() && y >= row.y
        })
    }

    /// Decoded text in front of the caret nearest to a point.
    #[must_use]
    pub fn before_str(&self, x: i32, y: i32) -> String {
        let mut out = String::new();
        if !self.config.editable || x < 0 || y < 0 {
            return out;
        }
        let Some(caret) = self.caret_from_pixel(x, y) else {
            return out;
        };
        for item in self.items[..caret.item].iter().filter(|item| item.text_type()) {
            if item.is_line_feed() {
                out.push('\n');
            } else {
                out.push_str(&item.text);
            }
        }
        let item = &self.items[caret.item];
        if item.text_type() && matches!(item.content, Content::Text) {
            out.push_str(&item.text[..caret.offset]);
        }
        out
    }

    /// Source offset of a text-space offset.
    fn source_of_text_pos(&self, text_pos: usize) -> usize {
        if text_pos == 0 {
            return 0;
        }
        let count = self.items.partition_point(|item| item.pos <= text_pos);
        assert!(count > 0, "text offset {text_pos} lies before the first item");
        let item = &self.items[count - 1];
        let decoded = text_pos - item.pos;
        if !item.text_type() {
            return if decoded == 0 {
                item.markup_pos
            } else {
                item.markup_end
            };
        }
        match item.content {
            Content::Text => {
                assert!(
                    decoded <= item.text.len(),
                    "text offset {text_pos} runs past the item at byte {}",
                    item.pos
                );
                item.pos + self.source_len_in_item(item, decoded)
            }
            _ if decoded == 0 => item.pos,
            _ => item.pos + item.src_size,
        }
    }

    /// Source substring between two text-space offsets.
    ///
    /// A text-space offset is an item's `pos` plus a decoded offset into it.
    /// Escaped characters count once there and twice in the source. With
    /// `to == None` the substring runs to the end of the source.
    ///
    /// # Panics
    ///
    /// Panics if an offset does not land on a character of any item or the
    /// offsets are out of order.
    #[must_use]
    pub fn substr_from_src(&self, from: usize, to: Option<usize>) -> String {
        let start = self.source_of_text_pos(from);
        let end = to.map_or(self.src.len(), |to| self.source_of_text_pos(to));
        assert!(
            start <= end && end <= self.src.len(),
            "text range {from}..{to:?} maps to invalid source range {start}..{end}"
        );
        self.src[start..end].to_owned()
    }

    /// Move the cursor by one unit, or delete one unit, at a point.
    ///
    /// With `del` unset the cursor moves left (`backspace`) or right. With
    /// `del` set the unit before (`backspace`) or after the cursor is
    /// removed; a tag whose last character goes is removed with it.
    #[must_use]
    pub fn handle_char(&self, del: bool, x: i32, y: i32, backspace: bool) -> EditResult {
        if !self.config.editable || self.items.is_empty() || x < 0 || y < 0 {
            return EditResult::unchanged(self.src.clone(), Rect::default());
        }
        if del && self.src == "\n" {
            // The lone line feed collapses the document.
            return EditResult::unchanged(String::new(), Rect::default());
        }
        let Some(caret) = self.caret_from_pixel(x, y) else {
            return EditResult::unchanged(self.src.clone(), Rect::default());
        };
        let units = self.units();
        let boundary = self.boundary_of(caret, &units);

        if !del {
            let next = if backspace {
                boundary.saturating_sub(1)
            } else {
                (boundary + 1).min(units.len())
            };
            let cursor = self.caret_rect(self.caret_at_boundary(next, &units));
            return EditResult::unchanged(self.src.clone(), cursor);
        }

        let target = if backspace {
            boundary.checked_sub(1)
        } else {
            (boundary < units.len()).then_some(boundary)
        };
        match target {
            Some(index) => self.remove_units(&units, index..index + 1),
            None => EditResult::unchanged(self.src.clone(), self.caret_rect(caret)),
        }
    }

    /// Insert `text` at the caret nearest to a point.
    ///
    /// Inside a quoted `text` value the inserted text is reduced to plain
    /// text and escaped, so pasted markup cannot open a nested tag. A bare
    /// `text=` value is wrapped in quotes as it grows. Next to an image,
    /// animation or atomic tag the text goes in verbatim between tags.
    #[must_use]
    pub fn insert_str(&self, x: i32, y: i32, text: &str) -> EditResult {
        let text = text.replace('\r', "");
        if !self.config.editable || text.is_empty() || x < 0 || y < 0 {
            return EditResult::unchanged(self.src.clone(), Rect::new(x.max(0), y.max(0), 0, 0));
        }
        if self.src.is_empty() || self.items.is_empty() {
            let source = format!("{}{text}", self.src);
            let cursor = self.derive(&source).calculate_cursor(source.len());
            return EditResult { source, cursor };
        }
        let Some(caret) = self.caret_from_pixel(x, y) else {
            return EditResult::unchanged(self.src.clone(), Rect::default());
        };
        let item = &self.items[caret.item];
        let pos = self.caret_source_pos(caret);
        let quoted_value = item.text_type() && item.quote_require_escape;
        let inserted = if quoted_value {
            stuff_escape(&drop_markup(&text), true)
        } else {
            text
        };

        // A bare value cannot hold spaces or quotes; it gains quotes first.
        let bare = item.value_span.clone().filter(|span| {
            quoted_value && self.is_bare_value(span) && (span.start..=span.end).contains(&pos)
        });
        let requoted = bare.is_some();
        let mut source = String::with_capacity(self.src.len() + inserted.len() + 2);
        let cursor_pos = match bare {
            Some(span) => {
                source.push_str(&self.src[..span.start]);
                source.push('"');
                source.push_str(&self.src[span.start..pos]);
                source.push_str(&inserted);
                source.push_str(&self.src[pos..span.end]);
                source.push('"');
                source.push_str(&self.src[span.end..]);
                pos + 1 + inserted.len()
            }
            None => {
                source.push_str(&self.src[..pos]);
                source.push_str(&inserted);
                source.push_str(&self.src[pos..]);
                pos + inserted.len()
            }
        };
        tracing::debug!(
            target: "integrate.edit",
            pos,
            inserted = inserted.len(),
            requoted,
            "insert"
        );
        let cursor = self.derive(&source).calculate_cursor(cursor_pos);
        EditResult { source, cursor }
    }

    /// Whether the attribute value at `span` is written without quotes.
    fn is_bare_value(&self, span: &Range<usize>) -> bool {
        span.start == 0 || self.src.as_bytes()[span.start - 1] != b'"'
    }

    /// Remove `units[range]` from the source. A tag loses its wrapper too
    /// when all of its units are removed.
    pub(crate) fn remove_units(&self, units: &[Unit], range: Range<usize>) -> EditResult {
        let mut cuts: Vec<Range<usize>> = units[range.clone()]
            .iter()
            .map(|unit| unit.source.clone())
            .collect();
        for unit in &units[range.clone()] {
            let Some(tag) = unit.tag.as_ref().filter(|_| !unit.atomic) else {
                continue;
            };
            let emptied = units
                .iter()
                .enumerate()
                .filter(|(_, other)| other.tag.as_ref() == Some(tag))
                .all(|(k, _)| range.contains(&k));
            if emptied && !cuts.contains(tag) {
                cuts.push(tag.clone());
            }
        }
        cuts.sort_by_key(|cut| cut.start);

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(cuts.len());
        for cut in cuts {
            match merged.last_mut() {
                Some(last) if cut.start <= last.end => last.end = last.end.max(cut.end),
                _ => merged.push(cut),
            }
        }

        let mut source = String::with_capacity(self.src.len());
        let mut kept_from = 0;
        for cut in &merged {
            source.push_str(&self.src[kept_from..cut.start]);
            kept_from = cut.end;
        }
        source.push_str(&self.src[kept_from..]);

        let first = merged.first().map_or(0, |cut| cut.start);
        tracing::debug!(
            target: "integrate.edit",
            from = first,
            removed = self.src.len() - source.len(),
            "delete"
        );
        let cursor = self.derive(&source).calculate_cursor(first);
        EditResult { source, cursor }
    }
}
