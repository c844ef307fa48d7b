//! Carets and editing units.
//!
//! A caret sits inside one item: at a decoded byte offset of a text run, or
//! before (0) / after (1) anything else. Editing works on *units*: one
//! decoded character, one line feed, or one atomic tag, each with the exact
//! source bytes it occupies. Two carets that fall between the same pair of
//! units are the same editing position.

use std::ops::Range;

use rose_markup::escape::{EscapedChars, decoded_len_of_source, source_len_of_decoded};

use crate::engine::Integrate;
use crate::geometry::Rect;
use crate::item::{Content, Item};

/// An insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caret {
    /// Item index.
    pub item: usize,
    /// Decoded byte offset into a text run; 0 or 1 for other items.
    pub offset: usize,
}

impl Caret {
    /// Create a caret.
    #[must_use]
    pub const fn new(item: usize, offset: usize) -> Self {
        Self { item, offset }
    }
}

/// The smallest piece of source that editing inserts around or removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Unit {
    /// Source bytes of the unit. For atomic units, the whole tag.
    pub source: Range<usize>,
    /// Caret just before the unit.
    pub caret: Caret,
    /// Enclosing tag of tag-derived units.
    pub tag: Option<Range<usize>>,
    /// Raw `text` value span of the enclosing tag.
    pub value: Option<Range<usize>>,
    pub atomic: bool,
}

impl Integrate {
    /// Raw source bytes of a text-type item.
    pub(crate) fn item_raw(&self, item: &Item) -> &str {
        &self.src[item.source_range()]
    }

    /// Source bytes encoding the first `decoded` bytes of a text item.
    ///
    /// # Panics
    ///
    /// Panics if `decoded` is not a character boundary of the item's text.
    pub(crate) fn source_len_in_item(&self, item: &Item, decoded: usize) -> usize {
        let raw = self.item_raw(item);
        match source_len_of_decoded(raw, decoded, item.quote_require_escape) {
            Some(len) => len,
            None => panic!(
                "decoded offset {decoded} is not a character boundary of the run at byte {}",
                item.pos
            ),
        }
    }

    /// Every editing unit, in source order.
    pub(crate) fn units(&self) -> Vec<Unit> {
        let mut units = Vec::new();
        let mut last_atomic_tag = None;
        for (i, item) in self.items.iter().enumerate() {
            let tag = item.from_tag().then(|| item.tag_span());
            if !item.text_type() {
                if last_atomic_tag == Some(item.markup_pos) {
                    continue;
                }
                last_atomic_tag = Some(item.markup_pos);
                units.push(Unit {
                    source: item.tag_span(),
                    caret: Caret::new(i, 0),
                    tag,
                    value: item.value_span.clone(),
                    atomic: true,
                });
                continue;
            }
            match item.content {
                Content::Spacer if item.src_size > 0 => units.push(Unit {
                    source: item.source_range(),
                    caret: Caret::new(i, 0),
                    tag,
                    value: item.value_span.clone(),
                    atomic: false,
                }),
                Content::Text => {
                    let raw = self.item_raw(item);
                    units.extend(EscapedChars::new(raw, item.quote_require_escape).map(|c| {
                        Unit {
                            source: item.pos + c.source.start..item.pos + c.source.end,
                            caret: Caret::new(i, c.decoded),
                            tag: tag.clone(),
                            value: item.value_span.clone(),
                            atomic: false,
                        }
                    }));
                }
                _ => {}
            }
        }
        units
    }

    /// Source offset of a caret.
    pub(crate) fn caret_source_pos(&self, caret: Caret) -> usize {
        let item = &self.items[caret.item];
        if !item.text_type() {
            return if caret.offset == 0 {
                item.markup_pos
            } else {
                item.markup_end
            };
        }
        match item.content {
            Content::Text => item.pos + self.source_len_in_item(item, caret.offset),
            _ => item.pos,
        }
    }

    /// Index of the first unit at or after the caret.
    pub(crate) fn boundary_of(&self, caret: Caret, units: &[Unit]) -> usize {
        let pos = self.caret_source_pos(caret);
        units.partition_point(|u| u.source.start < pos)
    }

    /// Caret in front of `units[boundary]`, or at the end of the document.
    pub(crate) fn caret_at_boundary(&self, boundary: usize, units: &[Unit]) -> Caret {
        if let Some(unit) = units.get(boundary) {
            return unit.caret;
        }
        let last = self.items.len().saturating_sub(1);
        match self.items.last() {
            Some(item) if !item.text_type() => Caret::new(last, 1),
            Some(item) if matches!(item.content, Content::Text) => Caret::new(last, item.text.len()),
            _ => Caret::new(last, 0),
        }
    }

    /// Cursor rectangle of a caret: zero width, full row height.
    ///
    /// # Panics
    ///
    /// Panics if the caret does not address a character boundary of an item.
    #[must_use]
    pub fn caret_rect(&self, caret: Caret) -> Rect {
        let item = &self.items[caret.item];
        let dx = if !item.text_type() {
            if caret.offset == 0 { 0 } else { item.rect.w }
        } else if matches!(item.content, Content::Text) {
            let Some(prefix) = item.text.get(..caret.offset) else {
                panic!("caret offset {} splits a character of '{}'", caret.offset, item.text);
            };
            self.env
                .metrics
                .text_width(prefix, item.font_size, item.style)
        } else {
            0
        };
        let row = item.holden_rect;
        Rect::new(row.x + dx, row.y, 0, row.h)
    }

    /// The caret nearest to a pixel.
    #[must_use]
    pub fn caret_from_pixel(&self, x: i32, y: i32) -> Option<Caret> {
        let location = self.location_from_pixel(x, y, true)?;
        let item = &self.items[location.index];
        let dx = x - item.rect.x;
        let offset = if !item.text_type() {
            usize::from(dx >= item.rect.w)
        } else {
            let mut offset = 0;
            for (i, ch) in item.text.char_indices() {
                let end = i + ch.len_utf8();
                let width = self
                    .env
                    .metrics
                    .text_width(&item.text[..end], item.font_size, item.style);
                if width > dx {
                    break;
                }
                offset = end;
            }
            offset
        };
        Some(Caret::new(location.index, offset))
    }

    /// The caret at a source offset.
    ///
    /// The owning item is the last one starting at or before `src_pos`; a
    /// tag's first item starts at the tag, later ones at their own bytes.
    pub(crate) fn caret_at_source(&self, src_pos: usize) -> Caret {
        let start = |item: &Item| {
            if item.index == 0 {
                item.markup_pos
            } else {
                item.pos
            }
        };
        let i = self
            .items
            .partition_point(|item| start(item) <= src_pos)
            .saturating_sub(1);
        let item = &self.items[i];
        if !item.text_type() {
            return Caret::new(i, usize::from(src_pos >= item.markup_end));
        }
        match item.content {
            Content::Text => {
                let rel = src_pos.saturating_sub(item.pos).min(item.src_size);
                let raw = self.item_raw(item);
                Caret::new(i, decoded_len_of_source(raw, rel, item.quote_require_escape))
            }
            _ if item.src_size > 0
                && src_pos >= item.pos + item.src_size
                && i + 1 < self.items.len() =>
            {
                Caret::new(i + 1, 0)
            }
            _ => Caret::new(i, 0),
        }
    }
}
