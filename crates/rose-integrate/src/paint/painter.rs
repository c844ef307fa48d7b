//! Painter - generates a display list from laid-out items.

use rose_markup::Color;

use crate::geometry::Rect;
use crate::item::{BOX_WIDTH, Content, Item};

use super::{DisplayCommand, DisplayList};

/// Walks items in document order and emits their drawing commands.
///
/// Spacers and missing images draw nothing, and
/// animations are left to the animation passes.
pub struct Painter<'a> {
    items: &'a [Item],
}

impl<'a> Painter<'a> {
    /// Create a painter over `items`.
    #[must_use]
    pub const fn new(items: &'a [Item]) -> Self {
        Self { items }
    }

    /// Paint every item and return the display list.
    #[must_use]
    pub fn paint(&self) -> DisplayList {
        let mut display_list = DisplayList::new();
        for item in self.items {
            paint_item(item, &mut display_list);
        }
        display_list
    }
}

fn paint_item(item: &Item, display_list: &mut DisplayList) {
    let rect = item.rect;
    if item.boxed {
        display_list.push(DisplayCommand::StrokeRect {
            rect,
            width: BOX_WIDTH,
            color: Color::BLACK,
        });
    }
    match &item.content {
        Content::Spacer | Content::Animation { .. } | Content::Image { image: None, .. } => {}
        Content::Image {
            image: Some(image), ..
        } => {
            let inset = if item.boxed { BOX_WIDTH } else { 0 };
            display_list.push(DisplayCommand::DrawImage {
                rect: Rect::new(
                    rect.x + inset,
                    rect.y + inset,
                    rect.w - inset * 2,
                    rect.h - inset * 2,
                ),
                image: image.clone(),
            });
        }
        Content::Text => {
            if item.text.trim().is_empty() && !item.style.underline {
                return;
            }
            display_list.push(DisplayCommand::DrawText {
                x: rect.x,
                y: rect.y,
                text: item.text.clone(),
                font_size: item.font_size,
                style: item.style,
                color: item.color,
            });
            if item.style.underline {
                display_list.push(DisplayCommand::FillRect {
                    rect: Rect::new(rect.x, rect.bottom() - 1, rect.w, 1),
                    color: item.color,
                });
            }
        }
    }
}
