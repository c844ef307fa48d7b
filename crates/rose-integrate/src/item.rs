//! Laid-out runs.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use rose_common::image::LoadedImage;
use rose_markup::{Attributes, Color};
use serde::Serialize;

use crate::geometry::Rect;
use crate::metrics::TextStyle;

/// Width of the outline drawn around boxed images.
pub const BOX_WIDTH: i32 = 2;

/// Path prefix that turns an `<img>` into an inline animation.
pub const ANIMATION_PREFIX: &str = "a_n_i_m/";

/// Horizontal placement of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// At the cursor.
    #[default]
    Here,
    /// At the left edge.
    Left,
    /// Centred on the line.
    Middle,
    /// At the right edge.
    Right,
    /// On top of the previous item.
    Back,
}

impl Align {
    /// Parse an `align` attribute. The empty string means [`Align::Here`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "" | "here" => Some(Self::Here),
            "left" => Some(Self::Left),
            "middle" => Some(Self::Middle),
            "right" => Some(Self::Right),
            "back" => Some(Self::Back),
            _ => None,
        }
    }
}

/// What an item draws.
#[derive(Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Content {
    /// A run of [`Item::text`].
    Text,
    /// A zero-width line feed, or the addressable end after a final one.
    Spacer,
    /// A bitmap. `image` is `None` when the lookup failed.
    Image {
        /// Path as written in the markup.
        path: String,
        /// Decoded bitmap.
        #[serde(skip)]
        image: Option<Arc<LoadedImage>>,
    },
    /// Placeholder for an animation the host plays.
    Animation {
        /// Animation id (the path after [`ANIMATION_PREFIX`]).
        id: String,
        /// Every attribute of the `<img>` tag.
        #[serde(skip)]
        attributes: Attributes,
    },
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("Text"),
            Self::Spacer => f.write_str("Spacer"),
            Self::Image { path, image } => f
                .debug_struct("Image")
                .field("path", path)
                .field("loaded", &image.is_some())
                .finish(),
            Self::Animation { id, .. } => f.debug_struct("Animation").field("id", id).finish(),
        }
    }
}

/// One indivisible laid-out unit.
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    /// Sequence number among the items produced by the same segment.
    pub index: usize,
    /// Pixel rectangle relative to the document origin.
    pub rect: Rect,
    /// Row-normalised rectangle used for hit testing.
    pub holden_rect: Rect,
    /// Start of the enclosing tag, or of the run for plain text.
    pub markup_pos: usize,
    /// End of the enclosing tag, or of the run for plain text.
    pub markup_end: usize,
    /// Start of this item's own source bytes.
    pub pos: usize,
    /// Number of source bytes this item consumes.
    pub src_size: usize,
    /// Raw span of the tag's `text` value, for tag-derived text.
    pub value_span: Option<Range<usize>>,
    /// Decoded text. Empty for everything but text runs.
    pub text: String,
    /// Font size of the text.
    pub font_size: u32,
    /// Face flags.
    pub style: TextStyle,
    /// Text colour.
    pub color: Color,
    /// Hyperlink destination.
    pub ref_to: Option<String>,
    /// Outside the normal line flow.
    pub floating: bool,
    /// Drawn with an outline.
    pub boxed: bool,
    /// Image alignment.
    pub align: Align,
    /// The source is a quoted value in which `\` and `"` are escaped.
    pub quote_require_escape: bool,
    /// Edited as a whole tag.
    pub atomic: bool,
    /// What the item draws.
    pub content: Content,
}

impl Item {
    /// Whether the cursor can sit between the characters of this item.
    #[must_use]
    pub const fn text_type(&self) -> bool {
        !self.atomic && matches!(self.content, Content::Text | Content::Spacer)
    }

    /// Whether this is a line spacer.
    #[must_use]
    pub const fn is_spacer(&self) -> bool {
        matches!(self.content, Content::Spacer)
    }

    /// Whether this item stands for a line feed in the source.
    #[must_use]
    pub const fn is_line_feed(&self) -> bool {
        self.is_spacer() && self.src_size > 0
    }

    /// Whether this is an animation placeholder.
    #[must_use]
    pub const fn is_animation(&self) -> bool {
        matches!(self.content, Content::Animation { .. })
    }

    /// Source span occupied by this item's own bytes.
    #[must_use]
    pub const fn source_range(&self) -> Range<usize> {
        self.pos..self.pos + self.src_size
    }

    /// Whether the item was produced by a tag rather than plain text.
    #[must_use]
    pub const fn from_tag(&self) -> bool {
        self.quote_require_escape || !self.text_type()
    }

    /// Source span of the enclosing tag.
    #[must_use]
    pub const fn tag_span(&self) -> Range<usize> {
        self.markup_pos..self.markup_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_names() {
        assert_eq!(Align::from_name(""), Some(Align::Here));
        assert_eq!(Align::from_name("middle"), Some(Align::Middle));
        assert_eq!(Align::from_name("centre"), None);
    }

    #[test]
    fn test_item_serializes_for_inspection() {
        let item = Item {
            index: 0,
            rect: Rect::new(0, 0, 16, 17),
            holden_rect: Rect::new(0, 0, 16, 17),
            markup_pos: 0,
            markup_end: 2,
            pos: 0,
            src_size: 2,
            value_span: None,
            text: "Hi".to_string(),
            font_size: 14,
            style: TextStyle::PLAIN,
            color: Color::BLACK,
            ref_to: None,
            floating: false,
            boxed: false,
            align: Align::Here,
            quote_require_escape: false,
            atomic: false,
            content: Content::Image {
                path: "a.png".to_string(),
                image: None,
            },
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["text"], "Hi");
        assert_eq!(json["color"], "255,0,0,0");
        assert_eq!(json["content"]["kind"], "image");
        assert_eq!(json["content"]["path"], "a.png");
    }
}
