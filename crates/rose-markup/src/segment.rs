//! Parser output: a sequence of text runs and recognised tags.

use std::fmt;
use std::ops::Range;

use crate::attributes::Attributes;

/// The recognised tag names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// `<ref>`: a hyperlink label.
    Ref,
    /// `<img>`: an inline or floating image, or an animation placeholder.
    Img,
    /// `<jump>`: moves the layout cursor without emitting anything.
    Jump,
    /// `<format>`: a styled text run.
    Format,
}

impl TagKind {
    /// All recognised tags.
    pub const ALL: [Self; 4] = [Self::Ref, Self::Img, Self::Jump, Self::Format];

    /// Look a tag up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// The tag name as written in markup.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ref => "ref",
            Self::Img => "img",
            Self::Jump => "jump",
            Self::Format => "format",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A run of literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan<'a> {
    /// Byte offset of the run in the source.
    pub start: usize,
    /// The text, verbatim.
    pub text: &'a str,
}

/// A recognised, well-formed tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Byte offset of the opening `<`.
    pub start: usize,
    /// Byte offset just past the closing `>` of `</name>`.
    pub end: usize,
    /// Parsed attribute list (never empty).
    pub attributes: Attributes,
}

impl Tag {
    /// Byte range of the whole tag in the source.
    #[must_use]
    pub const fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// One parsed piece of markup source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text.
    Text(TextSpan<'a>),
    /// `<ref>` tag.
    Ref(Tag),
    /// `<img>` tag.
    Img(Tag),
    /// `<jump>` tag.
    Jump(Tag),
    /// `<format>` tag.
    Format(Tag),
}

impl Segment<'_> {
    /// Wrap a tag in the variant for `kind`.
    #[must_use]
    pub const fn from_tag(kind: TagKind, tag: Tag) -> Self {
        match kind {
            TagKind::Ref => Self::Ref(tag),
            TagKind::Img => Self::Img(tag),
            TagKind::Jump => Self::Jump(tag),
            TagKind::Format => Self::Format(tag),
        }
    }

    /// Byte offset where the segment starts.
    #[must_use]
    pub const fn start(&self) -> usize {
        match self {
            Self::Text(span) => span.start,
            Self::Ref(tag) | Self::Img(tag) | Self::Jump(tag) | Self::Format(tag) => tag.start,
        }
    }

    /// Byte offset just past the segment.
    #[must_use]
    pub const fn end(&self) -> usize {
        match self {
            Self::Text(span) => span.start + span.text.len(),
            Self::Ref(tag) | Self::Img(tag) | Self::Jump(tag) | Self::Format(tag) => tag.end,
        }
    }

    /// Tag kind, or `None` for text.
    #[must_use]
    pub const fn tag_kind(&self) -> Option<TagKind> {
        match self {
            Self::Text(_) => None,
            Self::Ref(_) => Some(TagKind::Ref),
            Self::Img(_) => Some(TagKind::Img),
            Self::Jump(_) => Some(TagKind::Jump),
            Self::Format(_) => Some(TagKind::Format),
        }
    }

    /// The tag, or `None` for text.
    #[must_use]
    pub const fn tag(&self) -> Option<&Tag> {
        match self {
            Self::Text(_) => None,
            Self::Ref(tag) | Self::Img(tag) | Self::Jump(tag) | Self::Format(tag) => Some(tag),
        }
    }
}
