//! Markup layer of the rose rich-text engine.
//!
//! The engine consumes a small tag language embedded in ordinary text:
//!
//! ```text
//! <ref text="Label" dst="topic_id"></ref>
//! <img src="path.png" align="left" float="yes"></img>
//! <jump amount="20"></jump>
//! <format text="Hi" color="255,255,0,0" bold="yes"></format>
//! ```
//!
//! This crate splits a source string into [`Segment`]s, parses attribute
//! lists, and owns the escaping rules that let `text` values carry `\` and
//! `"`. Nothing here measures or lays anything out.

pub mod attributes;
pub mod color;
pub mod error;
pub mod escape;
pub mod generate;
pub mod parser;
pub mod segment;
pub mod strip;
pub mod utf8;

pub use attributes::{Attribute, Attributes, parse_attributes};
pub use color::Color;
pub use error::{ColorError, EncodingError};
pub use escape::{EscapedChar, EscapedChars, drop_escape, escaped_len, stuff_escape};
pub use parser::split_segments;
pub use segment::{Segment, Tag, TagKind, TextSpan};
pub use strip::drop_markup;
