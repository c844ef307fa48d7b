//! Building markup from values.
//!
//! Hosts that compose documents programmatically use these helpers instead of
//! string concatenation, so every `text` value is escaped correctly. All
//! generators emit the canonical form with attributes in the opening tag.

use std::fmt::Write;

use crate::color::Color;
use crate::escape::stuff_escape;

/// Style options for [`generate_format`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Text colour; `None` keeps the document default.
    pub color: Option<Color>,
    /// Font size; `None` keeps the document default.
    pub font_size: Option<u32>,
    /// Bold face.
    pub bold: bool,
    /// Italic face.
    pub italic: bool,
}

fn push_attr(out: &mut String, key: &str, value: &str) {
    let _ = write!(out, " {key}=\"{}\"", stuff_escape(value, true));
}

fn push_extra(out: &mut String, extra: &[(&str, &str)]) {
    for (key, value) in extra {
        push_attr(out, key, value);
    }
}

/// `<format text="..." ...></format>` for `text`, or an empty string when
/// `text` is empty (an empty format tag would emit nothing anyway).
#[must_use]
pub fn generate_format(text: &str, options: &FormatOptions, extra: &[(&str, &str)]) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut out = String::from("<format");
    push_attr(&mut out, "text", text);
    if let Some(color) = options.color {
        push_attr(&mut out, "color", &color.encode());
    }
    if let Some(size) = options.font_size {
        push_attr(&mut out, "font_size", &size.to_string());
    }
    if options.bold {
        out.push_str(" bold=yes");
    }
    if options.italic {
        out.push_str(" italic=yes");
    }
    push_extra(&mut out, extra);
    out.push_str("></format>");
    out
}

/// `<img src="..." ...></img>`.
///
/// `align` is one of `left`, `middle`, `right`, `back`, `here`; an empty
/// string leaves the attribute out.
#[must_use]
pub fn generate_img(src: &str, align: &str, floating: bool, extra: &[(&str, &str)]) -> String {
    let mut out = String::from("<img");
    push_attr(&mut out, "src", src);
    if !align.is_empty() {
        push_attr(&mut out, "align", align);
    }
    if floating {
        out.push_str(" float=yes");
    }
    push_extra(&mut out, extra);
    out.push_str("></img>");
    out
}

/// `<ref text="..." dst="..."></ref>`.
#[must_use]
pub fn generate_ref(text: &str, dst: &str, force: bool) -> String {
    let mut out = String::from("<ref");
    push_attr(&mut out, "text", text);
    push_attr(&mut out, "dst", dst);
    if force {
        out.push_str(" force=yes");
    }
    out.push_str("></ref>");
    out
}

/// `<jump amount="..." to="..."></jump>`; returns an empty string when both
/// are `None`.
#[must_use]
pub fn generate_jump(amount: Option<u32>, to: Option<u32>) -> String {
    if amount.is_none() && to.is_none() {
        return String::new();
    }
    let mut out = String::from("<jump");
    if let Some(amount) = amount {
        push_attr(&mut out, "amount", &amount.to_string());
    }
    if let Some(to) = to {
        push_attr(&mut out, "to", &to.to_string());
    }
    out.push_str("></jump>");
    out
}
