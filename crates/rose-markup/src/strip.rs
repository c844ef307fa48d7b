//! Reducing markup to the text a reader would see.

use crate::parser::split_segments;
use crate::segment::Segment;

/// Replace every tag in `text` by its visible text.
///
/// `format` and `ref` tags contribute their decoded `text` attribute, `img`
/// and `jump` tags contribute nothing, and literal text is kept as is. The
/// result contains no recognised markup and no escape sequences, which makes
/// it safe to escape and paste inside another tag's `text` value.
#[must_use]
pub fn drop_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in split_segments(text) {
        match segment {
            Segment::Text(span) => out.push_str(span.text),
            Segment::Format(tag) | Segment::Ref(tag) => {
                out.push_str(tag.attributes.get_or_empty("text"));
            }
            Segment::Img(_) | Segment::Jump(_) => {}
        }
    }
    out
}
