//! Line-break opportunities and width-bounded splitting.
//!
//! Latin text breaks at the edges of space runs. East Asian text may break
//! between any two ideographs, except where the kinsoku rules forbid a line
//! from starting or ending with a given punctuation mark.

use unicode_segmentation::UnicodeSegmentation;

use crate::metrics::{TextMetrics, TextStyle};

/// Whether `ch` belongs to a CJK block in which every character is a word.
#[must_use]
pub const fn is_cjk_char(ch: char) -> bool {
    let c = ch as u32;
    if c < 0x2e80 {
        return false;
    }
    matches!(c,
        // Han ideographs
        0x4e00..0x9fcf
        | 0x3400..0x4dbf
        | 0x2_0000..0x2_a6df
        | 0xf900..0xfaff
        | 0x3190..0x319f
        // radicals
        | 0x2e80..0x2eff
        | 0x2f00..0x2fdf
        | 0x31c0..0x31ef
        // CJK punctuation, bopomofo
        | 0x3000..0x303f
        // hiragana, katakana
        | 0x3040..=0x30ff
        // hangul syllables
        | 0xac00..0xd7af
        // halfwidth and fullwidth forms
        | 0xff00..0xffef)
}

/// Opening brackets and quotes that must not end a line.
const fn no_break_after(ch: char) -> bool {
    matches!(
        ch as u32,
        0x2018
            | 0x201c
            | 0x3008
            | 0x300a
            | 0x300c
            | 0x300e
            | 0x3010
            | 0x3014
            | 0x3016
            | 0x301a
            | 0x301d
            | 0xff08
            | 0xff3b
            | 0xff5b
    )
}

/// Closing punctuation and small kana that must not start a line.
const fn no_break_before(ch: char) -> bool {
    matches!(
        ch as u32,
        0x2019
            | 0x201d
            | 0x2026
            | 0x3001
            | 0x3002
            | 0x3005
            | 0x3009
            | 0x300b
            | 0x300d
            | 0x300f
            | 0x3011
            | 0x3015
            | 0x3017
            | 0x301b
            | 0x301c
            | 0x301e
            | 0x3041
            | 0x3043
            | 0x3045
            | 0x3047
            | 0x3049
            | 0x3063
            | 0x3083
            | 0x3085
            | 0x3087
            | 0x308e
            | 0x309d
            | 0x309e
            | 0x30a1
            | 0x30a3
            | 0x30a5
            | 0x30a7
            | 0x30a9
            | 0x30c3
            | 0x30e3
            | 0x30e5
            | 0x30e7
            | 0x30ee
            | 0x30f5
            | 0x30f6
            | 0x30fb
            | 0x30fc
            | 0x30fd
            | 0x30fe
            | 0xff01
            | 0xff09
            | 0xff0c
            | 0xff0d
            | 0xff0e
            | 0xff1a
            | 0xff1b
            | 0xff1f
            | 0xff3d
            | 0xff5d
            | 0xff64
            | 0xff65
    )
}

/// Whether a line may break between `previous` and `ch` under the CJK rules.
#[must_use]
pub const fn can_break(previous: char, ch: char) -> bool {
    let before = is_cjk_char(ch) && !no_break_before(ch) && !no_break_after(previous);
    let after = is_cjk_char(previous) && !no_break_after(previous) && !no_break_before(ch);
    before || after
}

const fn is_space(ch: char) -> bool {
    ch == ' '
}

/// Byte offsets strictly inside `text` at which a line may break.
pub fn break_opportunities(text: &str) -> impl Iterator<Item = usize> + '_ {
    let mut previous: Option<char> = None;
    text.char_indices().filter_map(move |(i, ch)| {
        let prev = previous.replace(ch)?;
        let allowed = is_space(prev) != is_space(ch) || can_break(prev, ch);
        allowed.then_some(i)
    })
}

/// The text up to the first break opportunity.
#[must_use]
pub fn first_word(text: &str) -> &str {
    break_opportunities(text)
        .next()
        .map_or(text, |end| &text[..end])
}

/// Length of the longest prefix of `text` that fits in `max_width`.
///
/// The prefix ends at a break opportunity when any fits; otherwise it is the
/// longest run of whole graphemes that fits, and never shorter than one
/// grapheme.
pub fn fit_prefix<M: TextMetrics + ?Sized>(
    metrics: &M,
    text: &str,
    font_size: u32,
    style: TextStyle,
    max_width: i32,
) -> usize {
    let mut best = None;
    for end in break_opportunities(text).chain(std::iter::once(text.len())) {
        if metrics.text_width(&text[..end], font_size, style) > max_width {
            break;
        }
        best = Some(end);
    }
    if let Some(end) = best {
        return end;
    }

    let mut end = 0;
    for (i, grapheme) in text.grapheme_indices(true) {
        let candidate = i + grapheme.len();
        if end > 0 && metrics.text_width(&text[..candidate], font_size, style) > max_width {
            break;
        }
        end = candidate;
    }
    end
}

/// Split `text` into consecutive chunks no wider than `max_width`.
///
/// See [`TextMetrics::split_to_width`].
pub fn split_to_width<'t, M: TextMetrics + ?Sized>(
    metrics: &M,
    text: &'t str,
    font_size: u32,
    style: TextStyle,
    max_width: i32,
) -> Vec<&'t str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let end = fit_prefix(metrics, rest, font_size, style, max_width);
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ApproximateMetrics;

    #[test]
    fn test_break_opportunities_latin() {
        let breaks: Vec<_> = break_opportunities("ab  cd").collect();
        assert_eq!(breaks, vec![2, 4]);
        assert_eq!(first_word("hello world"), "hello");
        assert_eq!(first_word("   x"), "   ");
    }

    #[test]
    fn test_kinsoku_rules() {
        assert!(can_break('中', '文'));
        // no line may start with an ideographic full stop
        assert!(!can_break('中', '。'));
        // no line may end with an opening corner bracket
        assert!(!can_break('「', '中'));
    }

    #[test]
    fn test_split_to_width_concatenates() {
        let m = ApproximateMetrics;
        let text = "hello brave new world";
        let chunks = split_to_width(&m, text, 14, TextStyle::PLAIN, 48);
        assert_eq!(chunks.concat(), text);
        assert_eq!(chunks[0], "hello ");
        for chunk in &chunks {
            assert!(m.text_width(chunk, 14, TextStyle::PLAIN) <= 48);
        }
    }

    #[test]
    fn test_split_falls_back_to_graphemes() {
        let m = ApproximateMetrics;
        let chunks = split_to_width(&m, "abcdef", 14, TextStyle::PLAIN, 20);
        assert_eq!(chunks, vec!["ab", "cd", "ef"]);
        // a single grapheme is emitted even when nothing fits
        assert_eq!(fit_prefix(&m, "abc", 14, TextStyle::PLAIN, 0), 1);
    }
}
