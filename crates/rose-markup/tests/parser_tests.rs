//! Integration tests for splitting markup into segments.

use rose_markup::generate::{FormatOptions, generate_format, generate_img, generate_jump, generate_ref};
use rose_markup::{Color, Segment, TagKind, drop_markup, split_segments};

/// Helper: the text of every literal segment, concatenated.
fn literal_text(src: &str) -> String {
    split_segments(src)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Text(span) => Some(span.text.to_owned()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_plain_text_is_one_segment() {
    let segments = split_segments("Hello\nWorld");
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].start(), 0);
    assert_eq!(segments[0].end(), 11);
}

#[test]
fn test_canonical_form_with_attributes_in_open_tag() {
    let src = r#"ab<format text="Hi" color="255,255,0,0"></format>cd"#;
    let segments = split_segments(src);
    assert_eq!(segments.len(), 3);
    let Segment::Format(tag) = &segments[1] else {
        panic!("expected a format tag, got {:?}", segments[1]);
    };
    assert_eq!(tag.start, 2);
    assert_eq!(tag.end, src.len() - 2);
    assert_eq!(tag.attributes.get("text"), Some("Hi"));
    let span = tag.attributes.span("text").unwrap();
    assert_eq!(&src[span], "Hi");
}

#[test]
fn test_body_form_is_accepted() {
    let src = r#"<format>text="Hi" bold=yes</format>"#;
    let segments = split_segments(src);
    assert_eq!(segments.len(), 1);
    let tag = segments[0].tag().unwrap();
    assert_eq!(segments[0].tag_kind(), Some(TagKind::Format));
    assert!(tag.attributes.get_bool("bold", false));
    assert_eq!(&src[tag.attributes.span("text").unwrap()], "Hi");
}

#[test]
fn test_gt_inside_quotes_does_not_close_tag() {
    let src = r#"<format text="a>b"></format>"#;
    let segments = split_segments(src);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].tag().unwrap().attributes.get("text"), Some("a>b"));
}

#[test]
fn test_every_segment_kind() {
    let src = concat!(
        r#"<ref text="T" dst="x"></ref>"#,
        r#"<img src="a.png"></img>"#,
        r#"<jump amount=10></jump>"#,
        r#"<format text="F"></format>"#,
    );
    let kinds: Vec<_> = split_segments(src)
        .iter()
        .map(Segment::tag_kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(TagKind::Ref),
            Some(TagKind::Img),
            Some(TagKind::Jump),
            Some(TagKind::Format)
        ]
    );
}

// ---------------------------------------------------------------------------
// Malformed markup degrades to literal text
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_tag_is_text() {
    let src = r#"<bold text="x"></bold>"#;
    assert_eq!(literal_text(src), src);
}

#[test]
fn test_missing_closing_tag_is_text() {
    let src = r#"x <format text="Hi"> y"#;
    assert_eq!(literal_text(src), src);
}

#[test]
fn test_empty_attribute_list_is_text() {
    let src = "<format></format>";
    assert_eq!(literal_text(src), src);
}

#[test]
fn test_attributes_in_both_places_is_text() {
    let src = r#"<format text="a">text="b"</format>"#;
    assert_eq!(literal_text(src), src);
}

#[test]
fn test_unterminated_quote_is_text() {
    let src = r#"<format text="Hi></format>"#;
    assert_eq!(literal_text(src), src);
}

#[test]
fn test_stray_lt_restarts_name_scan() {
    let src = r#"1 <2 <<format text="ok"></format>"#;
    let segments = split_segments(src);
    assert_eq!(segments.len(), 2);
    let Segment::Text(span) = &segments[0] else {
        panic!("expected leading text");
    };
    assert_eq!(span.text, "1 <2 <");
    assert_eq!(segments[1].start(), 6);
}

#[test]
fn test_less_than_in_prose() {
    let src = "a < b and c <d";
    assert_eq!(literal_text(src), src);
    assert_eq!(split_segments(src).len(), 1);
}

#[test]
fn test_segments_cover_source() {
    let src = r#"x<img src="a"></img><format text="é"></format>yz<jump to=4></jump>"#;
    let segments = split_segments(src);
    let mut expected = 0;
    for s in &segments {
        assert_eq!(s.start(), expected);
        expected = s.end();
    }
    assert_eq!(expected, src.len());
}

// ---------------------------------------------------------------------------
// Stripping and generating
// ---------------------------------------------------------------------------

#[test]
fn test_drop_markup_keeps_visible_text() {
    let src = r#"a<format text="b\"c"></format><img src="x"></img><ref text="d" dst="t"></ref>e"#;
    assert_eq!(drop_markup(src), r#"ab"cde"#);
}

#[test]
fn test_generated_format_parses_back() {
    let options = FormatOptions {
        color: Some(Color::argb(255, 1, 2, 3)),
        font_size: Some(18),
        bold: true,
        italic: false,
    };
    let markup = generate_format(r#"say "hi" \o/"#, &options, &[]);
    let segments = split_segments(&markup);
    assert_eq!(segments.len(), 1);
    let tag = segments[0].tag().unwrap();
    assert_eq!(tag.attributes.get("text"), Some(r#"say "hi" \o/"#));
    assert_eq!(tag.attributes.get("color"), Some("255,1,2,3"));
    assert_eq!(tag.attributes.get_int("font_size"), Some(18));
    assert!(tag.attributes.get_bool("bold", false));
}

#[test]
fn test_generate_format_empty_text() {
    assert_eq!(generate_format("", &FormatOptions::default(), &[]), "");
}

#[test]
fn test_generated_tags_parse_back() {
    let markup = format!(
        "{}{}{}",
        generate_img("a.png", "left", true, &[("box", "yes")]),
        generate_ref("Label", "topic", false),
        generate_jump(Some(8), None),
    );
    let kinds: Vec<_> = split_segments(&markup)
        .iter()
        .map(Segment::tag_kind)
        .collect();
    assert_eq!(
        kinds,
        vec![Some(TagKind::Img), Some(TagKind::Ref), Some(TagKind::Jump)]
    );
    assert_eq!(generate_jump(None, None), "");
}
