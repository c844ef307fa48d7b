//! Property tests for layout bookkeeping and editing on generated markup.
//!
//! Documents are assembled from a fixed vocabulary of fragments so that
//! generated inputs hit escapes, tags, wide characters and line feeds often.

use std::sync::Arc;

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use rose_common::image::LoadedImage;
use rose_integrate::{Environment, ImageSource, Integrate, IntegrateConfig};

const WIDTH: i32 = 120;

/// Fragments that only produce text runs and line feeds.
const TEXT_FRAGMENTS: &[&str] = &[
    "Hello",
    " ",
    "world ",
    "\n",
    "中文",
    "é",
    "<",
    "\"",
    "longwordwithoutbreaks",
    r#"<format text="Hi" bold=yes></format>"#,
    "<format text=Hi italic=yes></format>",
    r#"<format text="a\"b\\c"></format>"#,
    r#"<format text="x
y"></format>"#,
    r#"<ref text="link" dst=topic></ref>"#,
    r#"<jump amount=10></jump>"#,
];

/// Fragments that place images, floating or not.
const IMAGE_FRAGMENTS: &[&str] = &[
    r#"<img src="missing.png"></img>"#,
    r#"<img src="wide.png" float=yes></img>"#,
    r#"<img src="box.png" align=right float=yes></img>"#,
    r#"<img src="box.png" align=middle float=yes></img>"#,
    r#"<img src="box.png" align=left float=yes></img>"#,
];

struct Fixtures;

impl ImageSource for Fixtures {
    fn get_image(&self, path: &str) -> Option<Arc<LoadedImage>> {
        let (w, h) = match path {
            // wider than the line
            "wide.png" => (150, 30),
            "box.png" => (20, 20),
            _ => return None,
        };
        Some(Arc::new(LoadedImage::solid(w, h, [0, 0, 255, 255])))
    }
}

fn document(tokens: &[u8], with_images: bool) -> String {
    let count = if with_images {
        TEXT_FRAGMENTS.len() + IMAGE_FRAGMENTS.len()
    } else {
        TEXT_FRAGMENTS.len()
    };
    tokens
        .iter()
        .map(|&t| {
            let i = usize::from(t) % count;
            TEXT_FRAGMENTS
                .get(i)
                .copied()
                .unwrap_or_else(|| IMAGE_FRAGMENTS[i - TEXT_FRAGMENTS.len()])
        })
        .collect()
}

fn editable(src: &str, max_width: i32) -> Integrate {
    let config = IntegrateConfig::new(max_width, 14).with_editable(true);
    let env = Environment::default().with_images(Arc::new(Fixtures));
    Integrate::new(src, config, env).unwrap()
}

#[quickcheck]
fn prop_items_follow_source_order(tokens: Vec<u8>) -> bool {
    let src = document(&tokens, true);
    let engine = editable(&src, WIDTH);
    let mut end = 0;
    for item in engine.items() {
        let ordered = item.pos >= end
            && item.markup_pos <= item.pos
            && item.pos + item.src_size <= item.markup_end
            && item.markup_end <= src.len()
            && src.is_char_boundary(item.pos)
            && src.is_char_boundary(item.pos + item.src_size);
        if !ordered {
            return false;
        }
        end = item.pos + item.src_size;
    }
    true
}

#[quickcheck]
fn prop_rows_stay_in_line(tokens: Vec<u8>) -> bool {
    let engine = editable(&document(&tokens, true), WIDTH);
    // only a single character wider than what is left of the row may overflow it
    engine
        .items()
        .iter()
        .filter(|item| !item.floating && item.rect.w > 0)
        .all(|item| item.rect.right() <= WIDTH || item.text.chars().count() == 1)
}

#[quickcheck]
fn prop_cursor_inside_document(tokens: Vec<u8>, pos: usize) -> TestResult {
    let src = document(&tokens, true);
    if src.is_empty() {
        return TestResult::discard();
    }
    let engine = editable(&src, WIDTH);
    let cursor = engine.calculate_cursor(pos % (src.len() + 1));
    TestResult::from_bool(cursor.w == 0 && cursor.bottom() <= engine.get_size().h)
}

#[quickcheck]
fn prop_delete_only_removes(tokens: Vec<u8>, x: u8, y: u8, backspace: bool) -> bool {
    let src = document(&tokens, true);
    let engine = editable(&src, WIDTH);
    let result = engine.handle_char(true, i32::from(x), i32::from(y), backspace);
    if result.source.len() > src.len() {
        return false;
    }
    // the edited source lays out again
    let _ = editable(&result.source, WIDTH);
    true
}

#[quickcheck]
fn prop_moving_keeps_source(tokens: Vec<u8>, x: u8, y: u8, backspace: bool) -> bool {
    let src = document(&tokens, true);
    let engine = editable(&src, WIDTH);
    engine.handle_char(false, i32::from(x), i32::from(y), backspace).source == src
}

#[quickcheck]
fn prop_backspace_undoes_insert(tokens: Vec<u8>, word: String, x: u8, y: u8) -> TestResult {
    let word: String = word
        .chars()
        .filter(|&c| c.is_ascii_alphanumeric() || matches!(c, '"' | '\\' | 'é' | '中'))
        .take(12)
        .collect();
    let src = document(&tokens, false);
    if word.is_empty() || src.is_empty() {
        return TestResult::discard();
    }

    let engine = editable(&src, WIDTH);
    let mut result = engine.insert_str(i32::from(x), i32::from(y), &word);
    if result.source == src {
        return TestResult::discard();
    }
    for _ in word.chars() {
        let current = editable(&result.source, WIDTH);
        result = current.handle_char(true, result.cursor.x, result.cursor.y, true);
    }
    // a bare value may have gained quotes on the way
    let unquoted = |s: &str| s.replace('"', "");
    TestResult::from_bool(result.source == src || unquoted(&result.source) == unquoted(&src))
}

