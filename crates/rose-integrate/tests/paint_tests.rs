//! Integration tests for display lists and animation passes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rose_common::image::LoadedImage;
use rose_integrate::{
    AnimationHandle, AnimationHost, DisplayCommand, Environment, ImageSource, Integrate,
    IntegrateConfig, Point, Rect,
};
use rose_markup::Attributes;

/// Animation host that records every call.
#[derive(Default)]
struct RecordingHost {
    log: Mutex<Vec<String>>,
    next: AtomicU64,
}

impl RecordingHost {
    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn take_log(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }
}

impl AnimationHost for RecordingHost {
    fn find_animation(&self, id: &str) -> bool {
        id == "flag"
    }

    fn start_animation(&self, id: &str, attributes: &Attributes) -> AnimationHandle {
        let handle = AnimationHandle(self.next.fetch_add(1, Ordering::SeqCst) + 1);
        let width = attributes.get_or_empty("width");
        self.record(format!("start {id} {width} -> {}", handle.0));
        handle
    }

    fn release_animation(&self, handle: AnimationHandle) {
        self.record(format!("release {}", handle.0));
    }

    fn draw(&self, handle: AnimationHandle, rect: Rect) {
        self.record(format!("draw {} {},{}", handle.0, rect.x, rect.y));
    }

    fn undraw(&self, handle: AnimationHandle, rect: Rect) {
        self.record(format!("undraw {} {},{}", handle.0, rect.x, rect.y));
    }
}

struct OneImage(Arc<LoadedImage>);

impl ImageSource for OneImage {
    fn get_image(&self, path: &str) -> Option<Arc<LoadedImage>> {
        (path == "a.png").then(|| self.0.clone())
    }
}

fn with_host(src: &str, host: &Arc<RecordingHost>) -> Integrate {
    let env = Environment::default().with_animations(host.clone());
    Integrate::new(src, IntegrateConfig::new(400, 14), env).unwrap()
}

fn paint(src: &str) -> Vec<DisplayCommand> {
    let image = Arc::new(LoadedImage::solid(20, 20, [255, 0, 0, 255]));
    let env = Environment::default().with_images(Arc::new(OneImage(image)));
    let mut engine = Integrate::new(src, IntegrateConfig::new(400, 14), env).unwrap();
    engine.display_list().commands().to_vec()
}

const FLAG: &str = r#"<img src="a_n_i_m/flag" width=20 height=10></img>text"#;

// ----------------------------------------------------------------------------
// Display list
// ----------------------------------------------------------------------------

#[test]
fn test_text_commands() {
    let commands = paint("Hello\nWorld");
    assert_eq!(commands.len(), 2);
    let DisplayCommand::DrawText { x, y, text, font_size, .. } = &commands[1] else {
        panic!("expected text, got {:?}", commands[1]);
    };
    assert_eq!((*x, *y, text.as_str(), *font_size), (0, 17, "World", 14));
}

#[test]
fn test_link_is_underlined() {
    let commands = paint(r#"<ref text="go" dst=x></ref>"#);
    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[0], DisplayCommand::DrawText { style, .. } if style.underline));
    let DisplayCommand::FillRect { rect, .. } = commands[1] else {
        panic!("expected underline, got {:?}", commands[1]);
    };
    assert_eq!(rect, Rect::new(0, 16, 16, 1));
}

#[test]
fn test_boxed_image() {
    let commands = paint(r#"<img src="a.png" box=yes></img>"#);
    assert_eq!(commands.len(), 2);
    assert!(matches!(
        commands[0],
        DisplayCommand::StrokeRect { rect, width: 2, .. } if rect == Rect::new(0, 0, 24, 24)
    ));
    let DisplayCommand::DrawImage { rect, image } = &commands[1] else {
        panic!("expected image, got {:?}", commands[1]);
    };
    assert_eq!(*rect, Rect::new(2, 2, 20, 20));
    assert_eq!(image.dimensions(), (20, 20));
}

#[test]
fn test_missing_image_and_blank_runs_draw_nothing() {
    assert!(paint(r#"<img src="gone.png"></img>"#).is_empty());

    let config = IntegrateConfig::new(40, 14).with_editable(true);
    let mut engine = Integrate::new("hello world", config, Environment::default()).unwrap();
    let list = engine.display_list();
    // the wrapped space is an item of its own but draws nothing
    assert_eq!(engine.items().len(), 3);
    assert_eq!(list.len(), 2);
}

// ----------------------------------------------------------------------------
// Animations
// ----------------------------------------------------------------------------

#[test]
fn test_animation_started_once_and_released_on_drop() {
    let host = Arc::new(RecordingHost::default());
    let mut engine = with_host(FLAG, &host);
    assert!(!engine.has_animations());

    let list = engine.display_list();
    assert!(engine.has_animations());
    // only the text; the animation is drawn by the host
    assert_eq!(list.len(), 1);
    let _ = engine.display_list();
    assert_eq!(host.take_log(), vec!["start flag 20 -> 1"]);

    drop(engine);
    assert_eq!(host.take_log(), vec!["release 1"]);
}

#[test]
fn test_relayout_releases_animations() {
    let host = Arc::new(RecordingHost::default());
    let mut engine = with_host(FLAG, &host);
    let _ = engine.display_list();
    let _ = host.take_log();

    engine.set_source("plain");
    assert!(!engine.has_animations());
    assert_eq!(host.take_log(), vec!["release 1"]);
}

#[test]
fn test_animated_draw_respects_clip_and_offset() {
    let host = Arc::new(RecordingHost::default());
    let mut engine = with_host(FLAG, &host);
    let _ = engine.display_list();
    let _ = host.take_log();

    // the animation sits on the row bottom
    engine.animated_draw(Rect::new(0, 0, 100, 100));
    assert_eq!(host.take_log(), vec!["draw 1 0,7"]);

    engine.set_layout_offset(Point::new(5, 5));
    engine.animated_draw(Rect::new(0, 0, 100, 100));
    engine.animated_undraw(Rect::new(0, 0, 100, 100));
    assert_eq!(host.take_log(), vec!["draw 1 5,12", "undraw 1 5,12"]);

    engine.animated_draw(Rect::new(200, 200, 10, 10));
    assert!(host.take_log().is_empty());
}

#[test]
fn test_undraw_runs_in_reverse_order() {
    let host = Arc::new(RecordingHost::default());
    let src = r#"<img src="a_n_i_m/flag" width=20 height=10></img><img src="a_n_i_m/flag" width=20 height=10></img>"#;
    let mut engine = with_host(src, &host);
    let _ = engine.display_list();
    let _ = host.take_log();

    engine.animated_undraw(Rect::new(0, 0, 400, 100));
    assert_eq!(host.take_log(), vec!["undraw 2 20,7", "undraw 1 0,7"]);
}

#[test]
fn test_unusable_animations_become_placeholders() {
    let host = Arc::new(RecordingHost::default());
    let src = r#"<img src="a_n_i_m/unknown" width=20 height=10></img><img src="a_n_i_m/flag"></img>"#;
    let mut engine = with_host(src, &host);
    let _ = engine.display_list();
    assert!(!engine.has_animations());
    assert!(engine.items().iter().all(|item| item.rect.w == 0));
    assert!(host.take_log().is_empty());
}
