//! Integration tests for image loading, rasterisation and animation playback.

use std::path::PathBuf;
use std::sync::Arc;

use rose_common::image::LoadedImage;
use rose_integrate::{
    AnimationHost, DisplayCommand, DisplayList, Environment, ImageSource, Integrate,
    IntegrateConfig, Point, Rect, TextMetrics, TextStyle,
};
use rose_markup::Color;
use rose_render::{
    AnimationRegistry, FileImageSource, FontSet, FontdueMetrics, Renderer, get_surface,
};

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rose-render-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(dir: &std::path::Path, name: &str, w: u32, h: u32, rgba: [u8; 4]) {
    image::RgbaImage::from_pixel(w, h, image::Rgba(rgba))
        .save(dir.join(name))
        .unwrap();
}

// ----------------------------------------------------------------------------
// Image source
// ----------------------------------------------------------------------------

#[test]
fn test_file_image_source_decodes_and_caches() {
    let dir = scratch_dir("cache");
    write_png(&dir, "dot.png", 3, 2, RED);
    let source = FileImageSource::new(&dir);

    let image = source.get_image("dot.png").unwrap();
    assert_eq!(image.dimensions(), (3, 2));
    assert_eq!(source.cached(), 1);

    // served from the cache once the file is gone
    std::fs::remove_file(dir.join("dot.png")).unwrap();
    assert!(source.get_image("dot.png").is_some());
    assert!(source.load("dot.png").is_err());

    assert!(source.get_image("nothing.png").is_none());
    assert_eq!(source.cached(), 2);
}

#[test]
fn test_svg_is_rasterised() {
    let dir = scratch_dir("svg");
    std::fs::write(
        dir.join("box.svg"),
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="6"><rect width="4" height="6" fill="#0000ff"/></svg>"##,
    )
    .unwrap();
    let image = FileImageSource::new(&dir).load("box.svg").unwrap();
    assert_eq!(image.dimensions(), (4, 6));
    assert_eq!(&image.rgba_data()[..4], &[0, 0, 255, 255]);
}

#[test]
fn test_density_variant_from_disk() {
    let dir = scratch_dir("hdpi");
    write_png(&dir, "icon.png", 8, 8, RED);
    write_png(&dir, "icon@2x.png", 16, 16, GREEN);
    let env = Environment::default().with_images(Arc::new(FileImageSource::new(&dir)));
    let config = IntegrateConfig::new(200, 14).with_hdpi_scale(2);
    let engine = Integrate::new(r#"<img src="icon.png"></img>"#, config, env).unwrap();
    assert_eq!(engine.items()[0].rect.w, 16);
}

// ----------------------------------------------------------------------------
// Rasterisation
// ----------------------------------------------------------------------------

#[test]
fn test_render_commands() {
    let mut list = DisplayList::new();
    list.push(DisplayCommand::FillRect {
        rect: Rect::new(0, 0, 2, 2),
        color: Color::BLACK,
    });
    list.push(DisplayCommand::DrawImage {
        rect: Rect::new(2, 0, 4, 2),
        image: Arc::new(LoadedImage::solid(2, 1, GREEN)),
    });
    let mut renderer = Renderer::new(8, 4, Color::WHITE, None);
    renderer.render(&list);
    let image = renderer.image();
    assert_eq!(image.get_pixel(1, 1).0, BLACK);
    assert_eq!(image.get_pixel(5, 1).0, GREEN);
    assert_eq!(image.get_pixel(6, 1).0, WHITE);
    assert_eq!(image.get_pixel(0, 3).0, WHITE);
}

#[test]
fn test_transparent_pixels_are_skipped() {
    let mut renderer = Renderer::new(2, 1, Color::WHITE, None);
    let image = LoadedImage::new(2, 1, vec![0, 0, 0, 0, 255, 0, 0, 255]);
    renderer.draw_image(&image, Rect::new(0, 0, 2, 1));
    assert_eq!(renderer.image().get_pixel(0, 0).0, WHITE);
    assert_eq!(renderer.image().get_pixel(1, 0).0, RED);
}

#[test]
fn test_surface_of_boxed_image() {
    struct One;
    impl ImageSource for One {
        fn get_image(&self, _path: &str) -> Option<Arc<LoadedImage>> {
            Some(Arc::new(LoadedImage::solid(4, 4, RED)))
        }
    }
    let env = Environment::default().with_images(Arc::new(One));
    let mut engine = Integrate::new(
        r#"<img src="x.png" box=yes></img>"#,
        IntegrateConfig::new(100, 14),
        env,
    )
    .unwrap();
    let surface = get_surface(&mut engine, None, Color::WHITE);
    // 4 px image + 2 px outline on each side, on a 17 px row
    assert_eq!(surface.dimensions(), (8, 17));
    assert_eq!(surface.get_pixel(0, 9).0, BLACK);
    assert_eq!(surface.get_pixel(3, 12).0, RED);
    assert_eq!(surface.get_pixel(3, 2).0, WHITE);
}

#[test]
fn test_system_font_measures_like_it_draws() {
    let Ok(fonts) = FontSet::load_system() else {
        // no fonts installed on this machine
        return;
    };
    let fonts = Arc::new(fonts);
    let metrics = FontdueMetrics::new(fonts.clone());
    let one = metrics.text_width("a", 20, TextStyle::PLAIN);
    let two = metrics.text_width("aa", 20, TextStyle::PLAIN);
    assert!(one > 0);
    assert!(two >= one);
    assert_eq!(metrics.line_height(20), 24);

    let env = Environment::new(Arc::new(metrics));
    let mut engine = Integrate::new("Hello", IntegrateConfig::new(200, 20), env).unwrap();
    let surface = get_surface(&mut engine, Some(fonts), Color::WHITE);
    assert!(surface.pixels().any(|p| p.0 != WHITE));
}

// ----------------------------------------------------------------------------
// Animations
// ----------------------------------------------------------------------------

fn flag_registry() -> Arc<AnimationRegistry> {
    let registry = Arc::new(AnimationRegistry::new());
    registry.register(
        "flag",
        vec![
            Arc::new(LoadedImage::solid(1, 1, RED)),
            Arc::new(LoadedImage::solid(1, 1, GREEN)),
        ],
    );
    registry
}

#[test]
fn test_registry_counts_references() {
    let registry = flag_registry();
    assert!(registry.find_animation("flag"));
    assert!(!registry.find_animation("other"));

    let env = Environment::default().with_animations(registry.clone());
    let src = r#"<img src="a_n_i_m/flag" width=4 height=4></img><img src="a_n_i_m/flag" width=4 height=4></img>"#;
    let mut engine = Integrate::new(src, IntegrateConfig::new(100, 14), env).unwrap();
    assert_eq!(registry.references("flag"), 0);
    let _ = engine.display_list();
    assert_eq!(registry.references("flag"), 2);
    drop(engine);
    assert_eq!(registry.playing(), 0);
}

#[test]
fn test_frames_advance_per_draw() {
    let registry = flag_registry();
    let env = Environment::default().with_animations(registry.clone());
    let mut engine = Integrate::new(
        r#"<img src="a_n_i_m/flag" width=4 height=4></img>"#,
        IntegrateConfig::new(100, 14),
        env,
    )
    .unwrap();
    let _ = engine.display_list();
    engine.set_layout_offset(Point::new(1, 0));

    let mut canvas = Renderer::new(8, 20, Color::WHITE, None);
    let clip = Rect::new(0, 0, 8, 20);
    engine.animated_draw(clip);
    registry.composite(&mut canvas);
    // the frame sits at the row bottom, shifted by the offset
    assert_eq!(canvas.image().get_pixel(2, 15).0, RED);
    assert_eq!(canvas.image().get_pixel(0, 15).0, WHITE);

    engine.animated_draw(clip);
    registry.composite(&mut canvas);
    assert_eq!(canvas.image().get_pixel(2, 15).0, GREEN);

    engine.animated_undraw(clip);
    let mut fresh = Renderer::new(8, 20, Color::WHITE, None);
    registry.composite(&mut fresh);
    assert_eq!(fresh.image().get_pixel(2, 15).0, WHITE);
}
