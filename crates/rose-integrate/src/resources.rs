//! Collaborators the engine consults while it lays out and paints.
//!
//! Fonts, bitmaps, hyperlink targets and animations all live outside the
//! engine. A host wires its implementations into an [`Environment`] and hands
//! it to every engine it creates.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rose_common::image::LoadedImage;
use rose_markup::Attributes;

use crate::geometry::Rect;
use crate::metrics::{ApproximateMetrics, TextMetrics};

/// Bitmap lookup by markup path.
pub trait ImageSource: Send + Sync {
    /// The decoded image at `path`, or `None` when there is none.
    fn get_image(&self, path: &str) -> Option<Arc<LoadedImage>>;
}

/// Decides whether a `<ref>` destination exists.
pub trait LinkResolver: Send + Sync {
    /// Whether `dst` names a reachable topic.
    fn resolve(&self, dst: &str) -> bool;
}

/// Handle of an animation started by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationHandle(pub u64);

/// Process-wide animation playback.
///
/// Handles are reference counted by the host; an engine releases every
/// handle it started before it goes away.
pub trait AnimationHost: Send + Sync {
    /// Whether an animation with this id exists.
    fn find_animation(&self, id: &str) -> bool;

    /// Start playing `id`, configured by the `<img>` tag's attributes.
    fn start_animation(&self, id: &str, attributes: &Attributes) -> AnimationHandle;

    /// Stop playback and free the slot.
    fn release_animation(&self, handle: AnimationHandle);

    /// Draw the current frame into `rect` (screen coordinates).
    fn draw(&self, handle: AnimationHandle, rect: Rect);

    /// Restore what was under `rect` before the last draw.
    fn undraw(&self, handle: AnimationHandle, rect: Rect);
}

/// The collaborators of one engine.
#[derive(Clone)]
pub struct Environment {
    /// Text measurement.
    pub metrics: Arc<dyn TextMetrics>,
    /// Image lookup. Without one every `<img>` is a missing image.
    pub images: Option<Arc<dyn ImageSource>>,
    /// Animation playback. Without one animations are missing images.
    pub animations: Option<Arc<dyn AnimationHost>>,
    /// Hyperlink resolution. Without one every destination resolves.
    pub links: Option<Arc<dyn LinkResolver>>,
}

impl Environment {
    /// Environment with the given metrics and nothing else.
    #[must_use]
    pub fn new(metrics: Arc<dyn TextMetrics>) -> Self {
        Self {
            metrics,
            images: None,
            animations: None,
            links: None,
        }
    }

    /// Add an image source.
    #[must_use]
    pub fn with_images(mut self, images: Arc<dyn ImageSource>) -> Self {
        self.images = Some(images);
        self
    }

    /// Add an animation host.
    #[must_use]
    pub fn with_animations(mut self, animations: Arc<dyn AnimationHost>) -> Self {
        self.animations = Some(animations);
        self
    }

    /// Add a link resolver.
    #[must_use]
    pub fn with_links(mut self, links: Arc<dyn LinkResolver>) -> Self {
        self.links = Some(links);
        self
    }

    /// Look `path` up at the display density first, then as written.
    #[must_use]
    pub fn lookup_image(&self, path: &str, hdpi_scale: i32) -> Option<Arc<LoadedImage>> {
        let images = self.images.as_ref()?;
        (hdpi_scale > 1)
            .then(|| hdpi_name(path, hdpi_scale))
            .and_then(|name| images.get_image(&name))
            .or_else(|| images.get_image(path))
    }

    /// Whether `dst` resolves. Always true without a resolver.
    #[must_use]
    pub fn resolve_link(&self, dst: &str) -> bool {
        self.links.as_ref().is_none_or(|links| links.resolve(dst))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(Arc::new(ApproximateMetrics))
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("images", &self.images.is_some())
            .field("animations", &self.animations.is_some())
            .field("links", &self.links.is_some())
            .finish_non_exhaustive()
    }
}

/// `dir/name.ext` becomes `dir/name@{scale}x.ext`.
#[must_use]
pub fn hdpi_name(path: &str, scale: i32) -> String {
    let stem_end = Path::new(path)
        .extension()
        .map_or(path.len(), |ext| path.len() - ext.len() - 1);
    format!("{}@{scale}x{}", &path[..stem_end], &path[stem_end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hdpi_name() {
        assert_eq!(hdpi_name("misc/logo.png", 2), "misc/logo@2x.png");
        assert_eq!(hdpi_name("noext", 3), "noext@3x");
    }
}
