//! In-process animation playback.
//!
//! Hosts register frame sequences by id. Every `start_animation` call opens
//! a playback with its own handle; the registry counts how many playbacks
//! reference each id and forgets a playback when its engine releases it.
//! Draw calls queue overlays that [`AnimationRegistry::composite`] blits
//! onto a [`Renderer`].

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rose_common::image::LoadedImage;
use rose_common::warning::warn_once;
use rose_integrate::{AnimationHandle, AnimationHost, Rect};
use rose_markup::Attributes;

use crate::renderer::Renderer;

#[derive(Debug)]
struct Playback {
    id: String,
    frame: usize,
}

#[derive(Debug)]
struct Overlay {
    handle: AnimationHandle,
    rect: Rect,
    frame: Arc<LoadedImage>,
}

#[derive(Debug, Default)]
struct Registry {
    animations: HashMap<String, Vec<Arc<LoadedImage>>>,
    next_handle: u64,
    playing: BTreeMap<AnimationHandle, Playback>,
    overlays: Vec<Overlay>,
}

/// Reference-counted animation host.
#[derive(Debug, Default)]
pub struct AnimationRegistry {
    inner: Mutex<Registry>,
}

impl AnimationRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register (or replace) the frames of `id`.
    pub fn register(&self, id: impl Into<String>, frames: Vec<Arc<LoadedImage>>) {
        let _ = self.lock().animations.insert(id.into(), frames);
    }

    /// Number of playbacks of `id` that have not been released.
    #[must_use]
    pub fn references(&self, id: &str) -> usize {
        self.lock().playing.values().filter(|p| p.id == id).count()
    }

    /// Number of playbacks that have not been released.
    #[must_use]
    pub fn playing(&self) -> usize {
        self.lock().playing.len()
    }

    /// Blit every drawn frame onto `renderer`, in drawing order.
    pub fn composite(&self, renderer: &mut Renderer) {
        for overlay in &self.lock().overlays {
            renderer.draw_image(&overlay.frame, overlay.rect);
        }
    }
}

impl AnimationHost for AnimationRegistry {
    fn find_animation(&self, id: &str) -> bool {
        self.lock()
            .animations
            .get(id)
            .is_some_and(|frames| !frames.is_empty())
    }

    fn start_animation(&self, id: &str, _attributes: &Attributes) -> AnimationHandle {
        let mut registry = self.lock();
        registry.next_handle += 1;
        let handle = AnimationHandle(registry.next_handle);
        let _ = registry.playing.insert(
            handle,
            Playback {
                id: id.to_owned(),
                frame: 0,
            },
        );
        tracing::debug!(target: "render.animation", id, handle = handle.0, "playback started");
        handle
    }

    fn release_animation(&self, handle: AnimationHandle) {
        let mut registry = self.lock();
        if registry.playing.remove(&handle).is_none() {
            warn_once("animation", &format!("release of unknown handle {}", handle.0));
            return;
        }
        registry.overlays.retain(|o| o.handle != handle);
        tracing::debug!(target: "render.animation", handle = handle.0, "playback released");
    }

    fn draw(&self, handle: AnimationHandle, rect: Rect) {
        let mut registry = self.lock();
        let registry = &mut *registry;
        let Some(playback) = registry.playing.get_mut(&handle) else {
            return;
        };
        let Some(frames) = registry.animations.get(&playback.id).filter(|f| !f.is_empty()) else {
            return;
        };
        let frame = frames[playback.frame % frames.len()].clone();
        playback.frame = (playback.frame + 1) % frames.len();
        registry.overlays.retain(|o| o.handle != handle);
        registry.overlays.push(Overlay {
            handle,
            rect,
            frame,
        });
    }

    fn undraw(&self, handle: AnimationHandle, _rect: Rect) {
        self.lock().overlays.retain(|o| o.handle != handle);
    }
}
