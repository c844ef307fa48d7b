//! Painting.
//!
//! Static content becomes a [`DisplayList`] that a rasteriser executes.
//! Inline animations are not part of it: painting registers them with the
//! host, and the host draws them in separate passes clipped to the part of
//! the screen being refreshed.
//!
//! ```text
//! Markup → Items → Paint → Render
//!                    ↓
//!              DisplayList + animation passes
//! ```

mod display_list;
mod painter;

pub use display_list::{DisplayCommand, DisplayList};
pub use painter::Painter;

use crate::engine::Integrate;
use crate::geometry::Rect;
use crate::item::Content;
use crate::resources::AnimationHandle;

impl Integrate {
    /// Paint the document.
    ///
    /// Animation items are started on the host the first time they are
    /// painted; their handles are released when the document is laid out
    /// again or dropped.
    pub fn display_list(&mut self) -> DisplayList {
        if let Some(host) = self.env.animations.clone() {
            for (index, item) in self.items.iter().enumerate() {
                let Content::Animation { id, attributes } = &item.content else {
                    continue;
                };
                if self.anims.contains_key(&index) {
                    continue;
                }
                let handle = host.start_animation(id, attributes);
                tracing::debug!(
                    target: "integrate.layout",
                    index,
                    id = %id,
                    ?handle,
                    "animation started"
                );
                let _ = self.anims.insert(index, handle);
            }
        }
        Painter::new(&self.items).paint()
    }

    /// Whether painting has started any animation.
    #[must_use]
    pub fn has_animations(&self) -> bool {
        !self.anims.is_empty()
    }

    /// Screen rectangles of running animations that intersect `clip`.
    fn visible_animations(
        &self,
        clip: Rect,
    ) -> impl DoubleEndedIterator<Item = (AnimationHandle, Rect)> + '_ {
        let offset = self.layout_offset;
        self.anims.iter().filter_map(move |(&index, &handle)| {
            let rect = self.items.get(index)?.rect.translate(offset.x, offset.y);
            rect.intersects(&clip).then_some((handle, rect))
        })
    }

    /// Draw every running animation that intersects `clip`.
    pub fn animated_draw(&self, clip: Rect) {
        let Some(host) = &self.env.animations else {
            return;
        };
        for (handle, rect) in self.visible_animations(clip) {
            host.draw(handle, rect);
        }
    }

    /// Undo [`Integrate::animated_draw`], last animation first.
    pub fn animated_undraw(&self, clip: Rect) {
        let Some(host) = &self.env.animations else {
            return;
        };
        for (handle, rect) in self.visible_animations(clip).rev() {
            host.undraw(handle, rect);
        }
    }
}
