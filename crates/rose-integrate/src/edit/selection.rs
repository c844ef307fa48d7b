//! Selections between two points.

use serde::Serialize;

use crate::edit::EditResult;
use crate::engine::Integrate;
use crate::geometry::{Point, Rect};

/// What to do with a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    /// Remove the selected source.
    Delete,
    /// Extract the selected source as standalone markup.
    Copy,
}

/// Result of [`Integrate::handle_selection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SelectionOutcome {
    /// The source without the selection.
    Deleted(EditResult),
    /// Markup for the selection.
    Copied(String),
}

impl Integrate {
    /// Delete or copy everything between the carets nearest to two points.
    ///
    /// Copying a partially selected `format` or `ref` run re-emits the tag
    /// around the selected characters so the result is valid markup on its
    /// own; images and atomic tags are copied whole.
    #[must_use]
    pub fn handle_selection(
        &self,
        start: Point,
        end: Point,
        action: SelectionAction,
    ) -> SelectionOutcome {
        let carets = if self.config.editable {
            self.caret_from_pixel(start.x, start.y)
                .zip(self.caret_from_pixel(end.x, end.y))
        } else {
            None
        };
        let Some((from, to)) = carets else {
            return match action {
                SelectionAction::Delete => SelectionOutcome::Deleted(EditResult::unchanged(
                    self.src.clone(),
                    Rect::default(),
                )),
                SelectionAction::Copy => SelectionOutcome::Copied(String::new()),
            };
        };

        let units = self.units();
        let (a, b) = (self.boundary_of(from, &units), self.boundary_of(to, &units));
        let (lo, hi) = (a.min(b), a.max(b));
        match action {
            SelectionAction::Delete if lo == hi => {
                let cursor = self.caret_rect(self.caret_at_boundary(lo, &units));
                SelectionOutcome::Deleted(EditResult::unchanged(self.src.clone(), cursor))
            }
            SelectionAction::Delete => SelectionOutcome::Deleted(self.remove_units(&units, lo..hi)),
            SelectionAction::Copy => {
                let mut out = String::new();
                let mut k = lo;
                while k < hi {
                    let unit = &units[k];
                    let tag = unit.tag.as_ref().filter(|_| !unit.atomic);
                    let Some(tag) = tag else {
                        out.push_str(&self.src[unit.source.clone()]);
                        k += 1;
                        continue;
                    };
                    let run = units[k..hi]
                        .iter()
                        .take_while(|u| !u.atomic && u.tag.as_ref() == Some(tag))
                        .count();
                    let selected = unit.source.start..units[k + run - 1].source.end;
                    match &unit.value {
                        Some(value) => {
                            out.push_str(&self.src[tag.start..value.start]);
                            out.push_str(&self.src[selected]);
                            out.push_str(&self.src[value.end..tag.end]);
                        }
                        None => out.push_str(&self.src[selected]),
                    }
                    k += run;
                }
                SelectionOutcome::Copied(out)
            }
        }
    }

    /// [`Integrate::handle_selection`] with [`SelectionAction::Delete`].
    #[must_use]
    pub fn delete_selection(&self, start: Point, end: Point) -> EditResult {
        match self.handle_selection(start, end, SelectionAction::Delete) {
            SelectionOutcome::Deleted(result) => result,
            SelectionOutcome::Copied(_) => EditResult::unchanged(self.src.clone(), Rect::default()),
        }
    }

    /// [`Integrate::handle_selection`] with [`SelectionAction::Copy`].
    #[must_use]
    pub fn copy_selection(&self, start: Point, end: Point) -> String {
        match self.handle_selection(start, end, SelectionAction::Copy) {
            SelectionOutcome::Copied(text) => text,
            SelectionOutcome::Deleted(_) => String::new(),
        }
    }
}
