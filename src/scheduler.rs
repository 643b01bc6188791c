//! Per-tick invalidation pass.
//!
//! Mutations only flag and queue views. [`Scheduler::run_pass`] takes the
//! queue once per tick: restyles the views that asked for it, turns
//! layout-affecting style changes into relayout marks, and runs at most one
//! layout over the root.

use crate::geometry::Size;
use crate::layout::{LayoutEngine, LayoutStats};
use crate::style::stylesheet::Stylesheet;
use crate::view::{DirtyFlags, ViewId, ViewTree};

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    last_viewport: Option<Size>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport used by the last pass that laid out the root.
    pub fn last_viewport(&self) -> Option<Size> {
        self.last_viewport
    }

    /// Run one pass if anything is queued or the viewport changed.
    ///
    /// Marks made while the pass runs (relayouts caused by restyles, redraws
    /// caused by new rects) are handled inside the same pass and do not
    /// schedule another.
    pub fn run_pass(
        &mut self,
        tree: &mut ViewTree,
        sheet: &Stylesheet,
        engine: &mut LayoutEngine,
        viewport: Size,
    ) -> LayoutStats {
        let viewport_changed = self.last_viewport != Some(viewport);
        if !tree.has_pending() && !viewport_changed {
            return LayoutStats::default();
        }

        let pending = tree.take_pending();
        let restyled = restyle(tree, sheet, &pending);

        let mut stats = LayoutStats::default();
        if let Some(root) = tree.root() {
            let root_dirty = tree.get(root).is_some_and(|data| {
                data.dirty().intersects(DirtyFlags::NEEDS_RELAYOUT | DirtyFlags::DESCENDANT_NEEDS_RELAYOUT)
            });
            if root_dirty || viewport_changed {
                stats = engine.layout(tree, root, viewport);
                self.last_viewport = Some(viewport);
            }
        }

        // Everything queued during the pass has been handled by it.
        tree.take_pending();

        stats.passes = 1;
        stats.restyled = restyled;
        tracing::debug!(
            queued = pending.len(),
            restyled = stats.restyled,
            measured = stats.measured,
            placed = stats.placed,
            "pass complete"
        );
        stats
    }
}

/// Recompute the applied style of every queued view flagged for restyle.
/// Returns how many were recomputed.
fn restyle(tree: &mut ViewTree, sheet: &Stylesheet, pending: &[ViewId]) -> usize {
    let mut count = 0;
    for &id in pending {
        let needs_restyle = tree.get(id).is_some_and(|data| data.dirty().contains(DirtyFlags::NEEDS_RESTYLE));
        if !needs_restyle {
            continue;
        }

        let applied = sheet.resolve(id, tree);
        count += 1;

        let Some(data) = tree.get_mut(id) else { continue };
        data.dirty.remove(DirtyFlags::NEEDS_RESTYLE);
        if data.applied == applied {
            continue;
        }

        let layout_changed = data.applied.layout_differs(&applied);
        data.style = applied.compute();
        data.applied = applied;
        data.dirty |= DirtyFlags::NEEDS_REDRAW;

        if layout_changed {
            tracing::debug!(view = ?id, "restyle changed layout");
            tree.mark_relayout(id);
        }
    }
    count
}
