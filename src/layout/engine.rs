//! Two-pass layout over the view tree.
//!
//! [`LayoutEngine::layout`] first measures (bottom-up, cached) and then
//! positions (top-down). A subtree is re-arranged only when its assigned
//! size changed or it is flagged [`DirtyFlags::NEEDS_RELAYOUT`]; a view
//! flagged [`DirtyFlags::DESCENDANT_NEEDS_RELAYOUT`] keeps its children where
//! they are and only descends to find the dirty one.

use crate::geometry::{Point, Rect, Size};
use crate::layout::grid::{self, Tracks};
use crate::layout::resolve::{Arrangement, LayoutParams};
use crate::layout::{linear, stacked, Axis, Layout};
use crate::style::metric::MetricContext;
use crate::view::{DirtyFlags, ViewId, ViewTree};

/// Counters for one scheduler pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Passes run (0 or 1 per tick).
    pub passes: u32,
    /// Views whose applied style was recomputed.
    pub restyled: usize,
    /// Views whose preferred size was recomputed.
    pub measured: usize,
    /// Views that received a rect.
    pub placed: usize,
}

#[derive(Debug, Clone)]
pub struct LayoutEngine {
    pub(crate) metrics: MetricContext,
    pub(crate) stats: LayoutStats,
}

impl LayoutEngine {
    pub fn new(metrics: MetricContext) -> Self {
        Self { metrics, stats: LayoutStats::default() }
    }

    pub fn metrics(&self) -> &MetricContext {
        &self.metrics
    }

    /// Change the DPI scale. Every cached size becomes stale, so the caller
    /// must also mark the tree for relayout.
    pub fn set_metrics(&mut self, metrics: MetricContext) {
        self.metrics = metrics;
    }

    /// Lay out `container`'s subtree into `available`, keeping its position.
    ///
    /// Returns the measure/place counters for this call.
    pub fn layout(&mut self, tree: &mut ViewTree, container: ViewId, available: Size) -> LayoutStats {
        self.stats = LayoutStats::default();
        let Some(origin) = tree.rect(container).map(Rect::origin) else {
            return self.stats;
        };

        self.preferred_size(tree, container);
        let available = available.non_negative();
        self.place(tree, container, Rect::from_parts(origin, available), available);

        tracing::trace!(measured = self.stats.measured, placed = self.stats.placed, "layout");
        self.stats
    }

    /// Give `id` its rect and re-arrange its children if needed.
    ///
    /// `reference` is the parent's content size, used for percentages.
    fn place(&mut self, tree: &mut ViewTree, id: ViewId, rect: Rect, reference: Size) {
        let Some(data) = tree.get_mut(id) else { return };
        let size_changed = data.rect.size() != rect.size();
        if data.rect != rect {
            data.rect = rect;
            data.dirty |= DirtyFlags::NEEDS_REDRAW;
        }
        let dirty = data.dirty;
        data.dirty.remove(DirtyFlags::NEEDS_RELAYOUT | DirtyFlags::DESCENDANT_NEEDS_RELAYOUT);
        self.stats.placed += 1;

        if size_changed || dirty.contains(DirtyFlags::NEEDS_RELAYOUT) {
            self.arrange(tree, id, rect.size(), reference);
        } else if dirty.contains(DirtyFlags::DESCENDANT_NEEDS_RELAYOUT) {
            let content = self.content_box(tree, id, rect.size(), reference);
            for child in tree.children(id).to_vec() {
                let Some(child_data) = tree.get(child) else { continue };
                if child_data.visibility().is_gone() {
                    continue;
                }
                let current = child_data.rect();
                self.place(tree, child, current, content.size());
            }
        }
    }

    fn content_box(&self, tree: &ViewTree, id: ViewId, size: Size, reference: Size) -> Rect {
        let padding = tree
            .get(id)
            .map(|data| LayoutParams::resolve(data.style(), &self.metrics, Some(reference)).padding)
            .unwrap_or_default();
        Rect::from_parts(Point::ZERO, size).shrink(padding)
    }

    /// Distribute the content box of `id` among its children and place them.
    fn arrange(&mut self, tree: &mut ViewTree, id: ViewId, size: Size, reference: Size) {
        let Some(data) = tree.get(id) else { return };
        let layout = data.layout().unwrap_or(Layout::Stacked);
        let params = LayoutParams::resolve(data.style(), &self.metrics, Some(reference));
        let content = Rect::from_parts(Point::ZERO, size).shrink(params.padding);

        for child in tree.children(id).to_vec() {
            self.collapse_if_gone(tree, child);
        }

        let items = self.measured_items(tree, id, Some(content.size()));
        let Arrangement { placements, overflow } = match layout {
            Layout::Vertical => linear::arrange(Axis::Vertical, content, &items, params.spacing),
            Layout::Horizontal => linear::arrange(Axis::Horizontal, content, &items, params.spacing),
            Layout::Stacked => stacked::arrange(content, &items),
            Layout::Grid { columns } => grid::arrange(columns, Tracks::Uniform, content, &items, params.spacing),
            Layout::AdvancedGrid { columns } => {
                grid::arrange(columns, Tracks::PerTrack, content, &items, params.spacing)
            }
        };

        if let Some(data) = tree.get_mut(id) {
            if data.overflow != overflow && overflow != Size::ZERO {
                tracing::trace!(view = ?id, ?overflow, "children overflow content box");
            }
            data.overflow = overflow;
        }

        for (child, rect) in placements {
            self.place(tree, child, rect.non_negative_size(), content.size());
        }
    }

    /// GONE views keep their position but get no size and no work.
    fn collapse_if_gone(&mut self, tree: &mut ViewTree, id: ViewId) {
        let Some(data) = tree.get_mut(id) else { return };
        if data.visibility().is_gone() {
            data.rect = Rect::from_parts(data.rect.origin(), Size::ZERO);
            data.dirty.remove(DirtyFlags::NEEDS_RELAYOUT | DirtyFlags::DESCENDANT_NEEDS_RELAYOUT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::declaration::Declaration;
    use crate::style::metric::{Metric, MetricBox, SizeMetric};
    use crate::view::{ViewBuilder, Visibility};
    use pretty_assertions::assert_eq;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(MetricContext::default())
    }

    fn rects(tree: &ViewTree, ids: &[ViewId]) -> Vec<Rect> {
        ids.iter().filter_map(|&id| tree.rect(id)).collect()
    }

    #[test]
    fn root_takes_available_size() {
        let mut tree = ViewTree::new();
        let root = tree.insert(ViewBuilder::new("Window").with_layout(Layout::Vertical).build());
        engine().layout(&mut tree, root, Size::new(320, 240));
        assert_eq!(tree.rect(root), Some(Rect::new(0, 0, 320, 240)));
    }

    #[test]
    fn row_with_one_fixed_and_two_expanding() {
        let mut tree = ViewTree::new();
        let row = tree.insert(ViewBuilder::new("Row").with_layout(Layout::Horizontal).build());
        let a = tree.insert_child(
            row,
            ViewBuilder::new("A")
                .with_style(Declaration::FixedSize(SizeMetric::width(Metric::px(100.0))))
                .build(),
        );
        let b = tree.insert_child(row, ViewBuilder::new("B").with_expanding(1, 0).build());
        let c = tree.insert_child(row, ViewBuilder::new("C").with_expanding(1, 0).build());

        engine().layout(&mut tree, row, Size::new(300, 40));
        assert_eq!(
            rects(&tree, &[a, b, c]),
            vec![Rect::new(0, 0, 100, 40), Rect::new(100, 0, 100, 40), Rect::new(200, 0, 100, 40)]
        );
    }

    #[test]
    fn padding_offsets_children() {
        let mut tree = ViewTree::new();
        let column = tree.insert(
            ViewBuilder::new("Column")
                .with_layout(Layout::Vertical)
                .with_style(Declaration::Padding(MetricBox::all(Metric::px(10.0))))
                .build(),
        );
        let child = tree.insert_child(column, ViewBuilder::new("Label").with_content_size(20, 5).build());
        engine().layout(&mut tree, column, Size::new(100, 100));
        assert_eq!(tree.rect(child), Some(Rect::new(10, 10, 80, 5)));
    }

    #[test]
    fn percentage_resolves_against_parent_content() {
        let mut tree = ViewTree::new();
        let row = tree.insert(ViewBuilder::new("Row").with_layout(Layout::Horizontal).build());
        let half = tree.insert_child(
            row,
            ViewBuilder::new("Half")
                .with_style(Declaration::FixedSize(SizeMetric::width(Metric::percent(50.0))))
                .build(),
        );
        engine().layout(&mut tree, row, Size::new(200, 10));
        assert_eq!(tree.rect(half).map(|r| r.width), Some(100));
    }

    #[test]
    fn gone_child_takes_no_space() {
        let mut tree = ViewTree::new();
        let column = tree.insert(
            ViewBuilder::new("Column")
                .with_layout(Layout::Vertical)
                .with_style(Declaration::LayoutSpacing(Metric::px(4.0)))
                .build(),
        );
        let a = tree.insert_child(column, ViewBuilder::new("A").with_content_size(10, 10).build());
        let gone = tree.insert_child(
            column,
            ViewBuilder::new("B").with_content_size(10, 10).with_visibility(Visibility::Gone).build(),
        );
        let c = tree.insert_child(column, ViewBuilder::new("C").with_content_size(10, 10).build());

        engine().layout(&mut tree, column, Size::new(50, 100));
        assert_eq!(tree.rect(a).map(|r| r.y), Some(0));
        assert_eq!(tree.rect(c).map(|r| r.y), Some(14));
        assert_eq!(tree.rect(gone).map(|r| r.size()), Some(Size::ZERO));
    }

    #[test]
    fn second_run_does_no_work_and_changes_nothing() {
        let mut tree = ViewTree::new();
        let root = tree.insert(ViewBuilder::new("Root").with_layout(Layout::Vertical).build());
        let ids: Vec<ViewId> = (0..3)
            .map(|_| tree.insert_child(root, ViewBuilder::new("Item").with_content_size(10, 10).build()))
            .collect();
        let mut engine = engine();
        engine.layout(&mut tree, root, Size::new(100, 100));
        let before = rects(&tree, &ids);

        let stats = engine.layout(&mut tree, root, Size::new(100, 100));
        assert_eq!(rects(&tree, &ids), before);
        assert_eq!(stats.measured, 0);
        assert_eq!(stats.placed, 1);
    }

    #[test]
    fn dirty_leaf_only_reflows_its_branch() {
        let mut tree = ViewTree::new();
        let root = tree.insert(ViewBuilder::new("Root").with_layout(Layout::Horizontal).build());
        let left = tree.insert_child(
            root,
            ViewBuilder::new("Left")
                .with_layout(Layout::Vertical)
                .with_style(Declaration::FixedSize(SizeMetric::both(Metric::px(50.0))))
                .build(),
        );
        let leaf = tree.insert_child(left, ViewBuilder::new("Leaf").with_content_size(10, 10).build());
        let right = tree.insert_child(root, ViewBuilder::new("Right").with_content_size(10, 10).build());
        let mut engine = engine();
        engine.layout(&mut tree, root, Size::new(200, 100));

        tree.set_content_size(leaf, Size::new(10, 30));
        let stats = engine.layout(&mut tree, root, Size::new(200, 100));
        assert_eq!(tree.rect(leaf).map(|r| r.height), Some(30));
        // Root and right are revisited without re-arranging; left and leaf reflow.
        assert_eq!(stats.placed, 4);
        assert_eq!(stats.measured, 1);
        assert_eq!(tree.rect(right), Some(Rect::new(50, 0, 10, 100)));
    }
}
