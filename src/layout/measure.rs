//! Measure pass: bottom-up preferred sizes, cached on each view.

use crate::geometry::Size;
use crate::layout::grid::{self, Tracks};
use crate::layout::resolve::{LayoutItem, LayoutParams};
use crate::layout::{linear, stacked, Axis, Layout, LayoutEngine};
use crate::view::{ViewId, ViewTree};

impl LayoutEngine {
    /// Preferred border-box size of `id`, computing and caching it if needed.
    ///
    /// A fixed size on an axis wins; otherwise the size is the content size
    /// plus padding, clamped to the view's min and max. GONE views measure as
    /// zero. Percentages are left out here and applied by the parent when it
    /// positions the view.
    pub fn preferred_size(&mut self, tree: &mut ViewTree, id: ViewId) -> Size {
        let Some(data) = tree.get(id) else { return Size::ZERO };
        if data.visibility().is_gone() {
            return Size::ZERO;
        }
        if let Some(preferred) = data.preferred {
            return preferred;
        }

        let params = LayoutParams::resolve(data.style(), &self.metrics, None);
        let layout = data.layout();
        let intrinsic = data.content_size();

        let content = match layout {
            Some(layout) => {
                let items = self.measured_items(tree, id, None);
                layout_minimum(layout, &items, params.spacing)
            }
            None => intrinsic,
        };
        let content = checked_content(id, content);
        let preferred = params.preferred_from(content + params.padding.total());

        if let Some(data) = tree.get_mut(id) {
            data.preferred = Some(preferred);
        }
        self.stats.measured += 1;
        preferred
    }

    /// The non-GONE children of `id` as layout items.
    ///
    /// With a `reference` (the parent's content size) percentages are resolved
    /// and fixed sizes and limits are reapplied on top of the cached preference.
    pub(crate) fn measured_items(&mut self, tree: &mut ViewTree, id: ViewId, reference: Option<Size>) -> Vec<LayoutItem> {
        let children = tree.children(id).to_vec();
        let mut items = Vec::with_capacity(children.len());

        for child in children {
            let preferred = self.preferred_size(tree, child);
            let Some(data) = tree.get(child) else { continue };
            if data.visibility().is_gone() {
                continue;
            }
            let params = LayoutParams::resolve(data.style(), &self.metrics, reference);
            let preferred = match reference {
                Some(_) => Size::new(
                    params.fixed.0.unwrap_or_else(|| params.clamp_on(Axis::Horizontal, preferred.width)),
                    params.fixed.1.unwrap_or_else(|| params.clamp_on(Axis::Vertical, preferred.height)),
                ),
                None => preferred,
            };
            items.push(LayoutItem { id: child, preferred, params, cell: data.cell() });
        }
        items
    }
}

/// Smallest content box that holds `items` under `layout`.
pub fn layout_minimum(layout: Layout, items: &[LayoutItem], spacing: i32) -> Size {
    match layout {
        Layout::Vertical => linear::content_minimum(Axis::Vertical, items, spacing),
        Layout::Horizontal => linear::content_minimum(Axis::Horizontal, items, spacing),
        Layout::Stacked => stacked::content_minimum(items),
        Layout::Grid { columns } => grid::content_minimum(columns, Tracks::Uniform, items, spacing),
        Layout::AdvancedGrid { columns } => grid::content_minimum(columns, Tracks::PerTrack, items, spacing),
    }
}

/// Negative content sizes are a widget bug: assert in debug, clamp otherwise.
fn checked_content(id: ViewId, content: Size) -> Size {
    if content.is_negative() {
        debug_assert!(false, "view {id:?} reported negative content size {content:?}");
        tracing::error!(view = ?id, ?content, "negative content size clamped to zero");
        return content.non_negative();
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::declaration::Declaration;
    use crate::style::metric::{Metric, MetricBox, MetricContext, SizeMetric};
    use crate::view::{ViewBuilder, Visibility};
    use pretty_assertions::assert_eq;

    fn engine() -> LayoutEngine {
        LayoutEngine::new(MetricContext::default())
    }

    #[test]
    fn leaf_is_content_plus_padding() {
        let mut tree = ViewTree::new();
        let leaf = tree.insert(
            ViewBuilder::new("Label")
                .with_content_size(40, 12)
                .with_style(Declaration::Padding(MetricBox::symmetric(Metric::px(2.0), Metric::px(4.0))))
                .build(),
        );
        assert_eq!(engine().preferred_size(&mut tree, leaf), Size::new(48, 16));
    }

    #[test]
    fn fixed_min_and_max() {
        let mut tree = ViewTree::new();
        let leaf = tree.insert(
            ViewBuilder::new("Icon")
                .with_content_size(100, 2)
                .with_style(Declaration::MaxSize(SizeMetric::width(Metric::px(60.0))))
                .with_style(Declaration::MinSize(SizeMetric::height(Metric::px(10.0))))
                .build(),
        );
        let fixed = tree.insert(
            ViewBuilder::new("Icon")
                .with_content_size(100, 2)
                .with_style(Declaration::FixedSize(SizeMetric::both(Metric::dp(16.0))))
                .build(),
        );
        let mut engine = engine();
        assert_eq!(engine.preferred_size(&mut tree, leaf), Size::new(60, 10));
        assert_eq!(engine.preferred_size(&mut tree, fixed), Size::new(16, 16));
    }

    #[test]
    fn container_sums_children_and_skips_gone() {
        let mut tree = ViewTree::new();
        let column = tree.insert(
            ViewBuilder::new("Column")
                .with_layout(Layout::Vertical)
                .with_style(Declaration::LayoutSpacing(Metric::px(5.0)))
                .build(),
        );
        tree.insert_child(column, ViewBuilder::new("A").with_content_size(10, 10).build());
        tree.insert_child(
            column,
            ViewBuilder::new("B").with_content_size(99, 99).with_visibility(Visibility::Gone).build(),
        );
        tree.insert_child(column, ViewBuilder::new("C").with_content_size(30, 10).build());
        assert_eq!(engine().preferred_size(&mut tree, column), Size::new(30, 25));
    }

    #[test]
    fn empty_container_collapses() {
        let mut tree = ViewTree::new();
        let row = tree.insert(ViewBuilder::new("Row").with_layout(Layout::Horizontal).build());
        assert_eq!(engine().preferred_size(&mut tree, row), Size::ZERO);
    }

    #[test]
    fn result_is_cached() {
        let mut tree = ViewTree::new();
        let leaf = tree.insert(ViewBuilder::new("Label").with_content_size(5, 5).build());
        let mut engine = engine();
        engine.preferred_size(&mut tree, leaf);
        engine.preferred_size(&mut tree, leaf);
        assert_eq!(engine.stats.measured, 1);
    }

    #[test]
    fn percentage_size_is_deferred() {
        let mut tree = ViewTree::new();
        let leaf = tree.insert(
            ViewBuilder::new("Half")
                .with_content_size(8, 8)
                .with_style(Declaration::FixedSize(SizeMetric::width(Metric::percent(50.0))))
                .build(),
        );
        assert_eq!(engine().preferred_size(&mut tree, leaf), Size::new(8, 8));
    }
}
