//! Stacked layout: every child shares the same content box.

use crate::geometry::{Point, Rect, Size};
use crate::layout::resolve::{Arrangement, LayoutItem};
use crate::layout::Axis;

pub fn content_minimum(items: &[LayoutItem]) -> Size {
    items.iter().fold(Size::ZERO, |acc, item| acc.max(item.outer()))
}

/// On an axis with a positive weight the child fills the box minus margins;
/// otherwise it keeps its preferred size and is centered. A child larger than
/// the box starts at its leading margin and overflows the trailing edge.
pub fn arrange(content: Rect, items: &[LayoutItem]) -> Arrangement {
    let mut placements = Vec::with_capacity(items.len());
    let mut overflow = Size::ZERO;

    for item in items {
        let (x, width, over_x) = place_axis(Axis::Horizontal, content, item);
        let (y, height, over_y) = place_axis(Axis::Vertical, content, item);
        placements.push((item.id, Rect::from_parts(Point::new(x, y), Size::new(width, height))));
        overflow = overflow.max(Size::new(over_x, over_y));
    }

    Arrangement { placements, overflow }
}

/// `(position, size, overflow)` along `axis`.
fn place_axis(axis: Axis, content: Rect, item: &LayoutItem) -> (i32, i32, i32) {
    let available = axis.main(content.size());
    let (lead, trail) = axis.margins(item.params.margin);
    let preferred = axis.main(item.preferred);
    let inner = available - lead - trail;

    let (offset, size) = if item.params.weight(axis) > 0 {
        (lead, inner.min(item.params.max_on(axis)).max(preferred))
    } else {
        (lead + ((inner - preferred) / 2).max(0), preferred)
    };

    let overflow = (size - inner).max(0);
    (axis.start(content) + offset, size, overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxFields;
    use crate::layout::resolve::LayoutParams;
    use crate::view::{ViewBuilder, ViewTree};

    fn item(tree: &mut ViewTree, width: i32, height: i32, expanding: (u32, u32)) -> LayoutItem {
        LayoutItem {
            id: tree.insert(ViewBuilder::new("V").build()),
            preferred: Size::new(width, height),
            params: LayoutParams { expanding, ..LayoutParams::default() },
            cell: None,
        }
    }

    #[test]
    fn unweighted_child_is_centered() {
        let mut tree = ViewTree::new();
        let child = item(&mut tree, 20, 10, (0, 0));
        let result = arrange(Rect::new(0, 0, 100, 50), &[child]);
        assert_eq!(result.placements[0].1, Rect::new(40, 20, 20, 10));
    }

    #[test]
    fn weighted_axis_fills() {
        let mut tree = ViewTree::new();
        let mut child = item(&mut tree, 20, 10, (1, 0));
        child.params.margin = BoxFields::all(5);
        let result = arrange(Rect::new(10, 10, 100, 50), &[child]);
        assert_eq!(result.placements[0].1, Rect::new(15, 30, 90, 10));
    }

    #[test]
    fn minimum_is_largest_child() {
        let mut tree = ViewTree::new();
        let a = item(&mut tree, 20, 5, (0, 0));
        let b = item(&mut tree, 10, 30, (0, 0));
        assert_eq!(content_minimum(&[a, b]), Size::new(20, 30));
        assert_eq!(content_minimum(&[]), Size::ZERO);
    }

    #[test]
    fn oversized_child_overflows() {
        let mut tree = ViewTree::new();
        let child = item(&mut tree, 120, 10, (0, 0));
        let result = arrange(Rect::new(0, 0, 100, 50), &[child]);
        assert_eq!(result.overflow, Size::new(20, 0));
        assert_eq!(result.placements[0].1, Rect::new(0, 20, 120, 10));
    }

    #[test]
    fn oversized_child_keeps_leading_margin() {
        let mut tree = ViewTree::new();
        let mut child = item(&mut tree, 30, 80, (0, 0));
        child.params.margin = BoxFields::all(4);
        let result = arrange(Rect::new(10, 10, 50, 50), &[child]);
        assert_eq!(result.placements[0].1, Rect::new(20, 14, 30, 80));
        assert_eq!(result.overflow, Size::new(0, 38));
    }
}
