//! Hit testing over laid-out views.
//!
//! [`SpatialMap`] keeps absolute rects in paint order (later entries are in
//! front). [`PointerTracker`] uses it to keep the `hover` pseudo-state of the
//! views under the pointer up to date.

use crate::geometry::{Point, Rect};
use crate::view::{PseudoState, ViewId, ViewTree, Visibility};

/// Absolute rects of visible views, back to front.
#[derive(Debug, Clone, Default)]
pub struct SpatialMap {
    entries: Vec<(ViewId, Rect)>,
}

impl SpatialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the tree under `root`.
    ///
    /// INVISIBLE and GONE views are left out together with their subtrees.
    pub fn rebuild(&mut self, tree: &ViewTree, root: ViewId) {
        self.entries.clear();
        self.collect(tree, root, Point::ZERO);
    }

    fn collect(&mut self, tree: &ViewTree, id: ViewId, offset: Point) {
        let Some(data) = tree.get(id) else { return };
        if data.visibility() != Visibility::Visible {
            return;
        }
        let rect = data.rect().translate(offset);
        self.entries.push((id, rect));
        for &child in tree.children(id) {
            self.collect(tree, child, rect.origin());
        }
    }

    /// Views containing `point`, frontmost first.
    pub fn hit_test(&self, point: Point) -> Vec<ViewId> {
        self.entries
            .iter()
            .rev()
            .filter(|(_, rect)| rect.contains(point))
            .map(|(id, _)| *id)
            .collect()
    }

    /// The frontmost view containing `point`.
    pub fn view_at(&self, point: Point) -> Option<ViewId> {
        self.entries.iter().rev().find(|(_, rect)| rect.contains(point)).map(|(id, _)| *id)
    }

    /// Views overlapping `region`, frontmost first.
    pub fn views_in(&self, region: Rect) -> Vec<ViewId> {
        self.entries
            .iter()
            .rev()
            .filter(|(_, rect)| rect.overlaps(region))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn rect_of(&self, id: ViewId) -> Option<Rect> {
        self.entries.iter().find(|(view, _)| *view == id).map(|(_, rect)| *rect)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tracks which views are hovered and flips their `HOVER` state.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    hovered: Vec<ViewId>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hovered chain, innermost first.
    pub fn hovered(&self) -> &[ViewId] {
        &self.hovered
    }

    /// The pointer moved to `point`. The frontmost view under it and all its
    /// ancestors become hovered; everything else stops being hovered.
    pub fn pointer_moved(&mut self, tree: &mut ViewTree, map: &SpatialMap, point: Point) {
        let next = match map.view_at(point) {
            Some(target) => {
                let mut chain = vec![target];
                chain.extend(tree.ancestors(target));
                chain
            }
            None => Vec::new(),
        };
        self.apply(tree, next);
    }

    /// The pointer left the surface.
    pub fn pointer_left(&mut self, tree: &mut ViewTree) {
        self.apply(tree, Vec::new());
    }

    fn apply(&mut self, tree: &mut ViewTree, next: Vec<ViewId>) {
        for &id in &self.hovered {
            if !next.contains(&id) {
                tree.set_state(id, PseudoState::HOVER, false);
            }
        }
        for &id in &next {
            if !self.hovered.contains(&id) {
                tree.set_state(id, PseudoState::HOVER, true);
            }
        }
        self.hovered = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewBuilder;

    /// ```text
    ///   root  (0,0 100x100)
    ///    ├─ back  (10,10 50x50)
    ///    │   └─ inner (5,5 10x10)    → absolute (15,15)
    ///    └─ front (30,30 50x50)
    /// ```
    fn placed_tree() -> (ViewTree, [ViewId; 4]) {
        let mut tree = ViewTree::new();
        let root = tree.insert(ViewBuilder::new("Root").build());
        let back = tree.insert_child(root, ViewBuilder::new("Back").build());
        let inner = tree.insert_child(back, ViewBuilder::new("Inner").build());
        let front = tree.insert_child(root, ViewBuilder::new("Front").build());
        for (id, rect) in [
            (root, Rect::new(0, 0, 100, 100)),
            (back, Rect::new(10, 10, 50, 50)),
            (inner, Rect::new(5, 5, 10, 10)),
            (front, Rect::new(30, 30, 50, 50)),
        ] {
            if let Some(data) = tree.get_mut(id) {
                data.rect = rect;
            }
        }
        (tree, [root, back, inner, front])
    }

    #[test]
    fn rebuild_uses_absolute_rects() {
        let (tree, [root, _, inner, _]) = placed_tree();
        let mut map = SpatialMap::new();
        map.rebuild(&tree, root);
        assert_eq!(map.len(), 4);
        assert_eq!(map.rect_of(inner), Some(Rect::new(15, 15, 10, 10)));
    }

    #[test]
    fn frontmost_wins() {
        let (tree, [root, back, inner, front]) = placed_tree();
        let mut map = SpatialMap::new();
        map.rebuild(&tree, root);
        assert_eq!(map.view_at(Point::new(16, 16)), Some(inner));
        assert_eq!(map.view_at(Point::new(40, 40)), Some(front));
        assert_eq!(map.hit_test(Point::new(40, 40)), vec![front, back, root]);
        assert_eq!(map.view_at(Point::new(100, 100)), None);
        assert_eq!(map.views_in(Rect::new(0, 0, 12, 12)), vec![back, root]);
    }

    #[test]
    fn invisible_subtrees_are_not_hittable() {
        let (mut tree, [root, back, inner, _]) = placed_tree();
        tree.set_visibility(back, Visibility::Invisible);
        let mut map = SpatialMap::new();
        map.rebuild(&tree, root);
        assert_eq!(map.view_at(Point::new(16, 16)), Some(root));
        assert!(map.rect_of(inner).is_none());
    }

    #[test]
    fn hover_follows_pointer() {
        let (mut tree, [root, back, inner, front]) = placed_tree();
        let mut map = SpatialMap::new();
        map.rebuild(&tree, root);
        let mut pointer = PointerTracker::new();

        pointer.pointer_moved(&mut tree, &map, Point::new(16, 16));
        assert_eq!(pointer.hovered(), &[inner, back, root]);
        let hovered = |tree: &ViewTree, id| tree.get(id).is_some_and(|d| d.state().contains(PseudoState::HOVER));
        assert!(hovered(&tree, back));
        assert!(!hovered(&tree, front));

        pointer.pointer_moved(&mut tree, &map, Point::new(70, 70));
        assert!(hovered(&tree, front));
        assert!(!hovered(&tree, inner));
        assert!(hovered(&tree, root));

        pointer.pointer_left(&mut tree);
        assert!(!hovered(&tree, root));
        assert!(pointer.hovered().is_empty());
    }
}
