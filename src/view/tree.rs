//! The view tree: arena storage, structure edits, and invalidating mutators.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use crate::geometry::{Rect, Size};
use crate::layout::Layout;
use crate::style::declaration::{Declaration, Slot};
use crate::view::builder::ViewConfig;
use crate::view::node::{DirtyFlags, PseudoState, ViewData, ViewId, Visibility};

const EMPTY_CHILDREN: &[ViewId] = &[];

/// Errors from structural edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("view does not exist")]
    UnknownView,
    #[error("cannot move a view into its own subtree")]
    WouldCycle,
}

/// Arena of views with ordered children.
///
/// Views live in a single `SlotMap`; parent and child links are kept in
/// secondary maps. Every mutation that can change style or geometry goes
/// through a method here, which sets the right [`DirtyFlags`] and queues the
/// view for the next scheduler pass.
#[derive(Debug, Clone)]
pub struct ViewTree {
    views: SlotMap<ViewId, ViewData>,
    children: SecondaryMap<ViewId, Vec<ViewId>>,
    parent: SecondaryMap<ViewId, ViewId>,
    root: Option<ViewId>,
    pending: Vec<ViewId>,
    queued: SecondaryMap<ViewId, ()>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self {
            views: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
            pending: Vec::new(),
            queued: SecondaryMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    /// Insert a view with no parent. The first such view becomes the root.
    pub fn insert(&mut self, config: ViewConfig) -> ViewId {
        let id = self.views.insert(ViewData::from_config(config));
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        self.enqueue(id);
        id
    }

    /// Append a view to `parent`'s children.
    ///
    /// An unknown parent is a caller bug; the view is then inserted detached.
    pub fn insert_child(&mut self, parent: ViewId, config: ViewConfig) -> ViewId {
        let id = self.views.insert(ViewData::from_config(config));
        self.children.insert(id, Vec::new());
        self.enqueue(id);

        match self.children.get_mut(parent) {
            Some(siblings) => {
                siblings.push(id);
                self.parent.insert(id, parent);
                self.mark_relayout(parent);
            }
            None => {
                debug_assert!(false, "insert_child: parent does not exist");
                tracing::error!(?parent, "insert_child on unknown parent, view left detached");
            }
        }
        id
    }

    /// Remove a view and its whole subtree. Returns the removed view's data.
    ///
    /// Handles to removed views never resolve again.
    pub fn remove(&mut self, id: ViewId) -> Option<ViewData> {
        if !self.views.contains_key(id) {
            return None;
        }

        if let Some(parent) = self.detach(id) {
            self.mark_relayout(parent);
        }
        if self.root == Some(id) {
            self.root = None;
        }

        let mut to_remove = VecDeque::from([id]);
        let mut removed = None;
        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            self.queued.remove(current);
            let data = self.views.remove(current);
            if current == id {
                removed = data;
            }
        }
        removed
    }

    /// Move `id` (with its subtree) to the end of `new_parent`'s children.
    pub fn reparent(&mut self, id: ViewId, new_parent: ViewId) -> Result<(), TreeError> {
        if !self.views.contains_key(id) || !self.views.contains_key(new_parent) {
            return Err(TreeError::UnknownView);
        }
        if id == new_parent || self.ancestors(new_parent).contains(&id) {
            return Err(TreeError::WouldCycle);
        }

        if let Some(old_parent) = self.detach(id) {
            self.mark_relayout(old_parent);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        self.parent.insert(id, new_parent);
        if let Some(siblings) = self.children.get_mut(new_parent) {
            siblings.push(id);
        }

        // Descendant selectors may now match differently.
        self.mark_restyle_subtree(id);
        self.mark_relayout(id);
        Ok(())
    }

    fn detach(&mut self, id: ViewId) -> Option<ViewId> {
        let parent = self.parent.remove(id)?;
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.retain(|&child| child != id);
        }
        Some(parent)
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.parent.get(id).copied()
    }

    /// Children in insertion (and paint) order.
    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(EMPTY_CHILDREN)
    }

    /// Parent first, root last; excludes `id` itself.
    pub fn ancestors(&self, id: ViewId) -> Vec<ViewId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewData> {
        self.views.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewData> {
        self.views.get_mut(id)
    }

    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    pub fn set_root(&mut self, id: ViewId) {
        self.root = Some(id);
        self.mark_relayout(id);
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    /// Pre-order traversal starting at `start`.
    pub fn walk_depth_first(&self, start: ViewId) -> Vec<ViewId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.views.contains_key(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        result
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (ViewId, &ViewData)> {
        self.views.iter()
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// Rect relative to the parent, as of the last layout pass.
    pub fn rect(&self, id: ViewId) -> Option<Rect> {
        self.views.get(id).map(|data| data.rect)
    }

    /// Rect in surface coordinates.
    pub fn absolute_rect(&self, id: ViewId) -> Option<Rect> {
        let rect = self.rect(id)?;
        let offset = self
            .ancestors(id)
            .into_iter()
            .filter_map(|a| self.rect(a))
            .fold(rect.origin(), |acc, r| acc + r.origin());
        Some(Rect::from_parts(offset, rect.size()))
    }

    // -----------------------------------------------------------------------
    // Invalidating mutators
    // -----------------------------------------------------------------------

    /// Set or clear a pseudo-state flag. Returns whether anything changed.
    pub fn set_state(&mut self, id: ViewId, flag: PseudoState, on: bool) -> bool {
        let Some(data) = self.views.get_mut(id) else { return false };
        let before = data.state;
        data.state.set(flag, on);
        if data.state == before {
            return false;
        }
        self.mark_restyle_subtree(id);
        true
    }

    pub fn add_class(&mut self, id: ViewId, class: &str) -> bool {
        let Some(data) = self.views.get_mut(id) else { return false };
        if data.has_class(class) {
            return false;
        }
        data.classes.push(class.to_string());
        self.mark_restyle_subtree(id);
        true
    }

    pub fn remove_class(&mut self, id: ViewId, class: &str) -> bool {
        let Some(data) = self.views.get_mut(id) else { return false };
        let before = data.classes.len();
        data.classes.retain(|c| c != class);
        if data.classes.len() == before {
            return false;
        }
        self.mark_restyle_subtree(id);
        true
    }

    /// Replace the whole class list.
    pub fn set_classes<I, S>(&mut self, id: ViewId, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(data) = self.views.get_mut(id) else { return };
        let mut next: Vec<String> = Vec::new();
        for class in classes {
            let class = class.into();
            if !next.contains(&class) {
                next.push(class);
            }
        }
        if next != data.classes {
            data.classes = next;
            self.mark_restyle_subtree(id);
        }
    }

    /// Change visibility. Entering or leaving GONE relayouts the parent chain;
    /// toggling between VISIBLE and INVISIBLE only needs a redraw.
    pub fn set_visibility(&mut self, id: ViewId, visibility: Visibility) {
        let Some(data) = self.views.get_mut(id) else { return };
        let before = data.visibility;
        if before == visibility {
            return;
        }
        data.visibility = visibility;
        if visibility.is_gone() {
            data.rect = Rect::from_parts(data.rect.origin(), Size::ZERO);
        }

        if before.is_gone() || visibility.is_gone() {
            self.mark_relayout(id);
        }
        self.mark_redraw(id);
    }

    /// Update the intrinsic content size reported by a widget.
    pub fn set_content_size(&mut self, id: ViewId, size: Size) {
        let Some(data) = self.views.get_mut(id) else { return };
        if data.content_size != size {
            data.content_size = size;
            self.mark_relayout(id);
        }
    }

    /// Replace the inline declarations.
    pub fn set_inline_style(&mut self, id: ViewId, declarations: Vec<Declaration>) {
        let Some(data) = self.views.get_mut(id) else { return };
        if data.inline_style != declarations {
            data.inline_style = declarations;
            self.mark_restyle(id);
        }
    }

    /// Set or replace a single inline declaration, keyed by slot.
    pub fn set_inline_declaration(&mut self, id: ViewId, declaration: Declaration) {
        let Some(data) = self.views.get(id) else { return };
        let slot = declaration.slot();
        let mut next: Vec<Declaration> =
            data.inline_style.iter().filter(|d| d.slot() != slot).cloned().collect();
        next.push(declaration);
        self.set_inline_style(id, next);
    }

    /// Expansion weights, kept as an inline declaration.
    pub fn set_expanding(&mut self, id: ViewId, horizontal: u32, vertical: u32) {
        self.set_inline_declaration(id, Declaration::Expanding { horizontal, vertical });
    }

    /// Drop the inline declaration for `slot`, if any.
    pub fn clear_inline_slot(&mut self, id: ViewId, slot: Slot) {
        let Some(data) = self.views.get(id) else { return };
        let next: Vec<Declaration> =
            data.inline_style.iter().filter(|d| d.slot() != slot).cloned().collect();
        self.set_inline_style(id, next);
    }

    pub fn set_layout(&mut self, id: ViewId, layout: Option<Layout>) {
        let Some(data) = self.views.get_mut(id) else { return };
        if data.layout != layout {
            data.layout = layout;
            self.mark_relayout(id);
        }
    }

    /// Pin to a grid cell, or `None` to auto-flow.
    pub fn set_cell(&mut self, id: ViewId, cell: Option<(u32, u32)>) {
        let Some(data) = self.views.get_mut(id) else { return };
        if data.cell != cell {
            data.cell = cell;
            self.mark_relayout(id);
        }
    }

    // -----------------------------------------------------------------------
    // Dirty tracking
    // -----------------------------------------------------------------------

    fn enqueue(&mut self, id: ViewId) {
        if self.queued.insert(id, ()).is_none() {
            self.pending.push(id);
        }
    }

    /// Flag `id` for restyle.
    pub fn mark_restyle(&mut self, id: ViewId) {
        if let Some(data) = self.views.get_mut(id) {
            data.dirty |= DirtyFlags::NEEDS_RESTYLE;
            self.enqueue(id);
        }
    }

    /// Flag `id` and every descendant for restyle.
    pub fn mark_restyle_subtree(&mut self, id: ViewId) {
        for view in self.walk_depth_first(id) {
            self.mark_restyle(view);
        }
    }

    /// Flag every view for restyle, e.g. after a stylesheet reload.
    pub fn restyle_all(&mut self) {
        let ids: Vec<ViewId> = self.views.keys().collect();
        for id in ids {
            self.mark_restyle(id);
        }
    }

    /// Flag `id` for relayout and propagate upward.
    ///
    /// The view and its ancestors lose their cached preferred size up to and
    /// including the first ancestor whose size is fixed on both axes. Views
    /// above that one only get [`DirtyFlags::DESCENDANT_NEEDS_RELAYOUT`].
    pub fn mark_relayout(&mut self, id: ViewId) {
        let Some(data) = self.views.get_mut(id) else { return };
        data.dirty |= DirtyFlags::NEEDS_RELAYOUT;
        data.preferred = None;
        self.enqueue(id);

        let mut contained = false;
        let mut current = id;
        while let Some(parent) = self.parent.get(current).copied() {
            let Some(data) = self.views.get_mut(parent) else { break };
            if contained {
                if data.dirty.contains(DirtyFlags::DESCENDANT_NEEDS_RELAYOUT) {
                    break;
                }
                data.dirty |= DirtyFlags::DESCENDANT_NEEDS_RELAYOUT;
            } else {
                data.dirty |= DirtyFlags::NEEDS_RELAYOUT;
                data.preferred = None;
                contained = data.style.is_fixed_both_axes();
            }
            current = parent;
        }
    }

    /// Flag `id` for repaint only.
    pub fn mark_redraw(&mut self, id: ViewId) {
        if let Some(data) = self.views.get_mut(id) {
            data.dirty |= DirtyFlags::NEEDS_REDRAW;
            self.enqueue(id);
        }
    }

    /// Whether any view was queued since the last pass.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drain the queue of views marked since the last call.
    pub fn take_pending(&mut self) -> Vec<ViewId> {
        self.queued.clear();
        let mut pending = std::mem::take(&mut self.pending);
        pending.retain(|&id| self.views.contains_key(id));
        pending
    }

    /// Views that need repainting, clearing their redraw flag.
    pub fn take_redraw(&mut self) -> Vec<ViewId> {
        let mut result = Vec::new();
        for (id, data) in self.views.iter_mut() {
            if data.dirty.contains(DirtyFlags::NEEDS_REDRAW) {
                data.dirty.remove(DirtyFlags::NEEDS_REDRAW);
                result.push(id);
            }
        }
        result
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}
