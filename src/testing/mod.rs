//! Test helpers: a canvas that records draw calls and a textual layout dump.
//!
//! Use [`RecordingCanvas`] with [`crate::render::paint`] to assert on what
//! would be drawn, and [`dump_layout`] for snapshot-style geometry checks.

use std::fmt::Write as _;

use crate::geometry::Rect;
use crate::render::{Edges, RenderContext};
use crate::style::color::Color;
use crate::style::declaration::ImageSizing;
use crate::view::{ViewId, ViewTree, Visibility};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { rect: Rect, color: Color, radius: i32 },
    Stroke { rect: Rect, edges: Edges, width: i32, color: Color, radius: i32 },
    Image { rect: Rect, url: String, sizing: ImageSizing, overlay: Option<Color> },
    PushOpacity(f32),
    PopOpacity,
}

/// A [`RenderContext`] that only records.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded calls, leaving the canvas empty.
    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Rects of every solid fill, in draw order.
    pub fn filled_rects(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl RenderContext for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color, radius: i32) {
        self.ops.push(DrawOp::Fill { rect, color, radius });
    }

    fn stroke_border(&mut self, rect: Rect, edges: Edges, width: i32, color: Color, radius: i32) {
        self.ops.push(DrawOp::Stroke { rect, edges, width, color, radius });
    }

    fn draw_image(&mut self, rect: Rect, url: &str, sizing: ImageSizing, overlay: Option<Color>) {
        self.ops.push(DrawOp::Image { rect, url: url.to_string(), sizing, overlay });
    }

    fn push_opacity(&mut self, opacity: f32) {
        self.ops.push(DrawOp::PushOpacity(opacity));
    }

    fn pop_opacity(&mut self) {
        self.ops.push(DrawOp::PopOpacity);
    }
}

/// Indented listing of the subtree under `root`, one view per line:
///
/// ```text
/// Window#main 0,0 300x200
///   Button.primary 0,0 100x20
///   Label 0,20 0x0 [gone]
/// ```
///
/// Positions are relative to the parent.
pub fn dump_layout(tree: &ViewTree, root: ViewId) -> String {
    let mut out = String::new();
    dump_view(tree, root, 0, &mut out);
    out
}

fn dump_view(tree: &ViewTree, id: ViewId, depth: usize, out: &mut String) {
    let Some(data) = tree.get(id) else { return };
    let rect = data.rect();

    let _ = write!(out, "{:indent$}{}", "", data.type_name, indent = depth * 2);
    if let Some(view_id) = &data.id {
        let _ = write!(out, "#{view_id}");
    }
    for class in data.classes() {
        let _ = write!(out, ".{class}");
    }
    let _ = write!(out, " {},{} {}x{}", rect.x, rect.y, rect.width, rect.height);
    match data.visibility() {
        Visibility::Visible => {}
        Visibility::Invisible => out.push_str(" [invisible]"),
        Visibility::Gone => out.push_str(" [gone]"),
    }
    let overflow = data.overflow();
    if overflow.width > 0 || overflow.height > 0 {
        let _ = write!(out, " overflow={}x{}", overflow.width, overflow.height);
    }
    out.push('\n');

    for &child in tree.children(id) {
        dump_view(tree, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewBuilder;

    #[test]
    fn dump_lists_subtree_with_markers() {
        let mut tree = ViewTree::new();
        let root = tree.insert(ViewBuilder::new("Window").with_id("main").build());
        tree.insert_child(root, ViewBuilder::new("Button").with_class("primary").build());
        tree.insert_child(root, ViewBuilder::new("Label").with_visibility(Visibility::Gone).build());

        let dump = dump_layout(&tree, root);
        assert_eq!(dump, "Window#main 0,0 0x0\n  Button.primary 0,0 0x0\n  Label 0,0 0x0 [gone]\n");
    }

    #[test]
    fn canvas_records_in_order() {
        let mut canvas = RecordingCanvas::new();
        canvas.push_opacity(0.5);
        canvas.fill_rect(Rect::new(0, 0, 1, 1), Color::RED, 0);
        canvas.draw_image(Rect::new(0, 0, 2, 2), "a.png", ImageSizing::Cover, None);
        canvas.pop_opacity();
        assert_eq!(canvas.filled_rects(), vec![Rect::new(0, 0, 1, 1)]);
        assert_eq!(canvas.take().len(), 4);
        assert!(canvas.ops().is_empty());
    }
}
