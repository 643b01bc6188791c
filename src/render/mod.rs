//! Drawing seam and painter.
//!
//! The crate does not rasterize anything. [`paint`] walks the laid-out tree
//! in z-order and asks each applied declaration to draw itself through a
//! [`RenderContext`] supplied by the host.

use crate::geometry::{Point, Rect};
use crate::style::color::Color;
use crate::style::declaration::ImageSizing;
use crate::style::metric::MetricContext;
use crate::view::{ViewId, ViewTree, Visibility};

bitflags::bitflags! {
    /// Which edges of a rect a border stroke covers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Edges: u8 {
        const TOP = 1 << 0;
        const RIGHT = 1 << 1;
        const BOTTOM = 1 << 2;
        const LEFT = 1 << 3;
    }
}

/// Drawing operations a backend must provide. Rects are absolute pixels.
pub trait RenderContext {
    fn fill_rect(&mut self, rect: Rect, color: Color, radius: i32);

    fn stroke_border(&mut self, rect: Rect, edges: Edges, width: i32, color: Color, radius: i32);

    fn draw_image(&mut self, rect: Rect, url: &str, sizing: ImageSizing, overlay: Option<Color>);

    /// Start a group drawn at `opacity` (0..=1). Groups nest.
    fn push_opacity(&mut self, opacity: f32);

    fn pop_opacity(&mut self);
}

/// Paint `root` and its subtree back to front.
///
/// INVISIBLE and GONE views are skipped together with their children.
/// Declarations are drawn in slot order, so backgrounds go under borders.
pub fn paint(tree: &ViewTree, root: ViewId, metrics: &MetricContext, canvas: &mut dyn RenderContext) {
    paint_view(tree, root, Point::ZERO, metrics, canvas);
}

fn paint_view(tree: &ViewTree, id: ViewId, offset: Point, metrics: &MetricContext, canvas: &mut dyn RenderContext) {
    let Some(data) = tree.get(id) else { return };
    if data.visibility() != Visibility::Visible {
        return;
    }

    let rect = data.rect().translate(offset);
    let style = data.style();
    let translucent = style.opacity < 1.0;
    if translucent {
        canvas.push_opacity(style.opacity);
    }

    for declaration in data.applied().iter() {
        declaration.render_for(rect, style, metrics, canvas);
    }
    for &child in tree.children(id) {
        paint_view(tree, child, rect.origin(), metrics, canvas);
    }

    if translucent {
        canvas.pop_opacity();
    }
}
