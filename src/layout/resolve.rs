//! Metric → pixel conversion of the layout-relevant parts of a [`ViewStyle`].
//!
//! Percentages need the parent's content box. During the measure pass that
//! box is not known yet, so percentage lengths are skipped (treated as unset)
//! and picked up again in the position pass, where the reference is passed in.

use crate::geometry::{BoxFields, Size};
use crate::layout::Axis;
use crate::style::computed::ViewStyle;
use crate::style::metric::{Metric, MetricBox, MetricContext};
use crate::view::ViewId;

/// Upper bound used for "no maximum".
pub const UNBOUNDED: i32 = i32::MAX / 4;

/// Pixel layout inputs of one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    /// Fixed `(width, height)`; `None` leaves the axis content-sized.
    pub fixed: (Option<i32>, Option<i32>),
    pub min: Size,
    pub max: Size,
    pub margin: BoxFields,
    pub padding: BoxFields,
    /// Expansion weights `(horizontal, vertical)`.
    pub expanding: (u32, u32),
    /// Gap between consecutive children, for containers.
    pub spacing: i32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            fixed: (None, None),
            min: Size::ZERO,
            max: Size::new(UNBOUNDED, UNBOUNDED),
            margin: BoxFields::ZERO,
            padding: BoxFields::ZERO,
            expanding: (0, 0),
            spacing: 0,
        }
    }
}

impl LayoutParams {
    /// Resolve `style` to pixels. `reference` is the parent's content size, if known.
    pub fn resolve(style: &ViewStyle, metrics: &MetricContext, reference: Option<Size>) -> Self {
        let width_ref = reference.map(|r| r.width);
        let height_ref = reference.map(|r| r.height);
        let w = |m: Option<Metric>| m.and_then(|m| length(m, metrics, width_ref)).map(|v| v.max(0));
        let h = |m: Option<Metric>| m.and_then(|m| length(m, metrics, height_ref)).map(|v| v.max(0));

        let fixed = (w(style.fixed_size.width), h(style.fixed_size.height));
        let min = Size::new(
            w(style.min_size.width).unwrap_or(0),
            h(style.min_size.height).unwrap_or(0),
        );
        let max = Size::new(
            w(style.max_size.width).unwrap_or(UNBOUNDED),
            h(style.max_size.height).unwrap_or(UNBOUNDED),
        );

        Self {
            fixed,
            min,
            max,
            margin: box_fields(&style.margin, metrics, width_ref, height_ref),
            padding: box_fields(&style.padding, metrics, width_ref, height_ref),
            expanding: style.expanding,
            spacing: w(Some(style.spacing)).unwrap_or(0),
        }
    }

    pub fn fixed_on(&self, axis: Axis) -> Option<i32> {
        axis.pick(self.fixed)
    }

    /// Expansion weight along `axis`. A fixed size on that axis disables expansion.
    pub fn weight(&self, axis: Axis) -> u32 {
        match self.fixed_on(axis) {
            Some(_) => 0,
            None => axis.pick(self.expanding),
        }
    }

    pub fn min_on(&self, axis: Axis) -> i32 {
        axis.main(self.min)
    }

    pub fn max_on(&self, axis: Axis) -> i32 {
        axis.main(self.max)
    }

    /// Clamp to `[min, max]`; the minimum wins when they conflict.
    pub fn clamp_on(&self, axis: Axis, value: i32) -> i32 {
        value.min(self.max_on(axis)).max(self.min_on(axis))
    }

    /// Turn a natural (content + padding) size into a preferred size.
    pub fn preferred_from(&self, natural: Size) -> Size {
        Size::new(
            self.fixed.0.unwrap_or_else(|| self.clamp_on(Axis::Horizontal, natural.width)),
            self.fixed.1.unwrap_or_else(|| self.clamp_on(Axis::Vertical, natural.height)),
        )
    }
}

/// A percentage without a reference is skipped rather than reported.
fn length(metric: Metric, metrics: &MetricContext, reference: Option<i32>) -> Option<i32> {
    if metric.is_relative() {
        let reference = reference?;
        Some(metric.resolve_px(&metrics.with_reference(reference as f32)))
    } else {
        Some(metric.resolve_px(metrics))
    }
}

fn box_fields(b: &MetricBox, metrics: &MetricContext, width_ref: Option<i32>, height_ref: Option<i32>) -> BoxFields {
    let side = |m: Metric, reference: Option<i32>| length(m, metrics, reference).unwrap_or(0).max(0);
    BoxFields::new(
        side(b.top, height_ref),
        side(b.right, width_ref),
        side(b.bottom, height_ref),
        side(b.left, width_ref),
    )
}

/// A child as seen by its parent's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutItem {
    pub id: ViewId,
    /// Border-box preferred size.
    pub preferred: Size,
    pub params: LayoutParams,
    /// Explicit grid cell `(column, row)`.
    pub cell: Option<(u32, u32)>,
}

impl LayoutItem {
    /// Preferred size including margins.
    pub fn outer(&self) -> Size {
        self.preferred + self.params.margin.total()
    }
}

/// Where each child goes and how far the children spill past the content box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arrangement {
    pub placements: Vec<(ViewId, crate::geometry::Rect)>,
    pub overflow: Size,
}
