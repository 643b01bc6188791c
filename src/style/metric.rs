//! Logical length units and their resolution to pixels.
//!
//! A [`Metric`] is a value tagged with a [`Unit`]. Turning it into pixels needs
//! a [`MetricContext`]: the DPI scale and, for percentages, the already
//! resolved reference dimension of the parent.

use std::fmt;

use crate::style::model::DeclarationValue;

/// Points are 1/72 inch, density-independent pixels 1/96 inch.
const PT_TO_DP: f32 = 4.0 / 3.0;

/// Errors from metric parsing and resolution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    #[error("percentage has no resolved reference dimension")]
    UnresolvedReference,
    #[error("non-zero value {0} needs a unit (px, dp, pt or %)")]
    MissingUnit(f32),
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
    #[error("expected a length, got {0}")]
    NotALength(String),
}

/// Unit kind of a [`Metric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Physical pixels.
    Px,
    /// Density-independent pixels, scaled by the DPI factor.
    Dp,
    /// Typographic points (4/3 dp).
    Pt,
    /// Percentage of the reference dimension.
    Percent,
}

/// A length with a unit, e.g. `4dp` or `50%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    pub value: f32,
    pub unit: Unit,
}

/// Everything needed to turn a [`Metric`] into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricContext {
    dpi_scale: f32,
    reference: Option<f32>,
}

impl MetricContext {
    /// A context with the given DPI scale and no percentage reference.
    ///
    /// The scale must be positive; anything else is treated as 1.0.
    pub fn new(dpi_scale: f32) -> Self {
        debug_assert!(dpi_scale > 0.0, "dpi scale must be positive, got {dpi_scale}");
        let dpi_scale = if dpi_scale > 0.0 && dpi_scale.is_finite() {
            dpi_scale
        } else {
            tracing::error!(dpi_scale, "invalid dpi scale, falling back to 1.0");
            1.0
        };
        Self { dpi_scale, reference: None }
    }

    /// The same context with `reference` as the percentage base.
    pub fn with_reference(self, reference: f32) -> Self {
        Self { reference: Some(reference), ..self }
    }

    /// The same context without a percentage base.
    pub fn without_reference(self) -> Self {
        Self { reference: None, ..self }
    }

    pub fn dpi_scale(&self) -> f32 {
        self.dpi_scale
    }

    pub fn reference(&self) -> Option<f32> {
        self.reference
    }
}

impl Default for MetricContext {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Metric {
    pub const ZERO: Metric = Metric { value: 0.0, unit: Unit::Px };

    pub const fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn px(value: f32) -> Self {
        Self::new(value, Unit::Px)
    }

    pub const fn dp(value: f32) -> Self {
        Self::new(value, Unit::Dp)
    }

    pub const fn pt(value: f32) -> Self {
        Self::new(value, Unit::Pt)
    }

    pub const fn percent(value: f32) -> Self {
        Self::new(value, Unit::Percent)
    }

    /// Whether this metric needs a reference dimension to resolve.
    pub fn is_relative(&self) -> bool {
        self.unit == Unit::Percent
    }

    /// Resolve to fractional pixels.
    pub fn resolve(&self, ctx: &MetricContext) -> Result<f32, MetricError> {
        match self.unit {
            Unit::Px => Ok(self.value),
            Unit::Dp => Ok(self.value * ctx.dpi_scale),
            Unit::Pt => Ok(self.value * ctx.dpi_scale * PT_TO_DP),
            Unit::Percent => ctx
                .reference
                .map(|reference| self.value / 100.0 * reference)
                .ok_or(MetricError::UnresolvedReference),
        }
    }

    /// Resolve to whole pixels for layout.
    ///
    /// An unresolved percentage is a configuration defect: it asserts in debug
    /// builds and resolves to zero otherwise.
    pub fn resolve_px(&self, ctx: &MetricContext) -> i32 {
        match self.resolve(ctx) {
            Ok(px) => px.round() as i32,
            Err(err) => {
                debug_assert!(false, "cannot resolve {self}: {err}");
                tracing::error!(metric = %self, %err, "metric resolved to zero");
                0
            }
        }
    }

    /// Like [`resolve_px`](Self::resolve_px), clamped to be non-negative.
    pub fn resolve_size(&self, ctx: &MetricContext) -> i32 {
        self.resolve_px(ctx).max(0)
    }

    /// Build a metric from a parsed value: `12px`, `4dp`, `10pt`, `50%` or a bare `0`.
    pub fn from_value(value: &DeclarationValue) -> Result<Self, MetricError> {
        match value {
            DeclarationValue::Number(n) if *n == 0.0 => Ok(Metric::ZERO),
            DeclarationValue::Number(n) => Err(MetricError::MissingUnit(*n)),
            DeclarationValue::Dimension(n, unit) => match unit.as_str() {
                "px" => Ok(Metric::px(*n)),
                "dp" => Ok(Metric::dp(*n)),
                "pt" => Ok(Metric::pt(*n)),
                "%" => Ok(Metric::percent(*n)),
                other => Err(MetricError::UnknownUnit(other.to_string())),
            },
            other => Err(MetricError::NotALength(format!("{other:?}"))),
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Metric::ZERO
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.unit {
            Unit::Px => "px",
            Unit::Dp => "dp",
            Unit::Pt => "pt",
            Unit::Percent => "%",
        };
        if self.value.fract() == 0.0 {
            write!(f, "{}{suffix}", self.value as i64)
        } else {
            write!(f, "{}{suffix}", self.value)
        }
    }
}

/// Four-sided metrics (margin, padding) in CSS order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricBox {
    pub top: Metric,
    pub right: Metric,
    pub bottom: Metric,
    pub left: Metric,
}

impl MetricBox {
    pub fn all(v: Metric) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    pub fn symmetric(vertical: Metric, horizontal: Metric) -> Self {
        Self { top: vertical, right: horizontal, bottom: vertical, left: horizontal }
    }

    pub fn new(top: Metric, right: Metric, bottom: Metric, left: Metric) -> Self {
        Self { top, right, bottom, left }
    }

    /// Whether every side is zero.
    pub fn is_zero(&self) -> bool {
        [self.top, self.right, self.bottom, self.left].iter().all(|m| m.value == 0.0)
    }
}

/// A per-axis size where either axis may be left unset (`auto`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeMetric {
    pub width: Option<Metric>,
    pub height: Option<Metric>,
}

impl SizeMetric {
    pub fn new(width: Option<Metric>, height: Option<Metric>) -> Self {
        Self { width, height }
    }

    /// Same metric on both axes.
    pub fn both(m: Metric) -> Self {
        Self { width: Some(m), height: Some(m) }
    }

    pub fn width(m: Metric) -> Self {
        Self { width: Some(m), height: None }
    }

    pub fn height(m: Metric) -> Self {
        Self { width: None, height: Some(m) }
    }

    pub fn is_unset(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}
