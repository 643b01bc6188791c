//! Typed style declarations and the property registry.
//!
//! Each [`Declaration`] belongs to exactly one [`Slot`]. The cascade keeps one
//! declaration per slot; different slots never interact. Parsing from tokens
//! goes through [`REGISTRY`], a flat table from property name to parser.

use crate::geometry::Rect;
use crate::render::{Edges, RenderContext};
use crate::style::color::Color;
use crate::style::computed::ViewStyle;
use crate::style::metric::{Metric, MetricBox, MetricContext, SizeMetric};
use crate::style::model::DeclarationValue;

/// Errors from turning raw values into a typed declaration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    #[error("unknown property: {0}")]
    UnknownProperty(String),
    #[error("invalid value for {property}: {message}")]
    InvalidValue { property: String, message: String },
}

fn invalid(property: &str, message: impl Into<String>) -> PropertyError {
    PropertyError::InvalidValue { property: property.into(), message: message.into() }
}

/// The cascade category of a declaration.
///
/// The derived order is also the paint order used by the painter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    Background,
    BackgroundImage,
    Border,
    BorderTop,
    BorderRight,
    BorderBottom,
    BorderLeft,
    BorderRadius,
    TextColor,
    Opacity,
    FontSize,
    FixedSize,
    MinSize,
    MaxSize,
    Margin,
    Padding,
    Expanding,
    LayoutSpacing,
}

impl Slot {
    /// Whether a change in this slot can move or resize anything.
    pub const fn affects_layout(self) -> bool {
        matches!(
            self,
            Slot::FontSize
                | Slot::FixedSize
                | Slot::MinSize
                | Slot::MaxSize
                | Slot::Margin
                | Slot::Padding
                | Slot::Expanding
                | Slot::LayoutSpacing
        )
    }
}

/// How a background image is fitted into the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSizing {
    /// Keep the image's own size.
    #[default]
    None,
    /// Stretch to the view without keeping aspect ratio.
    Fit,
    /// Center without scaling.
    Center,
    /// Repeat the image.
    Tile,
    /// Keep aspect ratio, cover the whole view.
    Cover,
    /// Keep aspect ratio, fit inside the view.
    Contain,
}

impl ImageSizing {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "none" => Self::None,
            "fit" => Self::Fit,
            "center" => Self::Center,
            "tile" => Self::Tile,
            "cover" => Self::Cover,
            "contain" => Self::Contain,
            _ => return None,
        })
    }
}

/// One border edge: width and color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSide {
    pub width: Metric,
    pub color: Color,
}

impl BorderSide {
    pub fn new(width: Metric, color: Color) -> Self {
        Self { width, color }
    }
}

/// A single typed style effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    BackgroundSolid(Color),
    BackgroundImage {
        url: String,
        overlay: Option<Color>,
        sizing: ImageSizing,
    },
    Border(BorderSide),
    BorderTop(BorderSide),
    BorderRight(BorderSide),
    BorderBottom(BorderSide),
    BorderLeft(BorderSide),
    BorderRadius(Metric),
    TextColor(Color),
    Opacity(f32),
    FontSize(Metric),
    FixedSize(SizeMetric),
    MinSize(SizeMetric),
    MaxSize(SizeMetric),
    Margin(MetricBox),
    Padding(MetricBox),
    Expanding { horizontal: u32, vertical: u32 },
    LayoutSpacing(Metric),
}

impl Declaration {
    /// The slot this declaration occupies in an applied style.
    pub fn slot(&self) -> Slot {
        match self {
            Declaration::BackgroundSolid(_) => Slot::Background,
            Declaration::BackgroundImage { .. } => Slot::BackgroundImage,
            Declaration::Border(_) => Slot::Border,
            Declaration::BorderTop(_) => Slot::BorderTop,
            Declaration::BorderRight(_) => Slot::BorderRight,
            Declaration::BorderBottom(_) => Slot::BorderBottom,
            Declaration::BorderLeft(_) => Slot::BorderLeft,
            Declaration::BorderRadius(_) => Slot::BorderRadius,
            Declaration::TextColor(_) => Slot::TextColor,
            Declaration::Opacity(_) => Slot::Opacity,
            Declaration::FontSize(_) => Slot::FontSize,
            Declaration::FixedSize(_) => Slot::FixedSize,
            Declaration::MinSize(_) => Slot::MinSize,
            Declaration::MaxSize(_) => Slot::MaxSize,
            Declaration::Margin(_) => Slot::Margin,
            Declaration::Padding(_) => Slot::Padding,
            Declaration::Expanding { .. } => Slot::Expanding,
            Declaration::LayoutSpacing(_) => Slot::LayoutSpacing,
        }
    }

    pub fn affects_layout(&self) -> bool {
        self.slot().affects_layout()
    }

    /// Whether this declaration has no visible or geometric effect.
    ///
    /// A none declaration still occupies its slot and so still hides any
    /// lower-priority declaration for that slot.
    pub fn is_none(&self) -> bool {
        match self {
            Declaration::BackgroundSolid(color) => color.is_transparent(),
            Declaration::BackgroundImage { url, .. } => url.is_empty(),
            Declaration::Border(side)
            | Declaration::BorderTop(side)
            | Declaration::BorderRight(side)
            | Declaration::BorderBottom(side)
            | Declaration::BorderLeft(side) => side.width.value <= 0.0 || side.color.is_transparent(),
            Declaration::FixedSize(size) => size.is_unset(),
            Declaration::Expanding { horizontal, vertical } => *horizontal == 0 && *vertical == 0,
            _ => false,
        }
    }

    /// Write this declaration's effect into a view's computed style.
    pub fn apply_for(&self, style: &mut ViewStyle) {
        if self.is_none() {
            return;
        }
        match self {
            Declaration::BackgroundSolid(color) => style.background = Some(*color),
            Declaration::BackgroundImage { url, .. } => style.background_image = Some(url.clone()),
            Declaration::Border(side) => style.border = Some(*side),
            Declaration::BorderTop(_)
            | Declaration::BorderRight(_)
            | Declaration::BorderBottom(_)
            | Declaration::BorderLeft(_) => {}
            Declaration::BorderRadius(radius) => style.border_radius = *radius,
            Declaration::TextColor(color) => style.text_color = Some(*color),
            Declaration::Opacity(opacity) => style.opacity = opacity.clamp(0.0, 1.0),
            Declaration::FontSize(size) => style.font_size = Some(*size),
            Declaration::FixedSize(size) => style.fixed_size = *size,
            Declaration::MinSize(size) => style.min_size = *size,
            Declaration::MaxSize(size) => style.max_size = *size,
            Declaration::Margin(margin) => style.margin = *margin,
            Declaration::Padding(padding) => style.padding = *padding,
            Declaration::Expanding { horizontal, vertical } => {
                style.expanding = (*horizontal, *vertical);
            }
            Declaration::LayoutSpacing(spacing) => style.spacing = *spacing,
        }
    }

    /// Draw this declaration for a view occupying `rect` (absolute pixels).
    pub fn render_for(
        &self,
        rect: Rect,
        style: &ViewStyle,
        metrics: &MetricContext,
        canvas: &mut dyn RenderContext,
    ) {
        if self.is_none() {
            return;
        }
        let radius = style.border_radius.resolve_size(&metrics.with_reference(rect.width as f32));
        match self {
            Declaration::BackgroundSolid(color) => canvas.fill_rect(rect, *color, radius),
            Declaration::BackgroundImage { url, overlay, sizing } => {
                canvas.draw_image(rect, url, *sizing, *overlay);
            }
            Declaration::Border(side) => stroke(canvas, rect, Edges::all(), side, metrics, radius),
            Declaration::BorderTop(side) => stroke(canvas, rect, Edges::TOP, side, metrics, 0),
            Declaration::BorderRight(side) => stroke(canvas, rect, Edges::RIGHT, side, metrics, 0),
            Declaration::BorderBottom(side) => stroke(canvas, rect, Edges::BOTTOM, side, metrics, 0),
            Declaration::BorderLeft(side) => stroke(canvas, rect, Edges::LEFT, side, metrics, 0),
            _ => {}
        }
    }
}

fn stroke(
    canvas: &mut dyn RenderContext,
    rect: Rect,
    edges: Edges,
    side: &BorderSide,
    metrics: &MetricContext,
    radius: i32,
) {
    let width = side.width.resolve_size(&metrics.with_reference(rect.width as f32));
    canvas.stroke_border(rect, edges, width, side.color, radius);
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

type DeclarationParser = fn(&str, &[DeclarationValue]) -> Result<Declaration, PropertyError>;

/// Property name → parser. Lookup is a linear scan; the table is small.
pub static REGISTRY: &[(&str, DeclarationParser)] = &[
    ("background", parse_background),
    ("background-color", parse_background),
    ("background-image", parse_background_image),
    ("border", parse_border),
    ("border-top", parse_border_top),
    ("border-right", parse_border_right),
    ("border-bottom", parse_border_bottom),
    ("border-left", parse_border_left),
    ("border-radius", parse_border_radius),
    ("color", parse_text_color),
    ("opacity", parse_opacity),
    ("font-size", parse_font_size),
    ("fixed-size", parse_fixed_size),
    ("min-size", parse_min_size),
    ("max-size", parse_max_size),
    ("margin", parse_margin),
    ("padding", parse_padding),
    ("expanding", parse_expanding),
    ("spacing", parse_spacing),
];

/// Build a typed declaration from a property name and its raw values.
pub fn parse_declaration(property: &str, values: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    let (_, parser) = REGISTRY
        .iter()
        .find(|(name, _)| *name == property)
        .ok_or_else(|| PropertyError::UnknownProperty(property.to_string()))?;
    parser(property, values)
}

fn color_value(property: &str, value: &DeclarationValue) -> Result<Color, PropertyError> {
    match value {
        DeclarationValue::Color(hex) => {
            Color::from_hex(hex).ok_or_else(|| invalid(property, format!("bad hex color #{hex}")))
        }
        DeclarationValue::Ident(name) => {
            Color::from_name(name).ok_or_else(|| invalid(property, format!("unknown color {name}")))
        }
        other => Err(invalid(property, format!("expected a color, got {other:?}"))),
    }
}

fn expect_count(property: &str, values: &[DeclarationValue], range: std::ops::RangeInclusive<usize>) -> Result<(), PropertyError> {
    if range.contains(&values.len()) {
        Ok(())
    } else {
        Err(invalid(
            property,
            format!("expected {}-{} values, got {}", range.start(), range.end(), values.len()),
        ))
    }
}

fn metric_value(property: &str, value: &DeclarationValue) -> Result<Metric, PropertyError> {
    Metric::from_value(value).map_err(|e| invalid(property, e.to_string()))
}

fn single_metric(property: &str, values: &[DeclarationValue]) -> Result<Metric, PropertyError> {
    expect_count(property, values, 1..=1)?;
    metric_value(property, &values[0])
}

fn single_color(property: &str, values: &[DeclarationValue]) -> Result<Color, PropertyError> {
    expect_count(property, values, 1..=1)?;
    color_value(property, &values[0])
}

fn is_keyword(value: &DeclarationValue, keyword: &str) -> bool {
    matches!(value, DeclarationValue::Ident(name) if name.eq_ignore_ascii_case(keyword))
}

fn parse_background(property: &str, values: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    if values.len() == 1 && is_keyword(&values[0], "none") {
        return Ok(Declaration::BackgroundSolid(Color::TRANSPARENT));
    }
    single_color(property, values).map(Declaration::BackgroundSolid)
}

/// `none` | `"url" [overlay-color] [sizing]`
fn parse_background_image(property: &str, values: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    expect_count(property, values, 1..=3)?;
    let url = match &values[0] {
        DeclarationValue::String(url) => url.clone(),
        v if is_keyword(v, "none") => String::new(),
        other => return Err(invalid(property, format!("expected a quoted url or none, got {other:?}"))),
    };

    let mut overlay = None;
    let mut sizing = ImageSizing::default();
    for value in &values[1..] {
        match value {
            DeclarationValue::Ident(name) if ImageSizing::from_name(name).is_some() => {
                sizing = ImageSizing::from_name(name).unwrap_or_default();
            }
            other => overlay = Some(color_value(property, other)?),
        }
    }

    Ok(Declaration::BackgroundImage { url, overlay, sizing })
}

/// `none` | `<width> [solid] [<color>]`
fn parse_border_side(property: &str, values: &[DeclarationValue]) -> Result<BorderSide, PropertyError> {
    expect_count(property, values, 1..=3)?;
    if is_keyword(&values[0], "none") {
        return Ok(BorderSide::new(Metric::ZERO, Color::TRANSPARENT));
    }
    let width = metric_value(property, &values[0])?;
    let mut color = Color::BLACK;
    for value in &values[1..] {
        if is_keyword(value, "solid") {
            continue;
        }
        color = color_value(property, value)?;
    }
    Ok(BorderSide::new(width, color))
}

fn parse_opacity(property: &str, values: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    expect_count(property, values, 1..=1)?;
    let opacity = match &values[0] {
        DeclarationValue::Number(n) => *n,
        DeclarationValue::Dimension(n, unit) if unit == "%" => n / 100.0,
        other => return Err(invalid(property, format!("expected a number, got {other:?}"))),
    };
    if !(0.0..=1.0).contains(&opacity) {
        return Err(invalid(property, format!("{opacity} is outside 0..1")));
    }
    Ok(Declaration::Opacity(opacity))
}

/// One value for both axes, or `width height`; `auto` leaves an axis unset.
fn parse_size_metric(property: &str, values: &[DeclarationValue]) -> Result<SizeMetric, PropertyError> {
    expect_count(property, values, 1..=2)?;
    let axis = |value: &DeclarationValue| -> Result<Option<Metric>, PropertyError> {
        if is_keyword(value, "auto") {
            Ok(None)
        } else {
            metric_value(property, value).map(Some)
        }
    };
    let width = axis(&values[0])?;
    let height = match values.get(1) {
        Some(value) => axis(value)?,
        None => width,
    };
    Ok(SizeMetric::new(width, height))
}

/// CSS shorthand: 1 value all sides; 2 vertical/horizontal; 3 top/horizontal/bottom; 4 top/right/bottom/left.
fn parse_metric_box(property: &str, values: &[DeclarationValue]) -> Result<MetricBox, PropertyError> {
    expect_count(property, values, 1..=4)?;
    let m = values
        .iter()
        .map(|v| metric_value(property, v))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(match m.as_slice() {
        [all] => MetricBox::all(*all),
        [vertical, horizontal] => MetricBox::symmetric(*vertical, *horizontal),
        [top, horizontal, bottom] => MetricBox::new(*top, *horizontal, *bottom, *horizontal),
        [top, right, bottom, left] => MetricBox::new(*top, *right, *bottom, *left),
        _ => return Err(invalid(property, "expected 1-4 values")),
    })
}

fn parse_expanding(property: &str, values: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    expect_count(property, values, 1..=2)?;
    let weight = |value: &DeclarationValue| match value {
        DeclarationValue::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Ok(*n as u32),
        other => Err(invalid(property, format!("expected a non-negative integer, got {other:?}"))),
    };
    let horizontal = weight(&values[0])?;
    let vertical = match values.get(1) {
        Some(value) => weight(value)?,
        None => horizontal,
    };
    Ok(Declaration::Expanding { horizontal, vertical })
}

fn parse_border(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    parse_border_side(p, v).map(Declaration::Border)
}

fn parse_border_top(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    parse_border_side(p, v).map(Declaration::BorderTop)
}

fn parse_border_right(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    parse_border_side(p, v).map(Declaration::BorderRight)
}

fn parse_border_bottom(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    parse_border_side(p, v).map(Declaration::BorderBottom)
}

fn parse_border_left(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    parse_border_side(p, v).map(Declaration::BorderLeft)
}

fn parse_border_radius(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    single_metric(p, v).map(Declaration::BorderRadius)
}

fn parse_text_color(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    single_color(p, v).map(Declaration::TextColor)
}

fn parse_font_size(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    single_metric(p, v).map(Declaration::FontSize)
}

fn parse_fixed_size(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    parse_size_metric(p, v).map(Declaration::FixedSize)
}

fn parse_min_size(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    parse_size_metric(p, v).map(Declaration::MinSize)
}

fn parse_max_size(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    parse_size_metric(p, v).map(Declaration::MaxSize)
}

fn parse_margin(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    parse_metric_box(p, v).map(Declaration::Margin)
}

fn parse_padding(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    parse_metric_box(p, v).map(Declaration::Padding)
}

fn parse_spacing(p: &str, v: &[DeclarationValue]) -> Result<Declaration, PropertyError> {
    single_metric(p, v).map(Declaration::LayoutSpacing)
}
