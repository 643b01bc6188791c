//! Computed per-view style: the applied declarations folded into typed fields.
//!
//! Lengths stay as [`Metric`]s here; the layout engine resolves them against
//! the DPI scale and the parent's content box when it runs.

use crate::style::color::Color;
use crate::style::declaration::{BorderSide, Declaration};
use crate::style::metric::{Metric, MetricBox, SizeMetric};

/// The typed result of applying every declaration of an applied style.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewStyle {
    pub background: Option<Color>,
    pub background_image: Option<String>,
    pub border: Option<BorderSide>,
    pub border_radius: Metric,
    pub text_color: Option<Color>,
    pub opacity: f32,
    pub font_size: Option<Metric>,
    pub fixed_size: SizeMetric,
    pub min_size: SizeMetric,
    pub max_size: SizeMetric,
    pub margin: MetricBox,
    pub padding: MetricBox,
    /// Expansion weights (horizontal, vertical).
    pub expanding: (u32, u32),
    /// Gap between consecutive children of a container.
    pub spacing: Metric,
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self {
            background: None,
            background_image: None,
            border: None,
            border_radius: Metric::ZERO,
            text_color: None,
            opacity: 1.0,
            font_size: None,
            fixed_size: SizeMetric::default(),
            min_size: SizeMetric::default(),
            max_size: SizeMetric::default(),
            margin: MetricBox::default(),
            padding: MetricBox::default(),
            expanding: (0, 0),
            spacing: Metric::ZERO,
        }
    }
}

impl ViewStyle {
    /// Fold declarations in order; later ones overwrite earlier ones.
    pub fn from_declarations<'a>(declarations: impl IntoIterator<Item = &'a Declaration>) -> Self {
        let mut style = Self::default();
        for declaration in declarations {
            declaration.apply_for(&mut style);
        }
        style
    }

    /// Whether the size is pinned on both axes, so children cannot change it.
    ///
    /// Percentages do not count: they are resolved against the parent only
    /// when positioning, and the measured size still follows the content.
    pub fn is_fixed_both_axes(&self) -> bool {
        let absolute = |metric: Option<Metric>| metric.is_some_and(|m| !m.is_relative());
        absolute(self.fixed_size.width) && absolute(self.fixed_size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_opaque_and_unconstrained() {
        let style = ViewStyle::default();
        assert_eq!(style.opacity, 1.0);
        assert!(style.fixed_size.is_unset());
        assert_eq!(style.expanding, (0, 0));
        assert!(!style.is_fixed_both_axes());
    }

    #[test]
    fn later_declarations_overwrite() {
        let decls = [
            Declaration::TextColor(Color::RED),
            Declaration::FixedSize(SizeMetric::both(Metric::px(10.0))),
            Declaration::TextColor(Color::BLUE),
        ];
        let style = ViewStyle::from_declarations(&decls);
        assert_eq!(style.text_color, Some(Color::BLUE));
        assert!(style.is_fixed_both_axes());
    }

    #[test]
    fn percentage_size_is_not_fixed() {
        let percent = ViewStyle::from_declarations(&[Declaration::FixedSize(SizeMetric::both(Metric::percent(50.0)))]);
        assert!(!percent.is_fixed_both_axes());

        let mixed = ViewStyle::from_declarations(&[Declaration::FixedSize(SizeMetric::new(
            Some(Metric::dp(20.0)),
            Some(Metric::percent(50.0)),
        ))]);
        assert!(!mixed.is_fixed_both_axes());
    }
}
