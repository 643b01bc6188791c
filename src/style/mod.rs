//! Style engine: tokenizer, parser, typed declarations, metrics, cascade.

pub mod applied;
pub mod color;
pub mod computed;
pub mod context;
pub mod declaration;
pub mod metric;
pub mod model;
pub mod parser;
pub mod specificity;
pub mod stylesheet;
pub mod tokenizer;

pub use applied::AppliedStyle;
pub use color::Color;
pub use computed::ViewStyle;
pub use context::{StyleContext, StyleError};
pub use declaration::{BorderSide, Declaration, ImageSizing, PropertyError, Slot};
pub use metric::{Metric, MetricBox, MetricContext, MetricError, SizeMetric, Unit};
pub use parser::ParseError;
pub use stylesheet::{Rule, Stylesheet};
