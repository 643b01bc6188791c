//! # trellis
//!
//! View-tree layout and stylesheet cascade engine for declarative UI toolkits.
//!
//! trellis keeps a retained tree of views, resolves a CSS-like stylesheet of
//! typed declarations against it, and lays the tree out with a measure pass
//! followed by a position pass. Mutations only mark views dirty; one
//! [`Surface::tick`] per frame restyles and re-lays out what changed.
//!
//! ## Core Systems
//!
//! - **[`view`]**: slotmap-backed view arena, builder, dirty tracking, queries
//! - **[`style`]**: tokenizer, parser, typed declarations, metrics, cascade, shared context
//! - **[`layout`]**: Vertical/Horizontal/Stacked/Grid/AdvancedGrid layouts, hit testing
//! - **[`scheduler`]**: per-tick restyle and relayout pass
//! - **[`render`]**: the `RenderContext` drawing seam and the painter
//! - **[`handoff`]**: background results delivered back to the UI thread
//! - **[`surface`]**: one tree plus everything needed to drive it
//! - **[`testing`]**: recording canvas and layout dumps
//! - **[`geometry`]**: Point, Size, Rect, BoxFields
//!
//! ```
//! use trellis::{Layout, Surface, SurfaceConfig, ViewBuilder};
//!
//! let mut surface = Surface::new(
//!     SurfaceConfig::new()
//!         .with_size(300, 40)
//!         .with_stylesheet("Button { fixed-size: 100px auto; }"),
//! )
//! .unwrap();
//! let root = surface.root();
//! let row = surface
//!     .tree_mut()
//!     .insert_child(root, ViewBuilder::new("Row").with_layout(Layout::Horizontal).with_expanding(1, 1).build());
//! let button = surface.tree_mut().insert_child(row, ViewBuilder::new("Button").build());
//!
//! surface.tick();
//! assert_eq!(surface.tree().rect(button).map(|r| r.width), Some(100));
//! ```

// Foundation
pub mod geometry;

// Core systems
pub mod layout;
pub mod style;
pub mod view;

// Frame loop
pub mod handoff;
pub mod render;
pub mod scheduler;
pub mod surface;

pub mod testing;

pub use geometry::{BoxFields, Point, Rect, Size};
pub use handoff::{HandoffQueue, HandoffSender};
pub use layout::{Layout, LayoutEngine, LayoutStats, SpatialMap};
pub use render::{paint, Edges, RenderContext};
pub use scheduler::Scheduler;
pub use style::{
    Color, Declaration, Metric, MetricContext, ParseError, StyleContext, StyleError, Stylesheet, Unit, ViewStyle,
};
pub use surface::{Surface, SurfaceConfig};
pub use view::{PseudoState, TreeError, ViewBuilder, ViewConfig, ViewId, ViewTree, Visibility};
