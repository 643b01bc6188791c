//! View arena: slotmap-backed tree of views with class/id queries.

pub mod builder;
pub mod node;
pub mod query;
pub mod tree;

pub use builder::{ViewBuilder, ViewConfig};
pub use node::{DirtyFlags, PseudoState, ViewData, ViewId, Visibility};
pub use tree::{TreeError, ViewTree};
