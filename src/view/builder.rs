//! Builder for view configurations.

use crate::geometry::Size;
use crate::layout::Layout;
use crate::style::declaration::Declaration;
use crate::view::node::{PseudoState, Visibility};

/// Immutable description of a view, consumed by [`crate::view::ViewTree::insert`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub(crate) type_name: String,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) state: PseudoState,
    pub(crate) visibility: Visibility,
    pub(crate) layout: Option<Layout>,
    pub(crate) cell: Option<(u32, u32)>,
    pub(crate) content_size: Size,
    pub(crate) inline_style: Vec<Declaration>,
}

impl ViewConfig {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }
}

/// Builder for [`ViewConfig`].
///
/// ```
/// use trellis::{Layout, ViewBuilder};
///
/// let config = ViewBuilder::new("Row")
///     .with_class("toolbar")
///     .with_layout(Layout::Horizontal)
///     .with_expanding(1, 0)
///     .build();
/// assert_eq!(config.type_name(), "Row");
/// ```
#[derive(Debug, Clone)]
pub struct ViewBuilder {
    config: ViewConfig,
}

impl ViewBuilder {
    /// Start a view of the given type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            config: ViewConfig {
                type_name: type_name.into(),
                id: None,
                classes: Vec::new(),
                state: PseudoState::empty(),
                visibility: Visibility::Visible,
                layout: None,
                cell: None,
                content_size: Size::ZERO,
                inline_style: Vec::new(),
            },
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.config.id = Some(id.into());
        self
    }

    /// Add a class. Duplicates are ignored.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.config.classes.contains(&class) {
            self.config.classes.push(class);
        }
        self
    }

    /// Make the view a container that arranges its children with `layout`.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.config.layout = Some(layout);
        self
    }

    /// Expansion weights, stored as an inline `expanding` declaration.
    pub fn with_expanding(self, horizontal: u32, vertical: u32) -> Self {
        self.with_style(Declaration::Expanding { horizontal, vertical })
    }

    /// Intrinsic content size, as reported by a widget or text shaper.
    pub fn with_content_size(mut self, width: i32, height: i32) -> Self {
        self.config.content_size = Size::new(width, height);
        self
    }

    /// Add an inline declaration. Inline declarations beat every rule.
    pub fn with_style(mut self, declaration: Declaration) -> Self {
        self.config.inline_style.push(declaration);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.config.visibility = visibility;
        self
    }

    /// Pin the view to `(column, row)` of a grid parent.
    pub fn in_cell(mut self, column: u32, row: u32) -> Self {
        self.config.cell = Some((column, row));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.config.state |= PseudoState::DISABLED;
        self
    }

    pub fn build(self) -> ViewConfig {
        self.config
    }
}
