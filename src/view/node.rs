//! View types: ViewId, ViewData, visibility, pseudo-state and dirty flags.

use slotmap::new_key_type;

use crate::geometry::{Rect, Size};
use crate::layout::Layout;
use crate::style::applied::AppliedStyle;
use crate::style::computed::ViewStyle;
use crate::style::declaration::Declaration;
use crate::view::builder::ViewConfig;

new_key_type! {
    /// Generational handle to a view. A handle to a removed view never
    /// resolves again, even if its slot is reused.
    pub struct ViewId;
}

/// Whether a view takes part in layout and painting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Laid out and painted.
    #[default]
    Visible,
    /// Laid out (occupies space) but not painted or hit-tested.
    Invisible,
    /// Removed from layout and painting entirely.
    Gone,
}

impl Visibility {
    pub fn is_gone(self) -> bool {
        self == Visibility::Gone
    }
}

bitflags::bitflags! {
    /// Interaction state matched by `:hover`, `:active`, `:focus`, `:disabled`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PseudoState: u8 {
        const HOVER = 1 << 0;
        const ACTIVE = 1 << 1;
        const FOCUS = 1 << 2;
        const DISABLED = 1 << 3;
    }
}

impl PseudoState {
    /// Map a pseudo-class name to its flag.
    pub fn from_pseudo_class(name: &str) -> Option<Self> {
        match name {
            "hover" => Some(Self::HOVER),
            "active" | "pressed" => Some(Self::ACTIVE),
            "focus" | "focused" => Some(Self::FOCUS),
            "disabled" => Some(Self::DISABLED),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Pending work on a view.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        /// The applied style must be recomputed.
        const NEEDS_RESTYLE = 1 << 0;
        /// Preferred size and children's geometry must be recomputed.
        const NEEDS_RELAYOUT = 1 << 1;
        /// Some descendant needs relayout; this view's own geometry is intact.
        const DESCENDANT_NEEDS_RELAYOUT = 1 << 2;
        /// Only the painted output changed.
        const NEEDS_REDRAW = 1 << 3;
    }
}

/// Data associated with a single view.
///
/// Fields that trigger invalidation when changed are only writable through
/// [`crate::view::ViewTree`].
#[derive(Debug, Clone)]
pub struct ViewData {
    /// Type name matched by type selectors (e.g. "Button").
    pub type_name: String,
    /// Optional unique id (`#id` selector).
    pub id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) state: PseudoState,
    pub(crate) visibility: Visibility,
    pub(crate) layout: Option<Layout>,
    /// Explicit `(column, row)` in a grid parent.
    pub(crate) cell: Option<(u32, u32)>,
    /// Intrinsic size of the view's own content (text, image), without padding.
    pub(crate) content_size: Size,
    pub(crate) inline_style: Vec<Declaration>,

    pub(crate) applied: AppliedStyle,
    pub(crate) style: ViewStyle,

    /// Position relative to the parent and size.
    pub(crate) rect: Rect,
    pub(crate) preferred: Option<Size>,
    pub(crate) overflow: Size,
    pub(crate) dirty: DirtyFlags,
}

impl ViewData {
    pub(crate) fn from_config(config: ViewConfig) -> Self {
        let ViewConfig {
            type_name,
            id,
            classes,
            state,
            visibility,
            layout,
            cell,
            content_size,
            inline_style,
        } = config;

        let applied: AppliedStyle = inline_style.iter().cloned().collect();
        let style = applied.compute();

        Self {
            type_name,
            id,
            classes,
            state,
            visibility,
            layout,
            cell,
            content_size,
            inline_style,
            applied,
            style,
            rect: Rect::EMPTY,
            preferred: None,
            overflow: Size::ZERO,
            dirty: DirtyFlags::NEEDS_RESTYLE | DirtyFlags::NEEDS_RELAYOUT,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn state(&self) -> PseudoState {
        self.state
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }

    pub fn cell(&self) -> Option<(u32, u32)> {
        self.cell
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn inline_style(&self) -> &[Declaration] {
        &self.inline_style
    }

    /// The cascade result cached since the last restyle.
    pub fn applied(&self) -> &AppliedStyle {
        &self.applied
    }

    /// The applied style folded into typed fields.
    pub fn style(&self) -> &ViewStyle {
        &self.style
    }

    /// Geometry relative to the parent, as of the last layout pass.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// How far the children extend past the content box, per axis.
    pub fn overflow(&self) -> Size {
        self.overflow
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }
}
