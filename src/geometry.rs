//! Core geometry types: Point, Size, Rect, BoxFields.
//!
//! All values are whole pixels. Metrics are resolved to pixels before they reach
//! these types (see [`crate::style::metric`]).

use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A 2D position in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A 2D size in pixels (width x height).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0, height: 0 };

    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum.
    #[inline]
    pub const fn max(self, other: Size) -> Size {
        Size {
            width: if self.width > other.width { self.width } else { other.width },
            height: if self.height > other.height { self.height } else { other.height },
        }
    }

    /// Clamp both components to be non-negative.
    #[inline]
    pub const fn non_negative(self) -> Size {
        Size {
            width: if self.width > 0 { self.width } else { 0 },
            height: if self.height > 0 { self.height } else { 0 },
        }
    }

    /// Whether either component is negative.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.width < 0 || self.height < 0
    }

    /// Convert to a [`Rect`] positioned at the origin.
    #[inline]
    pub const fn to_rect(self) -> Rect {
        Rect { x: 0, y: 0, width: self.width, height: self.height }
    }
}

impl Add for Size {
    type Output = Size;
    #[inline]
    fn add(self, rhs: Size) -> Size {
        Size { width: self.width + rhs.width, height: self.height + rhs.height }
    }
}

impl Sub for Size {
    type Output = Size;
    #[inline]
    fn sub(self, rhs: Size) -> Size {
        Size { width: self.width - rhs.width, height: self.height - rhs.height }
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// A rectangle defined by its top-left corner and size.
///
/// View geometry is stored relative to the parent's top-left corner; absolute
/// rects are produced on demand by [`crate::view::ViewTree::absolute_rect`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// An empty rect at the origin.
    pub const EMPTY: Rect = Rect { x: 0, y: 0, width: 0, height: 0 };

    /// Create a new rect.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rect from a position and a size.
    #[inline]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self { x: origin.x, y: origin.y, width: size.width, height: size.height }
    }

    /// The right edge (exclusive): `x + width`.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// The bottom edge (exclusive): `y + height`.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    /// The top-left corner.
    #[inline]
    pub const fn origin(self) -> Point {
        Point { x: self.x, y: self.y }
    }

    /// The dimensions as a [`Size`].
    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Whether the point lies inside this rect.
    #[inline]
    pub const fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether `other` overlaps this rect (non-zero intersection area).
    #[inline]
    pub const fn overlaps(self, other: Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Move the rect by `delta`.
    #[inline]
    pub const fn translate(self, delta: Point) -> Rect {
        Rect { x: self.x + delta.x, y: self.y + delta.y, width: self.width, height: self.height }
    }

    /// Contract the rect inward by the given [`BoxFields`].
    ///
    /// Width and height are clamped to zero.
    #[inline]
    pub const fn shrink(self, fields: BoxFields) -> Rect {
        let w = self.width - fields.horizontal();
        let h = self.height - fields.vertical();
        Rect {
            x: self.x + fields.left,
            y: self.y + fields.top,
            width: if w > 0 { w } else { 0 },
            height: if h > 0 { h } else { 0 },
        }
    }

    /// The same rect with width and height clamped to zero.
    #[inline]
    pub const fn non_negative_size(self) -> Rect {
        Rect::from_parts(self.origin(), self.size().non_negative())
    }

    /// Expand the rect outward by the given [`BoxFields`].
    #[inline]
    pub const fn grow(self, fields: BoxFields) -> Rect {
        Rect {
            x: self.x - fields.left,
            y: self.y - fields.top,
            width: self.width + fields.horizontal(),
            height: self.height + fields.vertical(),
        }
    }
}

// ---------------------------------------------------------------------------
// BoxFields
// ---------------------------------------------------------------------------

/// Pixel extents around the four sides of a box, used for margin, padding and
/// border widths.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoxFields {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl BoxFields {
    /// Zero on all sides.
    pub const ZERO: BoxFields = BoxFields { left: 0, right: 0, top: 0, bottom: 0 };

    /// Create fields in CSS order (top, right, bottom, left).
    #[inline]
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self { left, right, top, bottom }
    }

    /// All four sides set to the same value.
    #[inline]
    pub const fn all(value: i32) -> Self {
        Self { left: value, right: value, top: value, bottom: value }
    }

    /// `vertical` for top/bottom, `horizontal` for left/right.
    #[inline]
    pub const fn symmetric(vertical: i32, horizontal: i32) -> Self {
        Self { left: horizontal, right: horizontal, top: vertical, bottom: vertical }
    }

    /// `left + right`.
    #[inline]
    pub const fn horizontal(self) -> i32 {
        self.left + self.right
    }

    /// `top + bottom`.
    #[inline]
    pub const fn vertical(self) -> i32 {
        self.top + self.bottom
    }

    /// Both aggregates as a [`Size`].
    #[inline]
    pub const fn total(self) -> Size {
        Size { width: self.horizontal(), height: self.vertical() }
    }
}

impl Add for BoxFields {
    type Output = BoxFields;
    #[inline]
    fn add(self, rhs: BoxFields) -> BoxFields {
        BoxFields {
            left: self.left + rhs.left,
            right: self.right + rhs.right,
            top: self.top + rhs.top,
            bottom: self.bottom + rhs.bottom,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
