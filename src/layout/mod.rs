//! Layout engine: measure and position passes, per-layout arrangement, hit testing.

pub mod engine;
pub mod grid;
pub mod linear;
pub mod measure;
pub mod resolve;
pub mod spatial;
pub mod stacked;

pub use engine::{LayoutEngine, LayoutStats};
pub use resolve::LayoutParams;
pub use spatial::SpatialMap;

use crate::geometry::{BoxFields, Point, Rect, Size};

/// How a container arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Children stacked top to bottom.
    Vertical,
    /// Children left to right.
    Horizontal,
    /// Children overlap in the same box, in insertion order.
    Stacked,
    /// Uniform cells, `columns` per row.
    Grid { columns: u32 },
    /// Per-track sizes, `columns` per row.
    AdvancedGrid { columns: u32 },
}

/// Main axis of a linear layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn main(self, size: Size) -> i32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    pub fn cross(self, size: Size) -> i32 {
        match self {
            Axis::Horizontal => size.height,
            Axis::Vertical => size.width,
        }
    }

    pub fn size(self, main: i32, cross: i32) -> Size {
        match self {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }

    pub fn point(self, main: i32, cross: i32) -> Point {
        match self {
            Axis::Horizontal => Point::new(main, cross),
            Axis::Vertical => Point::new(cross, main),
        }
    }

    /// Leading edge of `rect` along this axis.
    pub fn start(self, rect: Rect) -> i32 {
        match self {
            Axis::Horizontal => rect.x,
            Axis::Vertical => rect.y,
        }
    }

    /// Leading and trailing margin along this axis.
    pub fn margins(self, margin: BoxFields) -> (i32, i32) {
        match self {
            Axis::Horizontal => (margin.left, margin.right),
            Axis::Vertical => (margin.top, margin.bottom),
        }
    }

    /// The `(horizontal, vertical)` component that lies along this axis.
    pub fn pick<T>(self, pair: (T, T)) -> T {
        match self {
            Axis::Horizontal => pair.0,
            Axis::Vertical => pair.1,
        }
    }

    pub fn other(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_projection() {
        let size = Size::new(30, 10);
        assert_eq!(Axis::Horizontal.main(size), 30);
        assert_eq!(Axis::Vertical.main(size), 10);
        assert_eq!(Axis::Vertical.cross(size), 30);
        assert_eq!(Axis::Vertical.size(5, 7), Size::new(7, 5));
        assert_eq!(Axis::Horizontal.point(5, 7), Point::new(5, 7));
        assert_eq!(Axis::Horizontal.other(), Axis::Vertical);
        assert_eq!(Axis::Vertical.start(Rect::new(3, 4, 5, 6)), 4);
    }

    #[test]
    fn axis_margins() {
        let margin = BoxFields::new(1, 2, 3, 4);
        assert_eq!(Axis::Horizontal.margins(margin), (4, 2));
        assert_eq!(Axis::Vertical.margins(margin), (1, 3));
        assert_eq!(Axis::Vertical.pick((8, 9)), 9);
    }
}
