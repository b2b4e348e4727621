//! Common geometry types used across the router

use std::fmt;

/// A point on the routing plane
pub type Point = nalgebra::Point2<f64>;

/// Orientation of a cardinal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The other axis
    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Cardinal direction a node was reached by.
///
/// Screen coordinates: `x` grows to the right and `y` grows downward, so
/// `TopToBottom` moves towards larger `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    LeftToRight,
    TopToBottom,
    RightToLeft,
    BottomToTop,
}

impl Direction {
    /// Candidate order used by the move generator. Creation indices (and so
    /// tie-breaks) depend on it.
    pub const ALL: [Direction; 4] = [
        Direction::LeftToRight,
        Direction::TopToBottom,
        Direction::RightToLeft,
        Direction::BottomToTop,
    ];

    pub fn axis(self) -> Axis {
        match self {
            Direction::LeftToRight | Direction::RightToLeft => Axis::Horizontal,
            Direction::TopToBottom | Direction::BottomToTop => Axis::Vertical,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::LeftToRight => Direction::RightToLeft,
            Direction::TopToBottom => Direction::BottomToTop,
            Direction::RightToLeft => Direction::LeftToRight,
            Direction::BottomToTop => Direction::TopToBottom,
        }
    }

    /// Unit lattice offset `(dx, dy)` of one step in this direction
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction::LeftToRight => (1, 0),
            Direction::TopToBottom => (0, 1),
            Direction::RightToLeft => (-1, 0),
            Direction::BottomToTop => (0, -1),
        }
    }

    /// Whether both directions lie on the same axis
    pub fn same_axis(self, other: Direction) -> bool {
        self.axis() == other.axis()
    }

    /// Direction of travel from `from` to `to` along `axis`, `None` when the
    /// two points do not differ on that axis.
    pub fn towards(from: Point, to: Point, axis: Axis) -> Option<Direction> {
        let delta = match axis {
            Axis::Horizontal => to.x - from.x,
            Axis::Vertical => to.y - from.y,
        };
        if delta == 0.0 {
            return None;
        }
        Some(match (axis, delta > 0.0) {
            (Axis::Horizontal, true) => Direction::LeftToRight,
            (Axis::Horizontal, false) => Direction::RightToLeft,
            (Axis::Vertical, true) => Direction::TopToBottom,
            (Axis::Vertical, false) => Direction::BottomToTop,
        })
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::LeftToRight => "→",
            Direction::TopToBottom => "↓",
            Direction::RightToLeft => "←",
            Direction::BottomToTop => "↑",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arrow())
    }
}

/// Axis-aligned rectangle. Containment includes the edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle spanning two corner points in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Rect {
            left,
            top,
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Rectangle of the given size centred on `center`
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    /// Grow the rectangle by `margin` on every side
    pub fn inflate(&self, margin: f64) -> Self {
        Rect::new(
            self.left - margin,
            self.top - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// A rectangle with zero width or height has no area
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// Integer lattice coordinate of a grid position, relative to the search start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey {
    pub x: i64,
    pub y: i64,
}

impl GridKey {
    pub fn new(x: i64, y: i64) -> Self {
        GridKey { x, y }
    }

    pub fn step(self, direction: Direction) -> GridKey {
        let (dx, dy) = direction.offset();
        GridKey::new(self.x + dx, self.y + dy)
    }
}
