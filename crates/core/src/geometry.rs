//! Integer grid primitives shared by the canvas, the strategies, and the finished map.

use std::fmt;
use std::ops::{Add, RangeInclusive};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (1, -1),
            Direction::DownLeft => (-1, 1),
            Direction::DownRight => (1, 1),
        }
    }
}

impl Add<Direction> for Point {
    type Output = Point;

    fn add(self, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        Point { x: self.x + dx, y: self.y + dy }
    }
}

/// Width and height of a grid area. Both dimensions are positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self { width, height }
    }

    pub const fn area(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub const fn to_rect(self, origin: Point) -> Rectangle {
        Rectangle { origin, size: self }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// An axis-aligned rectangle. Every edge coordinate is inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub origin: Point,
    pub size: Size,
}

impl Rectangle {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Builds a rectangle from inclusive edges. Returns `None` if the edges cross.
    pub fn from_edges(top: i32, bottom: i32, left: i32, right: i32) -> Option<Self> {
        if bottom < top || right < left {
            return None;
        }
        Some(Self {
            origin: Point { x: left, y: top },
            size: Size { width: right - left + 1, height: bottom - top + 1 },
        })
    }

    pub const fn top(self) -> i32 {
        self.origin.y
    }

    pub const fn bottom(self) -> i32 {
        self.origin.y + self.size.height - 1
    }

    pub const fn left(self) -> i32 {
        self.origin.x
    }

    pub const fn right(self) -> i32 {
        self.origin.x + self.size.width - 1
    }

    pub const fn width(self) -> i32 {
        self.size.width
    }

    pub const fn height(self) -> i32 {
        self.size.height
    }

    pub const fn area(self) -> usize {
        self.size.area()
    }

    pub fn range_width(self) -> RangeInclusive<i32> {
        self.left()..=self.right()
    }

    pub fn range_height(self) -> RangeInclusive<i32> {
        self.top()..=self.bottom()
    }

    pub fn contains_point(self, point: Point) -> bool {
        self.range_width().contains(&point.x) && self.range_height().contains(&point.y)
    }

    pub fn contains_rect(self, other: Rectangle) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    pub fn intersects(self, other: Rectangle) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// Moves one edge to `value`, keeping the other three in place.
    ///
    /// Returns `None` if the moved edge would cross its opposite edge.
    pub fn replace(self, edge: Edge, value: i32) -> Option<Rectangle> {
        let (mut top, mut bottom, mut left, mut right) =
            (self.top(), self.bottom(), self.left(), self.right());
        match edge {
            Edge::Top => top = value,
            Edge::Bottom => bottom = value,
            Edge::Left => left = value,
            Edge::Right => right = value,
        }
        Rectangle::from_edges(top, bottom, left, right)
    }

    /// Every point of the rectangle in row-major scan order.
    pub fn iter_points(self) -> impl Iterator<Item = Point> {
        let columns = self.range_width();
        self.range_height().flat_map(move |y| columns.clone().map(move |x| Point { x, y }))
    }

    /// Row-major offset of `point` inside this rectangle.
    pub(crate) fn index_of(self, point: Point) -> Option<usize> {
        if !self.contains_point(point) {
            return None;
        }
        let column = (point.x - self.left()) as usize;
        let row = (point.y - self.top()) as usize;
        Some(row * (self.width() as usize) + column)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.size, self.origin)
    }
}
