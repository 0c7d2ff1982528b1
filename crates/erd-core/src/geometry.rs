//! Canvas-space geometry primitives and the containment test used for
//! connection snapping.

use serde::{Deserialize, Serialize};

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Shift by `(dx, dy)`.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle with the given top-left corner and size.
    pub fn from_origin(origin: Point, width: f32, height: f32) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict containment, see [`contains_point`].
    pub fn contains(&self, point: Point) -> bool {
        contains_point(self, point)
    }
}

/// True iff `point` lies strictly inside `rect`.
///
/// Points on any edge are outside, so a connection never snaps onto a block
/// border. Degenerate (zero or negative size) rectangles and NaN coordinates
/// contain nothing.
pub fn contains_point(rect: &Rect, point: Point) -> bool {
    point.x > rect.x && point.x < rect.right() && point.y > rect.y && point.y < rect.bottom()
}
