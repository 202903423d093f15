//! Geometry primitives in drawing-space coordinates.
//!
//! Drawing space is the coordinate system shapes are stored in. It differs
//! from screen space by the viewport transform (see [`crate::viewport`]).

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Vector from `origin` to this point.
    pub fn delta_from(&self, origin: Point) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// This point shifted by `(dx, dy)`.
    pub fn offset(&self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Zero-sized rectangle at `p`.
    pub fn at(p: Point) -> Self {
        Self {
            left: p.x,
            top: p.y,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Rectangle spanned by two corners in any order. The anchor flips to the
    /// pointer side when the drag goes up or left.
    pub fn from_corners(anchor: Point, pointer: Point) -> Self {
        Self {
            left: anchor.x.min(pointer.x),
            top: anchor.y.min(pointer.y),
            width: (pointer.x - anchor.x).abs(),
            height: (pointer.y - anchor.y).abs(),
        }
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }
}

/// One command of a freeform path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
}

impl PathCommand {
    pub fn point(&self) -> Point {
        match self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p,
        }
    }

    pub fn offset(&mut self, dx: f32, dy: f32) {
        match self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p = p.offset(dx, dy),
        }
    }

    /// SVG-style command letter.
    pub fn letter(&self) -> &'static str {
        match self {
            PathCommand::MoveTo(_) => "M",
            PathCommand::LineTo(_) => "L",
        }
    }
}

/// Serialized as `["M", x, y]` / `["L", x, y]`.
impl Serialize for PathCommand {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeTuple;
        let p = self.point();
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(self.letter())?;
        tuple.serialize_element(&p.x)?;
        tuple.serialize_element(&p.y)?;
        tuple.end()
    }
}

/// Distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f32::EPSILON {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Point-in-polygon test (ray casting). The polygon is implicitly closed.
pub fn polygon_contains(vertices: &[Point], p: Point) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];
        if ((vi.y > p.y) != (vj.y > p.y))
            && (p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
