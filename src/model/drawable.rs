//! Drawables: the visual shapes shown on the canvas.

use serde::{Deserialize, Serialize};

use crate::color_utils::Rgba;
use crate::geometry::{self, PathCommand, Point, Rect};

/// Extra distance (drawing units) within which a stroke still counts as hit.
pub const HIT_TOLERANCE: f32 = 4.0;

/// Session-unique identifier of a drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(pub u64);

/// The kind of shape a drawable renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    /// Freeform path traced by the pointer
    Polygon,
}

impl ShapeKind {
    /// Name used in annotation labels.
    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Polygon => "Polygon",
        }
    }
}

/// Fill and stroke of a drawable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Rgba,
    pub stroke: Rgba,
    pub stroke_width: f32,
}

/// Shape geometry in drawing-space coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Rectangle(Rect),
    Circle { center: Point, radius: f32 },
    /// Move-to followed by line-tos, appended during the gesture
    Path { commands: Vec<PathCommand> },
}

/// A shape on the canvas.
///
/// While a gesture is in progress the drawable is owned by the interaction
/// state; once committed it is owned by its annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub id: DrawableId,
    pub kind: ShapeKind,
    /// Pointer-down position that started the gesture
    pub anchor: Point,
    pub geometry: Geometry,
    pub style: Style,
}

impl Drawable {
    /// Zero-sized drawable of `kind` at `anchor`.
    pub fn new(id: DrawableId, kind: ShapeKind, anchor: Point, style: Style) -> Self {
        let geometry = match kind {
            ShapeKind::Rectangle => Geometry::Rectangle(Rect::at(anchor)),
            ShapeKind::Circle => Geometry::Circle {
                center: anchor,
                radius: 0.0,
            },
            ShapeKind::Polygon => Geometry::Path {
                commands: vec![PathCommand::MoveTo(anchor)],
            },
        };
        Self {
            id,
            kind,
            anchor,
            geometry,
            style,
        }
    }

    /// Update the geometry for a pointer at `pointer` (drawing space).
    ///
    /// Rectangles span anchor and pointer, circles grow their radius to the
    /// pointer distance, paths append a line-to.
    pub fn drag_to(&mut self, pointer: Point) {
        if !pointer.is_finite() {
            return;
        }
        match &mut self.geometry {
            Geometry::Rectangle(rect) => *rect = Rect::from_corners(self.anchor, pointer),
            Geometry::Circle { radius, .. } => *radius = self.anchor.distance_to(pointer),
            Geometry::Path { commands } => commands.push(PathCommand::LineTo(pointer)),
        }
    }

    /// Shift the whole shape by `(dx, dy)` without changing its size.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.anchor = self.anchor.offset(dx, dy);
        match &mut self.geometry {
            Geometry::Rectangle(rect) => {
                rect.left += dx;
                rect.top += dy;
            }
            Geometry::Circle { center, .. } => *center = center.offset(dx, dy),
            Geometry::Path { commands } => {
                for command in commands.iter_mut() {
                    command.offset(dx, dy);
                }
            }
        }
    }

    /// Axis-aligned bounds of the geometry.
    pub fn bounds(&self) -> Rect {
        match &self.geometry {
            Geometry::Rectangle(rect) => *rect,
            Geometry::Circle { center, radius } => Rect {
                left: center.x - radius,
                top: center.y - radius,
                width: radius * 2.0,
                height: radius * 2.0,
            },
            Geometry::Path { commands } => {
                let mut points = commands.iter().map(PathCommand::point);
                let Some(first) = points.next() else {
                    return Rect::at(self.anchor);
                };
                let (min, max) = points.fold((first, first), |(min, max), p| {
                    (
                        Point::new(min.x.min(p.x), min.y.min(p.y)),
                        Point::new(max.x.max(p.x), max.y.max(p.y)),
                    )
                });
                Rect::from_corners(min, max)
            }
        }
    }

    /// Vertices of a path drawable, empty for other kinds.
    pub fn path_points(&self) -> Vec<Point> {
        match &self.geometry {
            Geometry::Path { commands } => commands.iter().map(PathCommand::point).collect(),
            _ => Vec::new(),
        }
    }

    /// Check if a drawing-space point hits this shape (fill or stroke).
    pub fn contains_point(&self, p: Point) -> bool {
        let slack = self.style.stroke_width / 2.0 + HIT_TOLERANCE;
        match &self.geometry {
            Geometry::Rectangle(rect) => Rect {
                left: rect.left - slack,
                top: rect.top - slack,
                width: rect.width + slack * 2.0,
                height: rect.height + slack * 2.0,
            }
            .contains(p),
            Geometry::Circle { center, radius } => center.distance_to(p) <= radius + slack,
            Geometry::Path { .. } => {
                let points = self.path_points();
                if geometry::polygon_contains(&points, p) {
                    return true;
                }
                match points.as_slice() {
                    [only] => only.distance_to(p) <= slack,
                    _ => points
                        .windows(2)
                        .any(|w| geometry::distance_to_segment(p, w[0], w[1]) <= slack),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> Style {
        Style {
            fill: Rgba::rgba(0, 0, 0, 0.2),
            stroke: Rgba::rgb(255, 255, 255),
            stroke_width: 2.0,
        }
    }

    fn drawable(kind: ShapeKind, x: f32, y: f32) -> Drawable {
        Drawable::new(DrawableId(1), kind, Point::new(x, y), style())
    }

    #[test]
    fn test_new_is_zero_sized() {
        let rect = drawable(ShapeKind::Rectangle, 5.0, 6.0);
        assert_eq!(rect.bounds(), Rect::at(Point::new(5.0, 6.0)));

        let circle = drawable(ShapeKind::Circle, 5.0, 6.0);
        assert_eq!(circle.bounds().area(), 0.0);

        let path = drawable(ShapeKind::Polygon, 5.0, 6.0);
        assert_eq!(path.path_points(), vec![Point::new(5.0, 6.0)]);
    }

    #[test]
    fn test_rectangle_drag_flips_anchor() {
        let mut rect = drawable(ShapeKind::Rectangle, 50.0, 50.0);
        rect.drag_to(Point::new(20.0, 90.0));
        assert_eq!(
            rect.geometry,
            Geometry::Rectangle(Rect {
                left: 20.0,
                top: 50.0,
                width: 30.0,
                height: 40.0
            })
        );
        // Anchor is kept for the next move
        rect.drag_to(Point::new(60.0, 60.0));
        assert_eq!(rect.bounds().left, 50.0);
        assert_eq!(rect.bounds().width, 10.0);
    }

    #[test]
    fn test_circle_radius_is_pointer_distance() {
        let mut circle = drawable(ShapeKind::Circle, 200.0, 200.0);
        circle.drag_to(Point::new(200.0, 280.0));
        assert_eq!(
            circle.geometry,
            Geometry::Circle {
                center: Point::new(200.0, 200.0),
                radius: 80.0
            }
        );
        circle.drag_to(Point::new(203.0, 204.0));
        assert!(matches!(circle.geometry, Geometry::Circle { radius, .. } if (radius - 5.0).abs() < 1e-5));
    }

    #[test]
    fn test_path_appends_line_to() {
        let mut path = drawable(ShapeKind::Polygon, 0.0, 0.0);
        path.drag_to(Point::new(10.0, 0.0));
        path.drag_to(Point::new(10.0, 10.0));
        let Geometry::Path { commands } = &path.geometry else {
            panic!("expected path geometry");
        };
        assert_eq!(
            commands,
            &vec![
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 10.0)),
            ]
        );
        assert_eq!(path.bounds(), Rect { left: 0.0, top: 0.0, width: 10.0, height: 10.0 });
    }

    #[test]
    fn test_non_finite_pointer_is_ignored() {
        let mut rect = drawable(ShapeKind::Rectangle, 1.0, 1.0);
        rect.drag_to(Point::new(f32::NAN, 3.0));
        assert_eq!(rect.bounds().area(), 0.0);
    }

    #[test]
    fn test_translate_keeps_size() {
        let mut rect = drawable(ShapeKind::Rectangle, 10.0, 10.0);
        rect.drag_to(Point::new(40.0, 30.0));
        rect.translate(5.0, 15.0);
        assert_eq!(rect.bounds(), Rect { left: 15.0, top: 25.0, width: 30.0, height: 20.0 });
        assert_eq!(rect.anchor, Point::new(15.0, 25.0));

        let mut circle = drawable(ShapeKind::Circle, 50.0, 50.0);
        circle.drag_to(Point::new(50.0, 130.0));
        circle.translate(-20.0, 0.0);
        assert_eq!(
            circle.geometry,
            Geometry::Circle {
                center: Point::new(30.0, 50.0),
                radius: 80.0
            }
        );

        let mut path = drawable(ShapeKind::Polygon, 0.0, 0.0);
        path.drag_to(Point::new(10.0, 0.0));
        path.translate(1.0, 2.0);
        assert_eq!(path.path_points(), vec![Point::new(1.0, 2.0), Point::new(11.0, 2.0)]);

        path.translate(f32::NAN, 0.0);
        assert_eq!(path.path_points()[0], Point::new(1.0, 2.0));
    }

    #[test]
    fn test_contains_point() {
        let mut rect = drawable(ShapeKind::Rectangle, 10.0, 10.0);
        rect.drag_to(Point::new(100.0, 80.0));
        assert!(rect.contains_point(Point::new(50.0, 50.0)));
        assert!(rect.contains_point(Point::new(8.0, 50.0)));
        assert!(!rect.contains_point(Point::new(150.0, 50.0)));

        let mut circle = drawable(ShapeKind::Circle, 0.0, 0.0);
        circle.drag_to(Point::new(30.0, 40.0));
        assert!(circle.contains_point(Point::new(10.0, 10.0)));
        assert!(!circle.contains_point(Point::new(60.0, 60.0)));

        let mut path = drawable(ShapeKind::Polygon, 0.0, 0.0);
        path.drag_to(Point::new(100.0, 0.0));
        assert!(path.contains_point(Point::new(50.0, 2.0)));
        assert!(!path.contains_point(Point::new(50.0, 30.0)));
    }
}
