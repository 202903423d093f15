//! Annotation tool types and data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::drawable::{Drawable, DrawableId, ShapeKind};

/// Unique identifier for an annotation (creation time in epoch milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tools available in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Selection tool for selecting existing annotations
    #[default]
    Select,
    Rectangle,
    Circle,
    /// Freeform path tool
    Polygon,
}

impl Tool {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Rectangle => "Rectangle",
            Tool::Circle => "Circle",
            Tool::Polygon => "Polygon",
        }
    }

    /// Get all available tools.
    pub fn all() -> &'static [Tool] {
        &[Tool::Select, Tool::Rectangle, Tool::Circle, Tool::Polygon]
    }

    /// Check if this tool is a drawing tool (not Select).
    pub fn is_drawing_tool(&self) -> bool {
        !matches!(self, Tool::Select)
    }

    /// Shape produced by this tool, if it draws one.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            Tool::Select => None,
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Polygon => Some(ShapeKind::Polygon),
        }
    }
}

/// A committed annotation. Owns exactly one drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Unique identifier.
    pub id: AnnotationId,
    pub kind: ShapeKind,
    /// Display label, e.g. "Circle 2".
    pub label: String,
    pub drawable: Drawable,
}

impl Annotation {
    pub fn new(id: AnnotationId, label: impl Into<String>, drawable: Drawable) -> Self {
        Self {
            id,
            kind: drawable.kind,
            label: label.into(),
            drawable,
        }
    }

    pub fn drawable_id(&self) -> DrawableId {
        self.drawable.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_shape_kinds() {
        assert_eq!(Tool::Select.shape_kind(), None);
        assert_eq!(Tool::Polygon.shape_kind(), Some(ShapeKind::Polygon));
        assert_eq!(
            Tool::all().iter().filter(|t| t.is_drawing_tool()).count(),
            3
        );
    }

    #[test]
    fn test_annotation_id_display() {
        assert_eq!(AnnotationId(1_700_000_000_123).to_string(), "1700000000123");
    }
}
