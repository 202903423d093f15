//! Exported annotation snapshot.
//!
//! The JSON shape follows the canvas object model of the web viewer so the
//! files stay readable by the existing tooling:
//!
//! ```json
//! {
//!   "image": "Chest X-ray",
//!   "annotations": [
//!     { "id": 1700000000123, "type": "rectangle", "label": "Rectangle 1",
//!       "properties": { "type": "rect", "left": 10.0, "top": 10.0, ... } }
//!   ],
//!   "timestamp": "2024-02-29T12:34:56.789Z"
//! }
//! ```

use serde::Serialize;

use crate::constants::{DEFAULT_IMAGE_TITLE, EXPORT_FILE_PREFIX};
use crate::geometry::PathCommand;
use crate::model::{Annotation, AnnotationId, Geometry, ShapeKind, Style};
use crate::time;

/// Snapshot of every annotation on the current image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationExport {
    pub image: String,
    pub annotations: Vec<ExportedAnnotation>,
    /// ISO-8601 UTC with milliseconds
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedAnnotation {
    pub id: AnnotationId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub label: String,
    pub properties: ShapeProperties,
}

/// Geometry and style of one shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ShapeProperties {
    #[serde(rename = "rect", rename_all = "camelCase")]
    Rect {
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        fill: String,
        stroke: String,
        stroke_width: f32,
    },
    /// `left`/`top` are the corner of the circle's bounding box
    #[serde(rename = "circle", rename_all = "camelCase")]
    Circle {
        left: f32,
        top: f32,
        radius: f32,
        fill: String,
        stroke: String,
        stroke_width: f32,
    },
    #[serde(rename = "path", rename_all = "camelCase")]
    Path {
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        path: Vec<PathCommand>,
        fill: String,
        stroke: String,
        stroke_width: f32,
    },
}

impl ShapeProperties {
    fn from_annotation(annotation: &Annotation) -> Self {
        let drawable = &annotation.drawable;
        let Style {
            fill,
            stroke,
            stroke_width,
        } = drawable.style;
        let (fill, stroke) = (fill.to_css(), stroke.to_css());

        match &drawable.geometry {
            Geometry::Rectangle(rect) => ShapeProperties::Rect {
                left: rect.left,
                top: rect.top,
                width: rect.width,
                height: rect.height,
                fill,
                stroke,
                stroke_width,
            },
            Geometry::Circle { center, radius } => ShapeProperties::Circle {
                left: center.x - radius,
                top: center.y - radius,
                radius: *radius,
                fill,
                stroke,
                stroke_width,
            },
            Geometry::Path { commands } => {
                let bounds = drawable.bounds();
                ShapeProperties::Path {
                    left: bounds.left,
                    top: bounds.top,
                    width: bounds.width,
                    height: bounds.height,
                    path: commands.clone(),
                    fill,
                    stroke,
                    stroke_width,
                }
            }
        }
    }
}

impl AnnotationExport {
    /// Build a snapshot. `image` falls back to the default title when empty.
    pub fn new<'a>(
        image: Option<&str>,
        annotations: impl IntoIterator<Item = &'a Annotation>,
        millis: u64,
    ) -> Self {
        let image = image
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_IMAGE_TITLE)
            .to_string();

        Self {
            image,
            annotations: annotations
                .into_iter()
                .map(|a| ExportedAnnotation {
                    id: a.id,
                    kind: a.kind,
                    label: a.label.clone(),
                    properties: ShapeProperties::from_annotation(a),
                })
                .collect(),
            timestamp: time::iso8601(millis),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A downloadable export file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    /// `annotations_<millis>.json`
    pub file_name: String,
    pub contents: String,
}

impl ExportFile {
    pub fn new(export: &AnnotationExport, millis: u64) -> Result<Self, serde_json::Error> {
        Ok(Self {
            file_name: format!("{}{}.json", EXPORT_FILE_PREFIX, millis),
            contents: export.to_json()?,
        })
    }
}
