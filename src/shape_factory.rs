//! Builds the initial drawable for a drawing tool.

use crate::color_utils::Rgba;
use crate::constants::STROKE_WIDTH;
use crate::geometry::Point;
use crate::model::{Drawable, DrawableId, ShapeKind, Style, Tool};

pub const RECTANGLE_STYLE: Style = Style {
    fill: Rgba::rgba(255, 215, 0, 0.2),
    stroke: Rgba::rgb(0xFF, 0xD7, 0x00),
    stroke_width: STROKE_WIDTH,
};

pub const CIRCLE_STYLE: Style = Style {
    fill: Rgba::rgba(0, 255, 127, 0.2),
    stroke: Rgba::rgb(0x00, 0xFF, 0x7F),
    stroke_width: STROKE_WIDTH,
};

pub const POLYGON_STYLE: Style = Style {
    fill: Rgba::rgba(255, 99, 132, 0.2),
    stroke: Rgba::rgb(0xFF, 0x63, 0x84),
    stroke_width: STROKE_WIDTH,
};

/// Default style of each shape kind.
pub fn style_for(kind: ShapeKind) -> Style {
    match kind {
        ShapeKind::Rectangle => RECTANGLE_STYLE,
        ShapeKind::Circle => CIRCLE_STYLE,
        ShapeKind::Polygon => POLYGON_STYLE,
    }
}

/// Zero-sized drawable for `tool` anchored at `anchor` (drawing space).
///
/// Returns None for the select tool.
pub fn create(tool: Tool, anchor: Point, id: DrawableId) -> Option<Drawable> {
    let kind = tool.shape_kind()?;
    log::debug!(
        "✏️ New {} at ({:.1}, {:.1})",
        kind.display_name(),
        anchor.x,
        anchor.y
    );
    Some(Drawable::new(id, kind, anchor, style_for(kind)))
}
