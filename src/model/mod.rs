//! Data models for the annotation canvas.

mod annotation;
mod drawable;

pub use annotation::{Annotation, AnnotationId, Tool};
pub use drawable::{Drawable, DrawableId, Geometry, ShapeKind, Style, HIT_TOLERANCE};
