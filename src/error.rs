//! Error types for viewer operations.

use thiserror::Error;

use crate::config::ConfigError;
use crate::loader::LoadError;
use crate::model::AnnotationId;

/// Errors that can occur while driving a viewer session.
///
/// None of these are fatal: each one is contained to the interaction that
/// triggered it and leaves the session usable.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// The image could not be fetched or decoded; the canvas is unchanged
    #[error("Failed to load image: {0}")]
    Load(#[from] LoadError),

    /// The rendering surface has no usable size
    #[error("Canvas unavailable ({width}x{height})")]
    CanvasUnavailable {
        /// Reported surface width
        width: u32,
        /// Reported surface height
        height: u32,
    },

    /// No annotation with this ID exists in the registry
    #[error("Annotation not found: {0}")]
    UnknownAnnotation(AnnotationId),

    /// The ID is already taken or leaves no room for later IDs
    #[error("Annotation ID not usable: {0}")]
    InvalidAnnotationId(AnnotationId),

    /// Export serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid viewer configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
