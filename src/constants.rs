//! Global constants for the medview viewer

/// Viewport zoom limits and steps.
pub mod zoom {
    /// Smallest allowed zoom factor
    pub const MIN: f32 = 0.5;
    /// Largest allowed zoom factor
    pub const MAX: f32 = 5.0;
    /// Step used by the zoom in/out buttons
    pub const STEP: f32 = 0.2;
    /// Base of the exponential wheel step (`zoom * BASE^delta_y`)
    pub const WHEEL_BASE: f32 = 0.999;
}

/// Drawing surface defaults.
pub mod canvas {
    /// Width used when the host container reports no size
    pub const DEFAULT_WIDTH: u32 = 1000;
    /// Height used when the host container reports no size
    pub const DEFAULT_HEIGHT: u32 = 700;
    /// Background fill behind the image
    pub const BACKGROUND: &str = "#1a1a1a";
    /// Fraction of the canvas a freshly loaded image may occupy
    pub const IMAGE_FIT_MARGIN: f32 = 0.9;
}

/// Stroke width shared by all annotation kinds.
pub const STROKE_WIDTH: f32 = 3.0;

/// Export title used when the image descriptor has none.
pub const DEFAULT_IMAGE_TITLE: &str = "Medical image";

/// Prefix of the exported annotations file name.
pub const EXPORT_FILE_PREFIX: &str = "annotations_";
