//! medview - interactive annotation canvas for medical images.
//!
//! A [`ViewerSession`] owns one canvas: the background image, a pan/zoom
//! viewport, the annotations drawn on top of it and the gesture in progress.
//! Hosts feed it pointer and wheel events and paint the [`Scene`] it
//! produces. In the browser, `WasmViewer` does both against a
//! `<canvas>` element.

pub mod canvas;
pub mod color_utils;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod geometry;
pub mod interaction;
pub mod loader;
pub mod logging;
pub mod model;
pub mod registry;
pub mod session;
pub mod shape_factory;
pub mod time;
pub mod viewport;

pub use canvas::{Scene, SceneItem};
pub use config::{LogLevel, ViewerConfig};
pub use error::ViewerError;
pub use export::{AnnotationExport, ExportFile};
pub use interaction::{PointerButton, Transition, ViewerEvent};
pub use loader::{ImageSource, LoadError, LoadTicket};
pub use model::{Annotation, AnnotationId, Tool};
pub use session::{Confirm, ViewerSession};

// WASM entry point
#[cfg(target_arch = "wasm32")]
pub mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::WasmViewer;
