//! The drawing surface: size, background and the render scene.

use crate::color_utils::Rgba;
use crate::loader::{ImagePlacement, ImageSource};
use crate::model::{AnnotationId, Drawable, DrawableId, Tool};
use crate::registry::AnnotationRegistry;
use crate::viewport::Transform;

/// The raster shown behind the annotations. Never selectable.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pub source: ImageSource,
    pub placement: ImagePlacement,
}

/// Canvas resources owned by a session.
#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: Rgba,
    image: Option<BackgroundImage>,
    next_drawable: u64,
    render_requests: u64,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba) -> Self {
        Self {
            width,
            height,
            background,
            image: None,
            next_drawable: 1,
            render_requests: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn set_background(&mut self, background: Rgba) {
        self.background = background;
    }

    pub fn image(&self) -> Option<&BackgroundImage> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: BackgroundImage) {
        self.image = Some(image);
    }

    /// Allocate a session-unique drawable id.
    pub fn next_drawable_id(&mut self) -> DrawableId {
        let id = DrawableId(self.next_drawable);
        self.next_drawable += 1;
        id
    }

    pub fn request_render(&mut self) {
        self.render_requests += 1;
    }

    /// Total render requests so far. Hosts compare against the last value
    /// they drew.
    pub fn render_requests(&self) -> u64 {
        self.render_requests
    }
}

/// One shape to draw, with its derived interaction flags.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneItem {
    pub drawable: Drawable,
    /// Owning annotation; None for the in-progress drawable
    pub annotation: Option<AnnotationId>,
    pub selectable: bool,
    pub selected: bool,
}

/// Everything a host needs to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
    pub image: Option<BackgroundImage>,
    pub transform: Transform,
    /// Bottom to top
    pub items: Vec<SceneItem>,
}

impl Scene {
    pub fn build(
        canvas: &Canvas,
        transform: Transform,
        registry: &AnnotationRegistry,
        tool: Tool,
        in_progress: Option<&Drawable>,
    ) -> Self {
        let selected = registry.selected();
        let mut items: Vec<SceneItem> = registry
            .iter()
            .map(|a| SceneItem {
                drawable: a.drawable.clone(),
                annotation: Some(a.id),
                selectable: tool == Tool::Select,
                selected: selected == Some(a.id),
            })
            .collect();

        if let Some(drawable) = in_progress {
            items.push(SceneItem {
                drawable: drawable.clone(),
                annotation: None,
                selectable: false,
                selected: false,
            });
        }

        Self {
            width: canvas.width,
            height: canvas.height,
            background: canvas.background,
            image: canvas.image.clone(),
            transform,
            items,
        }
    }
}
