//! The viewer session: one canvas, its viewport, annotations and gesture
//! state.
//!
//! All mutation goes through [`ViewerSession::handle_event`] or one of the
//! explicit operations below. Image loading is split into
//! [`ViewerSession::begin_load`] / [`ViewerSession::finish_load`] so the host
//! decides where decoding happens.

#[cfg(test)]
mod tests;

use crate::canvas::{BackgroundImage, Canvas, Scene};
use crate::color_utils::Rgba;
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::export::{AnnotationExport, ExportFile};
use crate::interaction::{DragPhase, Interaction, Surfaces, Transition, ViewerEvent};
use crate::loader::{
    self, DecodedImage, ImageDimensions, ImageSource, LoadError, LoadTicket, LoadTracker,
};
use crate::model::{Annotation, AnnotationId, Tool};
use crate::registry::AnnotationRegistry;
use crate::time;
use crate::viewport::Viewport;

/// Prompt shown before removing every annotation.
pub const CLEAR_ALL_PROMPT: &str = "Delete all annotations?";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// An interactive annotation canvas.
#[derive(Debug)]
pub struct ViewerSession {
    config: ViewerConfig,
    canvas: Canvas,
    viewport: Viewport,
    registry: AnnotationRegistry,
    interaction: Interaction,
    loads: LoadTracker,
}

impl ViewerSession {
    /// Create a session with the canvas size from `config`.
    pub fn new(config: ViewerConfig) -> Result<Self, ViewerError> {
        let (width, height) = (config.canvas.width, config.canvas.height);
        Self::with_size(config, width, height)
    }

    /// Create a session for a host container of `width` x `height`.
    ///
    /// A container that reports no size gets the configured default size.
    pub fn with_size(config: ViewerConfig, width: u32, height: u32) -> Result<Self, ViewerError> {
        config.validate()?;

        let width = if width == 0 { config.canvas.width } else { width };
        let height = if height == 0 { config.canvas.height } else { height };
        if width == 0 || height == 0 {
            log::error!("Canvas unavailable: {}x{}", width, height);
            return Err(ViewerError::CanvasUnavailable { width, height });
        }

        let background = Rgba::from_hex(&config.canvas.background)
            .unwrap_or(Rgba::rgb(0x1a, 0x1a, 0x1a));

        log::info!("🖥️ Viewer session created ({}x{})", width, height);

        Ok(Self {
            canvas: Canvas::new(width, height, background),
            viewport: Viewport::new(width, height, config.zoom),
            registry: AnnotationRegistry::new(),
            interaction: Interaction::new(),
            loads: LoadTracker::new(),
            config,
        })
    }

    /// Feed one input event through the interaction state machine.
    pub fn handle_event(&mut self, event: ViewerEvent) -> Transition {
        let transition = self.interaction.handle(
            event,
            Surfaces {
                viewport: &mut self.viewport,
                registry: &mut self.registry,
                canvas: &mut self.canvas,
                drawing_enabled: !self.loads.is_pending(),
            },
        );
        if transition.requests_render() {
            self.canvas.request_render();
        }
        transition
    }

    pub fn set_tool(&mut self, tool: Tool) -> Transition {
        self.handle_event(ViewerEvent::ToolChanged(tool))
    }

    // ========================================================================
    // Image loading
    // ========================================================================

    /// Register a load of `source`. Returns None when it is already shown or
    /// loading.
    pub fn begin_load(&mut self, source: ImageSource) -> Option<LoadTicket> {
        let url = source.url.clone();
        let ticket = self.loads.begin(source)?;
        log::info!("📂 Loading image {} (ticket {})", url, ticket.id());
        Some(ticket)
    }

    /// Complete a load. Returns Ok(false) for a superseded ticket.
    ///
    /// On success everything drawn on the previous image is discarded and the
    /// view is reset. On failure the canvas is left as it was.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ImageDimensions, LoadError>,
    ) -> Result<bool, ViewerError> {
        let placement = result.and_then(|dims| {
            loader::fit_image(
                dims,
                self.canvas.width(),
                self.canvas.height(),
                self.config.canvas.image_fit_margin,
            )
        });

        let Some(source) = self.loads.finish(ticket, placement.is_ok()) else {
            log::warn!("Ignoring result of superseded load {}", ticket.id());
            return Ok(false);
        };

        let placement = match placement {
            Ok(placement) => placement,
            Err(e) => {
                log::warn!("Failed to load {}: {}", source.url, e);
                return Err(e.into());
            }
        };

        self.interaction.cancel();
        let cleared = self.registry.clear();
        if let Some(background) = Rgba::from_hex(&self.config.canvas.background) {
            self.canvas.set_background(background);
        }
        log::info!(
            "🖼️ Loaded {} ({}x{}, scale {:.3}), discarded {} annotations",
            source.url,
            placement.dimensions.width,
            placement.dimensions.height,
            placement.scale,
            cleared
        );
        self.canvas.set_image(BackgroundImage { source, placement });
        self.viewport.reset();
        self.canvas.request_render();
        Ok(true)
    }

    /// Complete a load with decoded pixels. Returns the image when it was
    /// applied so the host can upload it for rendering.
    pub fn apply_decoded(
        &mut self,
        ticket: LoadTicket,
        result: Result<DecodedImage, LoadError>,
    ) -> Result<Option<DecodedImage>, ViewerError> {
        match result {
            Ok(image) => {
                let applied = self.finish_load(ticket, Ok(image.dimensions()))?;
                Ok(applied.then_some(image))
            }
            Err(e) => self.finish_load(ticket, Err(e)).map(|_| None),
        }
    }

    /// Load and decode in one step.
    pub fn load_image_bytes(
        &mut self,
        source: ImageSource,
        bytes: &[u8],
    ) -> Result<Option<DecodedImage>, ViewerError> {
        let Some(ticket) = self.begin_load(source) else {
            return Ok(None);
        };
        self.apply_decoded(ticket, loader::decode_image(bytes))
    }

    pub fn is_loading(&self) -> bool {
        self.loads.is_pending()
    }

    /// Descriptor of the image on the canvas.
    pub fn current_image(&self) -> Option<&ImageSource> {
        self.loads.displayed()
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    pub fn zoom_in(&mut self) -> bool {
        let changed = self.viewport.zoom_in();
        if changed {
            self.canvas.request_render();
        }
        changed
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.viewport.zoom_out();
        if changed {
            self.canvas.request_render();
        }
        changed
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.canvas.request_render();
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    /// Delete one annotation and its shape.
    pub fn delete_annotation(&mut self, id: AnnotationId) -> Result<Annotation, ViewerError> {
        let removed = self.registry.remove(id)?;
        self.canvas.request_render();
        Ok(removed)
    }

    /// Delete the selected annotation, if any.
    pub fn delete_selected(&mut self) -> Option<Annotation> {
        let id = self.registry.selected()?;
        self.delete_annotation(id).ok()
    }

    /// Remove every annotation once `confirm` agrees. Returns how many were
    /// removed.
    pub fn clear_annotations(&mut self, confirm: &mut impl Confirm) -> usize {
        if self.registry.is_empty() {
            return 0;
        }
        if !confirm.confirm(CLEAR_ALL_PROMPT) {
            log::debug!("Clear all declined");
            return 0;
        }
        let count = self.registry.clear();
        log::info!("🗑️ Cleared {} annotations", count);
        self.canvas.request_render();
        count
    }

    /// Select from a list (side panel) rather than the canvas.
    pub fn select_annotation(&mut self, id: Option<AnnotationId>) {
        self.registry.select(id);
    }

    pub fn selected(&self) -> Option<&Annotation> {
        self.registry.selected().and_then(|id| self.registry.get(id))
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.registry.iter()
    }

    pub fn annotation_count(&self) -> usize {
        self.registry.len()
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Snapshot as of `millis`.
    pub fn export_snapshot(&self, millis: u64) -> AnnotationExport {
        let title = self
            .loads
            .displayed()
            .and_then(|source| source.title.as_deref());
        self.registry.export(title, millis)
    }

    /// Download file for the current annotations.
    pub fn export(&self) -> Result<ExportFile, ViewerError> {
        let millis = time::now_millis();
        let file = ExportFile::new(&self.export_snapshot(millis), millis)?;
        log::info!(
            "💾 Exported {} annotations to {}",
            self.registry.len(),
            file.file_name
        );
        Ok(file)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// What to paint for the current state.
    pub fn scene(&self) -> Scene {
        Scene::build(
            &self.canvas,
            self.viewport.transform(),
            &self.registry,
            self.interaction.tool(),
            self.interaction.in_progress(),
        )
    }

    pub fn tool(&self) -> Tool {
        self.interaction.tool()
    }

    pub fn phase(&self) -> &DragPhase {
        self.interaction.phase()
    }

    pub fn zoom(&self) -> f32 {
        self.viewport.zoom()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn registry(&self) -> &AnnotationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        log::debug!(
            "Viewer session closed ({} annotations discarded)",
            self.registry.len()
        );
    }
}
