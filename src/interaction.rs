//! Interaction state machine: routes pointer, wheel, tool and selection
//! events to the viewport, the registry and the in-progress drawable.
//!
//! Positions in events are screen coordinates relative to the canvas
//! element; the machine converts them to drawing space itself.

use crate::canvas::Canvas;
use crate::geometry::Point;
use crate::model::{AnnotationId, Drawable, DrawableId, Tool};
use crate::registry::AnnotationRegistry;
use crate::shape_factory;
use crate::viewport::Viewport;

/// Mouse button of a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    /// Middle button / wheel press
    Auxiliary,
    Secondary,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(PointerButton::Primary),
            1 => Some(PointerButton::Auxiliary),
            2 => Some(PointerButton::Secondary),
            _ => None,
        }
    }
}

/// Input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    PointerDown { position: Point, button: PointerButton },
    PointerMove { position: Point },
    PointerUp { position: Point },
    Wheel { position: Point, delta_y: f32 },
    ToolChanged(Tool),
    /// The host picked a drawable (e.g. through its own selection UI)
    ObjectSelected(DrawableId),
    SelectionCleared,
}

impl ViewerEvent {
    /// Map a DOM pointer event by its type name.
    ///
    /// `button` is `PointerEvent.button`, `buttons` the held-button mask. A
    /// cancelled pointer, lost capture or a move with nothing held all end
    /// the gesture, so a release outside the canvas cannot leave one open.
    pub fn from_dom_pointer(kind: &str, position: Point, button: i16, buttons: u16) -> Option<Self> {
        match kind {
            "pointerdown" => Some(ViewerEvent::PointerDown {
                position,
                button: PointerButton::from_dom(button)?,
            }),
            "pointermove" if buttons == 0 => Some(ViewerEvent::PointerUp { position }),
            "pointermove" => Some(ViewerEvent::PointerMove { position }),
            "pointerup" | "pointercancel" | "lostpointercapture" => {
                Some(ViewerEvent::PointerUp { position })
            }
            _ => None,
        }
    }
}

/// Current gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Owns the in-progress drawable until pointer-up
    Drawing(Drawable),
    /// Last pointer position in screen space
    Panning { last: Point },
    /// Dragging a committed annotation with the select tool; `last` is in
    /// drawing space
    Moving { annotation: AnnotationId, last: Point },
}

/// What an event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Event had no effect in the current state
    Ignored,
    DrawingStarted(DrawableId),
    ShapeUpdated(DrawableId),
    Committed(AnnotationId),
    PanStarted {
        /// In-progress drawable thrown away by the pan
        discarded: Option<DrawableId>,
    },
    Panned,
    PanEnded,
    /// The annotation's shape was shifted
    Moved(AnnotationId),
    MoveEnded(AnnotationId),
    Zoomed,
    ToolChanged {
        tool: Tool,
        discarded: Option<DrawableId>,
    },
    SelectionChanged(Option<AnnotationId>),
}

impl Transition {
    /// Geometry or viewport changed.
    pub fn requests_render(&self) -> bool {
        match self {
            Transition::Ignored
            | Transition::PanEnded
            | Transition::MoveEnded(_)
            | Transition::SelectionChanged(_) => false,
            Transition::PanStarted { discarded } | Transition::ToolChanged { discarded, .. } => {
                discarded.is_some()
            }
            Transition::DrawingStarted(_)
            | Transition::ShapeUpdated(_)
            | Transition::Committed(_)
            | Transition::Panned
            | Transition::Moved(_)
            | Transition::Zoomed => true,
        }
    }

    /// The host should suppress the browser context menu.
    pub fn suppresses_context_menu(&self) -> bool {
        matches!(self, Transition::PanStarted { .. })
    }
}

/// Session state the machine mutates.
pub struct Surfaces<'a> {
    pub viewport: &'a mut Viewport,
    pub registry: &'a mut AnnotationRegistry,
    pub canvas: &'a mut Canvas,
    /// False while an image load is pending
    pub drawing_enabled: bool,
}

/// Tool selection and drag phase.
#[derive(Debug, Default)]
pub struct Interaction {
    tool: Tool,
    phase: DragPhase,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// The drawable of the gesture in progress, if any.
    pub fn in_progress(&self) -> Option<&Drawable> {
        match &self.phase {
            DragPhase::Drawing(drawable) => Some(drawable),
            _ => None,
        }
    }

    /// Drop any gesture in progress without committing it.
    pub fn cancel(&mut self) -> Option<DrawableId> {
        match std::mem::take(&mut self.phase) {
            DragPhase::Drawing(drawable) => {
                log::debug!("✖️ Discarded in-progress {}", drawable.kind.display_name());
                Some(drawable.id)
            }
            DragPhase::Moving { annotation, .. } => {
                log::debug!("✖️ Move of annotation {} ended early", annotation);
                None
            }
            _ => None,
        }
    }

    pub fn handle(&mut self, event: ViewerEvent, surfaces: Surfaces<'_>) -> Transition {
        match event {
            ViewerEvent::PointerDown { position, button } => {
                self.pointer_down(position, button, surfaces)
            }
            ViewerEvent::PointerMove { position } => self.pointer_move(position, surfaces),
            ViewerEvent::PointerUp { .. } => self.pointer_up(surfaces),
            ViewerEvent::Wheel { position, delta_y } => {
                if surfaces.viewport.wheel(position, delta_y) {
                    Transition::Zoomed
                } else {
                    Transition::Ignored
                }
            }
            ViewerEvent::ToolChanged(tool) => self.change_tool(tool),
            ViewerEvent::ObjectSelected(drawable) => {
                if self.tool != Tool::Select {
                    return Transition::Ignored;
                }
                match surfaces.registry.find_by_drawable(drawable) {
                    Some(id) => {
                        surfaces.registry.select(Some(id));
                        Transition::SelectionChanged(Some(id))
                    }
                    None => Transition::Ignored,
                }
            }
            ViewerEvent::SelectionCleared => {
                surfaces.registry.select(None);
                Transition::SelectionChanged(None)
            }
        }
    }

    fn pointer_down(
        &mut self,
        position: Point,
        button: PointerButton,
        surfaces: Surfaces<'_>,
    ) -> Transition {
        if !position.is_finite() {
            return Transition::Ignored;
        }

        if matches!(button, PointerButton::Auxiliary | PointerButton::Secondary) {
            let discarded = self.cancel();
            self.phase = DragPhase::Panning { last: position };
            log::debug!("✋ Pan started at ({:.1}, {:.1})", position.x, position.y);
            return Transition::PanStarted { discarded };
        }

        if !matches!(self.phase, DragPhase::Idle) {
            return Transition::Ignored;
        }

        let point = surfaces.viewport.screen_to_drawing(position);

        if self.tool == Tool::Select {
            let hit = surfaces.registry.hit_test(point);
            surfaces.registry.select(hit);
            log::debug!("👆 Select at ({:.1}, {:.1}): {:?}", point.x, point.y, hit);
            if let Some(annotation) = hit {
                self.phase = DragPhase::Moving {
                    annotation,
                    last: point,
                };
            }
            return Transition::SelectionChanged(hit);
        }

        if !surfaces.drawing_enabled {
            log::debug!("Drawing ignored while an image is loading");
            return Transition::Ignored;
        }

        let id = surfaces.canvas.next_drawable_id();
        match shape_factory::create(self.tool, point, id) {
            Some(drawable) => {
                self.phase = DragPhase::Drawing(drawable);
                Transition::DrawingStarted(id)
            }
            None => Transition::Ignored,
        }
    }

    fn pointer_move(&mut self, position: Point, surfaces: Surfaces<'_>) -> Transition {
        if !position.is_finite() {
            return Transition::Ignored;
        }
        match &mut self.phase {
            DragPhase::Idle => Transition::Ignored,
            DragPhase::Drawing(drawable) => {
                let point = surfaces.viewport.screen_to_drawing(position);
                drawable.drag_to(point);
                log::trace!(
                    "✏️ {} drag to ({:.1}, {:.1})",
                    drawable.kind.display_name(),
                    point.x,
                    point.y
                );
                Transition::ShapeUpdated(drawable.id)
            }
            DragPhase::Panning { last } => {
                let (dx, dy) = position.delta_from(*last);
                *last = position;
                surfaces.viewport.pan_by(dx, dy);
                Transition::Panned
            }
            DragPhase::Moving { annotation, last } => {
                let point = surfaces.viewport.screen_to_drawing(position);
                let (dx, dy) = point.delta_from(*last);
                if dx == 0.0 && dy == 0.0 {
                    return Transition::Ignored;
                }
                *last = point;
                match surfaces.registry.translate(*annotation, dx, dy) {
                    Ok(()) => Transition::Moved(*annotation),
                    // Deleted mid-drag
                    Err(_) => Transition::Ignored,
                }
            }
        }
    }

    fn pointer_up(&mut self, surfaces: Surfaces<'_>) -> Transition {
        match std::mem::take(&mut self.phase) {
            DragPhase::Idle => Transition::Ignored,
            DragPhase::Drawing(drawable) => {
                Transition::Committed(surfaces.registry.commit(drawable))
            }
            DragPhase::Panning { .. } => {
                log::debug!("✋ Pan ended");
                Transition::PanEnded
            }
            DragPhase::Moving { annotation, .. } => {
                log::debug!("✋ Moved annotation {}", annotation);
                Transition::MoveEnded(annotation)
            }
        }
    }

    fn change_tool(&mut self, tool: Tool) -> Transition {
        let discarded = if matches!(self.phase, DragPhase::Drawing(_) | DragPhase::Moving { .. }) {
            self.cancel()
        } else {
            None
        };
        if self.tool != tool {
            log::debug!("🛠️ Tool: {} -> {}", self.tool.name(), tool.name());
        }
        self.tool = tool;
        Transition::ToolChanged { tool, discarded }
    }
}
