//! Browser bindings: drives a [`ViewerSession`] from a `<canvas>` element.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Element, Event, HtmlAnchorElement, HtmlCanvasElement,
    HtmlImageElement, MouseEvent, PointerEvent, WheelEvent,
};

use crate::config::ViewerConfig;
use crate::geometry::{PathCommand, Point};
use crate::interaction::{Transition, ViewerEvent};
use crate::loader::{ImageDimensions, ImageSource, LoadError};
use crate::model::{AnnotationId, Drawable, Geometry, Tool};
use crate::session::{ViewerSession, CLEAR_ALL_PROMPT};
use crate::{logging, ViewerError};

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// State shared between the exported handle and the DOM listeners.
struct ViewerState {
    session: ViewerSession,
    ctx: CanvasRenderingContext2d,
    /// Decoded background raster of the displayed image
    image: Option<HtmlImageElement>,
    last_render: u64,
}

impl ViewerState {
    fn dispatch(&mut self, event: ViewerEvent) -> Transition {
        let transition = self.session.handle_event(event);
        if matches!(transition, Transition::SelectionChanged(_)) {
            self.render();
        } else {
            self.render_if_requested();
        }
        transition
    }

    fn render_if_requested(&mut self) {
        if self.session.canvas().render_requests() != self.last_render {
            self.render();
        }
    }

    fn render(&mut self) {
        self.last_render = self.session.canvas().render_requests();
        if let Err(e) = self.paint() {
            log::error!("Render failed: {:?}", e);
        }
    }

    fn paint(&self) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let scene = self.session.scene();

        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.set_fill_style_str(&scene.background.to_css());
        ctx.fill_rect(0.0, 0.0, f64::from(scene.width), f64::from(scene.height));

        let t = scene.transform;
        ctx.set_transform(
            f64::from(t.zoom),
            0.0,
            0.0,
            f64::from(t.zoom),
            f64::from(t.pan_x),
            f64::from(t.pan_y),
        )?;

        if let (Some(background), Some(img)) = (&scene.image, &self.image) {
            let origin = background.placement.origin();
            let (w, h) = background.placement.scaled_size();
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                f64::from(origin.x),
                f64::from(origin.y),
                f64::from(w),
                f64::from(h),
            )?;
        }

        for item in &scene.items {
            paint_drawable(ctx, &item.drawable)?;
            if item.selected {
                let b = item.drawable.bounds();
                ctx.set_stroke_style_str("#FFFFFF");
                ctx.set_line_width(1.0 / f64::from(t.zoom));
                ctx.stroke_rect(
                    f64::from(b.left),
                    f64::from(b.top),
                    f64::from(b.width),
                    f64::from(b.height),
                );
            }
        }
        Ok(())
    }
}

fn paint_drawable(ctx: &CanvasRenderingContext2d, drawable: &Drawable) -> Result<(), JsValue> {
    ctx.set_fill_style_str(&drawable.style.fill.to_css());
    ctx.set_stroke_style_str(&drawable.style.stroke.to_css());
    ctx.set_line_width(f64::from(drawable.style.stroke_width));
    ctx.begin_path();

    match &drawable.geometry {
        Geometry::Rectangle(r) => ctx.rect(
            f64::from(r.left),
            f64::from(r.top),
            f64::from(r.width),
            f64::from(r.height),
        ),
        Geometry::Circle { center, radius } => ctx.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(*radius),
            0.0,
            std::f64::consts::TAU,
        )?,
        Geometry::Path { commands } => {
            for command in commands {
                let p = command.point();
                match command {
                    PathCommand::MoveTo(_) => ctx.move_to(f64::from(p.x), f64::from(p.y)),
                    PathCommand::LineTo(_) => ctx.line_to(f64::from(p.x), f64::from(p.y)),
                }
            }
        }
    }

    ctx.fill();
    ctx.stroke();
    Ok(())
}

fn event_position(event: &MouseEvent) -> Point {
    Point::new(event.offset_x() as f32, event.offset_y() as f32)
}

/// Translate a DOM event into a viewer event.
fn translate(event: &Event) -> Option<ViewerEvent> {
    match event.type_().as_str() {
        "wheel" => {
            let wheel = event.dyn_ref::<WheelEvent>()?;
            Some(ViewerEvent::Wheel {
                position: event_position(wheel),
                delta_y: wheel.delta_y() as f32,
            })
        }
        kind => {
            let pointer = event.dyn_ref::<PointerEvent>()?;
            ViewerEvent::from_dom_pointer(
                kind,
                event_position(pointer),
                pointer.button(),
                pointer.buttons(),
            )
        }
    }
}

/// Route the rest of the gesture to the canvas even when the pointer leaves
/// it, so the release is always seen.
fn capture_pointer(event: &Event) {
    let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
        return;
    };
    let Some(target) = event.current_target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };
    if let Err(e) = target.set_pointer_capture(pointer.pointer_id()) {
        log::warn!("Pointer capture failed: {:?}", e);
    }
}

const LISTENED_EVENTS: [&str; 7] = [
    "pointerdown",
    "pointermove",
    "pointerup",
    "pointercancel",
    "lostpointercapture",
    "wheel",
    "contextmenu",
];

/// Annotation viewer bound to a canvas element.
#[wasm_bindgen]
pub struct WasmViewer {
    state: Rc<RefCell<ViewerState>>,
    canvas: HtmlCanvasElement,
    listener: Closure<dyn FnMut(Event)>,
}

#[wasm_bindgen]
impl WasmViewer {
    /// Bind to the `<canvas>` with id `canvas_id`, sized to its container.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WasmViewer, JsValue> {
        let config = ViewerConfig::load_or_default();
        logging::init(config.log_level);

        let document = window()?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| js_error(format!("canvas '{}' not found", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()?;

        let (width, height) = canvas
            .parent_element()
            .map(|p| (p.client_width().max(0) as u32, p.client_height().max(0) as u32))
            .unwrap_or((0, 0));

        let session = ViewerSession::with_size(config, width, height).map_err(js_error)?;
        canvas.set_width(session.canvas().width());
        canvas.set_height(session.canvas().height());

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| {
                js_error(ViewerError::CanvasUnavailable {
                    width: session.canvas().width(),
                    height: session.canvas().height(),
                })
            })?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let state = Rc::new(RefCell::new(ViewerState {
            session,
            ctx,
            image: None,
            last_render: 0,
        }));

        let listener_state = Rc::clone(&state);
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if event.type_() == "contextmenu" {
                event.prevent_default();
                return;
            }
            let Some(viewer_event) = translate(&event) else {
                return;
            };
            match viewer_event {
                ViewerEvent::Wheel { .. } => event.prevent_default(),
                ViewerEvent::PointerDown { .. } => capture_pointer(&event),
                _ => {}
            }
            let transition = listener_state.borrow_mut().dispatch(viewer_event);
            if transition.suppresses_context_menu() {
                event.prevent_default();
            }
        });

        for name in LISTENED_EVENTS {
            canvas.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        }

        state.borrow_mut().render();
        log::info!("🖥️ Viewer bound to #{}", canvas_id);

        Ok(WasmViewer {
            state,
            canvas,
            listener,
        })
    }

    /// Select a tool: "select", "rectangle", "circle" or "polygon".
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&self, name: &str) -> Result<(), JsValue> {
        let tool = Tool::all()
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| js_error(format!("unknown tool '{}'", name)))?;
        self.state.borrow_mut().dispatch(ViewerEvent::ToolChanged(tool));
        Ok(())
    }

    /// Display the image at `url`. Decode errors are alerted to the user.
    #[wasm_bindgen(js_name = loadImage)]
    pub fn load_image(
        &self,
        url: &str,
        title: Option<String>,
        pathology_type: Option<String>,
    ) -> Result<(), JsValue> {
        let source = ImageSource {
            url: url.to_string(),
            title,
            pathology_type,
        };
        let Some(ticket) = self.state.borrow_mut().session.begin_load(source) else {
            return Ok(());
        };

        let img = HtmlImageElement::new()?;
        img.set_cross_origin(Some("anonymous"));

        let onload = {
            let state = Rc::clone(&self.state);
            let img = img.clone();
            Closure::once_into_js(move || {
                let dims = ImageDimensions::new(img.natural_width(), img.natural_height());
                let result = {
                    let mut state = state.borrow_mut();
                    let result = state.session.finish_load(ticket, Ok(dims));
                    if let Ok(true) = result {
                        state.image = Some(img);
                        state.render();
                    }
                    result
                };
                // The modal runs with the state released
                if let Err(e) = result {
                    alert(&e.to_string());
                }
            })
        };
        let onerror = {
            let state = Rc::clone(&self.state);
            let url = url.to_string();
            Closure::once_into_js(move || {
                let error = LoadError::Fetch {
                    url,
                    reason: "the browser could not load the image".to_string(),
                };
                let result = state.borrow_mut().session.finish_load(ticket, Err(error));
                if let Err(e) = result {
                    alert(&e.to_string());
                }
            })
        };

        img.set_onload(Some(onload.unchecked_ref()));
        img.set_onerror(Some(onerror.unchecked_ref()));
        img.set_src(url);
        Ok(())
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) {
        let mut state = self.state.borrow_mut();
        state.session.zoom_in();
        state.render_if_requested();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) {
        let mut state = self.state.borrow_mut();
        state.session.zoom_out();
        state.render_if_requested();
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&self) {
        let mut state = self.state.borrow_mut();
        state.session.reset_view();
        state.render_if_requested();
    }

    /// Current zoom factor (1.0 = 100%).
    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f32 {
        self.state.borrow().session.zoom()
    }

    #[wasm_bindgen(js_name = deleteAnnotation)]
    pub fn delete_annotation(&self, id: f64) -> Result<(), JsValue> {
        let mut state = self.state.borrow_mut();
        state
            .session
            .delete_annotation(AnnotationId(id as u64))
            .map_err(js_error)?;
        state.render_if_requested();
        Ok(())
    }

    #[wasm_bindgen(js_name = selectAnnotation)]
    pub fn select_annotation(&self, id: Option<f64>) {
        let mut state = self.state.borrow_mut();
        state
            .session
            .select_annotation(id.map(|id| AnnotationId(id as u64)));
        state.render();
    }

    /// Remove all annotations after `window.confirm`.
    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&self) -> usize {
        if self.state.borrow().session.annotation_count() == 0 {
            return 0;
        }
        let agreed = window()
            .and_then(|w| w.confirm_with_message(CLEAR_ALL_PROMPT))
            .unwrap_or(false);

        let mut state = self.state.borrow_mut();
        let removed = state.session.clear_annotations(&mut |_: &str| agreed);
        state.render_if_requested();
        removed
    }

    /// Side panel rows as JSON: `[{"id", "type", "label"}]`.
    #[wasm_bindgen(js_name = annotationsJson)]
    pub fn annotations_json(&self) -> Result<String, JsValue> {
        let state = self.state.borrow();
        let rows: Vec<_> = state
            .session
            .annotations()
            .map(|a| {
                serde_json::json!({
                    "id": a.id,
                    "type": a.kind,
                    "label": a.label,
                    "selected": state.session.registry().selected() == Some(a.id),
                })
            })
            .collect();
        serde_json::to_string(&rows).map_err(js_error)
    }

    /// Download the annotations as `annotations_<timestamp>.json`.
    #[wasm_bindgen(js_name = exportAnnotations)]
    pub fn export_annotations(&self) -> Result<(), JsValue> {
        let file = self.state.borrow().session.export().map_err(js_error)?;

        let parts = js_sys::Array::of1(&JsValue::from_str(&file.contents));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type("application/json");
        let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)?;
        let href = web_sys::Url::create_object_url_with_blob(&blob)?;

        let anchor = window()?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()?;
        anchor.set_href(&href);
        anchor.set_download(&file.file_name);
        anchor.click();
        web_sys::Url::revoke_object_url(&href)?;
        Ok(())
    }
}

impl Drop for WasmViewer {
    fn drop(&mut self) {
        for name in LISTENED_EVENTS {
            let _ = self
                .canvas
                .remove_event_listener_with_callback(name, self.listener.as_ref().unchecked_ref());
        }
        log::debug!("Viewer unbound from canvas");
    }
}

fn alert(message: &str) {
    log::warn!("{}", message);
    if let Ok(w) = window() {
        let _ = w.alert_with_message(message);
    }
}
