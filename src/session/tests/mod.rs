//! Scenario tests for the viewer session.
//!
//! Each test drives a session the way a host would: raw pointer events,
//! toolbar actions and image loads.

mod gesture_tests;
mod panel_tests;

use std::io::Cursor;

use super::ViewerSession;
use crate::config::ViewerConfig;
use crate::geometry::Point;
use crate::interaction::{PointerButton, Transition, ViewerEvent};
use crate::model::{AnnotationId, Tool};

fn session() -> ViewerSession {
    ViewerSession::new(ViewerConfig::default()).unwrap()
}

fn down(session: &mut ViewerSession, x: f32, y: f32, button: PointerButton) -> Transition {
    session.handle_event(ViewerEvent::PointerDown {
        position: Point::new(x, y),
        button,
    })
}

fn move_to(session: &mut ViewerSession, x: f32, y: f32) -> Transition {
    session.handle_event(ViewerEvent::PointerMove {
        position: Point::new(x, y),
    })
}

fn up(session: &mut ViewerSession, x: f32, y: f32) -> Transition {
    session.handle_event(ViewerEvent::PointerUp {
        position: Point::new(x, y),
    })
}

/// Draw one shape with `tool` from `from` to `to` (screen space).
fn draw(session: &mut ViewerSession, tool: Tool, from: (f32, f32), to: (f32, f32)) -> AnnotationId {
    session.set_tool(tool);
    down(session, from.0, from.1, PointerButton::Primary);
    move_to(session, to.0, to.1);
    match up(session, to.0, to.1) {
        Transition::Committed(id) => id,
        other => panic!("expected a committed annotation, got {:?}", other),
    }
}

/// A small PNG encoded in memory.
fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 200, 200, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}
