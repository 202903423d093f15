//! Drawing, panning and zooming through pointer events.

use super::*;
use crate::geometry::Rect;
use crate::interaction::DragPhase;
use crate::model::{Geometry, ShapeKind};

#[test]
fn test_rectangle_scenario() {
    let mut s = session();
    let id = draw(&mut s, Tool::Rectangle, (10.0, 10.0), (100.0, 80.0));

    assert_eq!(s.annotation_count(), 1);
    let annotation = s.registry().get(id).unwrap();
    assert_eq!(annotation.kind, ShapeKind::Rectangle);
    assert_eq!(annotation.label, "Rectangle 1");
    assert_eq!(
        annotation.drawable.geometry,
        Geometry::Rectangle(Rect {
            left: 10.0,
            top: 10.0,
            width: 90.0,
            height: 70.0
        })
    );
}

#[test]
fn test_circle_scenario() {
    let mut s = session();
    let id = draw(&mut s, Tool::Circle, (200.0, 200.0), (200.0, 280.0));

    let annotation = s.registry().get(id).unwrap();
    assert_eq!(annotation.label, "Circle 1");
    assert_eq!(
        annotation.drawable.geometry,
        Geometry::Circle {
            center: Point::new(200.0, 200.0),
            radius: 80.0
        }
    );
}

#[test]
fn test_circle_radius_from_pointer_distance() {
    let mut s = session();
    let id = draw(&mut s, Tool::Circle, (50.0, 50.0), (50.0, 130.0));

    assert_eq!(
        s.registry().get(id).unwrap().drawable.geometry,
        Geometry::Circle {
            center: Point::new(50.0, 50.0),
            radius: 80.0
        }
    );
}

#[test]
fn test_move_selected_annotation_scenario() {
    let mut s = session();
    let id = draw(&mut s, Tool::Rectangle, (10.0, 10.0), (100.0, 80.0));
    s.set_tool(Tool::Select);

    let renders = s.canvas().render_requests();
    assert_eq!(
        down(&mut s, 50.0, 50.0, PointerButton::Primary),
        Transition::SelectionChanged(Some(id))
    );
    assert_eq!(move_to(&mut s, 80.0, 70.0), Transition::Moved(id));
    assert_eq!(up(&mut s, 80.0, 70.0), Transition::MoveEnded(id));
    assert!(s.canvas().render_requests() > renders);

    assert_eq!(s.annotation_count(), 1);
    assert_eq!(s.selected().map(|a| a.id), Some(id));
    let value: serde_json::Value =
        serde_json::from_str(&s.export_snapshot(0).to_json().unwrap()).unwrap();
    let properties = &value["annotations"][0]["properties"];
    assert_eq!(properties["left"], 40.0);
    assert_eq!(properties["top"], 30.0);
    assert_eq!(properties["width"], 90.0);
    assert_eq!(properties["height"], 70.0);
}

#[test]
fn test_secondary_button_pan_scenario() {
    let mut s = session();
    s.set_tool(Tool::Rectangle);

    let started = down(&mut s, 100.0, 100.0, PointerButton::Secondary);
    assert!(started.suppresses_context_menu());
    move_to(&mut s, 130.0, 90.0);
    assert_eq!(up(&mut s, 130.0, 90.0), Transition::PanEnded);

    assert_eq!(s.viewport().pan(), (30.0, -10.0));
    assert_eq!(s.zoom(), 1.0);
    assert_eq!(s.annotation_count(), 0);
    assert_eq!(*s.phase(), DragPhase::Idle);
}

#[test]
fn test_labels_number_all_kinds_together() {
    let mut s = session();
    draw(&mut s, Tool::Rectangle, (0.0, 0.0), (10.0, 10.0));
    draw(&mut s, Tool::Circle, (50.0, 50.0), (60.0, 60.0));
    let path = draw(&mut s, Tool::Polygon, (100.0, 100.0), (120.0, 130.0));

    assert_eq!(s.registry().get(path).unwrap().label, "Polygon 3");
    let labels: Vec<_> = s.annotations().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, ["Rectangle 1", "Circle 2", "Polygon 3"]);
}

#[test]
fn test_freeform_path_collects_every_move() {
    let mut s = session();
    s.set_tool(Tool::Polygon);
    down(&mut s, 0.0, 0.0, PointerButton::Primary);
    for i in 1..=5 {
        move_to(&mut s, i as f32 * 10.0, (i * i) as f32);
    }
    let Transition::Committed(id) = up(&mut s, 50.0, 25.0) else {
        panic!("expected commit");
    };
    let points = s.registry().get(id).unwrap().drawable.path_points();
    assert_eq!(points.len(), 6);
    assert_eq!(points[0], Point::new(0.0, 0.0));
    assert_eq!(points[5], Point::new(50.0, 25.0));
}

#[test]
fn test_mirrored_drags_have_equal_area() {
    let mut s = session();
    let a = draw(&mut s, Tool::Rectangle, (300.0, 300.0), (360.0, 340.0));
    let b = draw(&mut s, Tool::Rectangle, (300.0, 300.0), (240.0, 260.0));

    let ra = s.registry().get(a).unwrap().drawable.bounds();
    let rb = s.registry().get(b).unwrap().drawable.bounds();
    assert_eq!(ra.area(), rb.area());
    assert!(rb.width >= 0.0 && rb.height >= 0.0);
    assert_eq!((rb.left, rb.top), (240.0, 260.0));
}

#[test]
fn test_annotation_count_tracks_gestures() {
    let mut s = session();
    let mut expected = 0usize;
    let tools = [Tool::Rectangle, Tool::Circle, Tool::Polygon];

    for round in 0..12u8 {
        let tool = tools[usize::from(round) % tools.len()];
        let offset = f32::from(round) * 7.0;
        let id = draw(&mut s, tool, (offset, offset), (offset + 20.0, offset + 15.0));
        expected += 1;

        if round % 4 == 3 {
            s.delete_annotation(id).unwrap();
            expected -= 1;
        }
        if round == 7 {
            expected -= s.clear_annotations(&mut |_: &str| true);
        }
        // A pan between gestures never adds annotations
        down(&mut s, 5.0, 5.0, PointerButton::Auxiliary);
        move_to(&mut s, 6.0, 6.0);
        up(&mut s, 6.0, 6.0);

        assert_eq!(s.annotation_count(), expected);
    }
}

#[test]
fn test_drawing_after_zoom_and_pan_lands_in_drawing_space() {
    let mut s = session();
    s.zoom_in();
    s.zoom_in();
    down(&mut s, 0.0, 0.0, PointerButton::Secondary);
    move_to(&mut s, 40.0, 20.0);
    up(&mut s, 40.0, 20.0);

    let screen_from = Point::new(400.0, 300.0);
    let screen_to = Point::new(480.0, 380.0);
    let expected_from = s.viewport().screen_to_drawing(screen_from);
    let expected_to = s.viewport().screen_to_drawing(screen_to);

    let id = draw(&mut s, Tool::Rectangle, (400.0, 300.0), (480.0, 380.0));
    let bounds = s.registry().get(id).unwrap().drawable.bounds();
    assert!((bounds.left - expected_from.x).abs() < 1e-3);
    assert!((bounds.top - expected_from.y).abs() < 1e-3);
    assert!((bounds.width - (expected_to.x - expected_from.x)).abs() < 1e-3);
}

#[test]
fn test_tool_change_mid_gesture_discards_drawable() {
    let mut s = session();
    s.set_tool(Tool::Circle);
    down(&mut s, 10.0, 10.0, PointerButton::Primary);
    move_to(&mut s, 40.0, 10.0);
    assert!(s.scene().items.iter().any(|item| item.annotation.is_none()));

    s.set_tool(Tool::Select);
    up(&mut s, 40.0, 10.0);

    assert_eq!(s.annotation_count(), 0);
    assert!(s.scene().items.is_empty());
}

#[test]
fn test_wheel_zoom_is_clamped() {
    let mut s = session();
    for _ in 0..20 {
        s.handle_event(ViewerEvent::Wheel {
            position: Point::new(500.0, 350.0),
            delta_y: -1000.0,
        });
        assert!(s.zoom() <= 5.0);
    }
    assert_eq!(s.zoom(), 5.0);
    for _ in 0..20 {
        s.handle_event(ViewerEvent::Wheel {
            position: Point::new(500.0, 350.0),
            delta_y: 1000.0,
        });
        assert!(s.zoom() >= 0.5);
    }
    assert_eq!(s.zoom(), 0.5);
}

#[test]
fn test_reset_view_restores_identity() {
    let mut s = session();
    s.handle_event(ViewerEvent::Wheel {
        position: Point::new(120.0, 80.0),
        delta_y: -400.0,
    });
    down(&mut s, 0.0, 0.0, PointerButton::Auxiliary);
    move_to(&mut s, 25.0, 25.0);
    up(&mut s, 25.0, 25.0);
    assert!(!s.viewport().is_identity());

    s.reset_view();
    assert!(s.viewport().is_identity());
}

#[test]
fn test_render_requested_for_geometry_changes_only() {
    let mut s = session();
    let start = s.canvas().render_requests();
    s.set_tool(Tool::Rectangle);
    assert_eq!(s.canvas().render_requests(), start);

    down(&mut s, 1.0, 1.0, PointerButton::Primary);
    move_to(&mut s, 5.0, 5.0);
    up(&mut s, 5.0, 5.0);
    assert_eq!(s.canvas().render_requests(), start + 3);

    s.set_tool(Tool::Select);
    down(&mut s, 3.0, 3.0, PointerButton::Primary);
    assert!(s.selected().is_some());
    assert_eq!(s.canvas().render_requests(), start + 3);
}
