//! Side panel actions: selection, delete, clear-all and export.

use super::*;
use crate::error::ViewerError;
use crate::loader::ImageSource;
use crate::session::CLEAR_ALL_PROMPT;

#[test]
fn test_clear_all_requires_confirmation() {
    let mut s = session();
    draw(&mut s, Tool::Rectangle, (0.0, 0.0), (10.0, 10.0));
    draw(&mut s, Tool::Circle, (50.0, 50.0), (55.0, 55.0));

    let mut prompts = Vec::new();
    let removed = s.clear_annotations(&mut |message: &str| {
        prompts.push(message.to_string());
        false
    });
    assert_eq!(removed, 0);
    assert_eq!(s.annotation_count(), 2);
    assert_eq!(prompts, [CLEAR_ALL_PROMPT]);

    assert_eq!(s.clear_annotations(&mut |_: &str| true), 2);
    assert_eq!(s.annotation_count(), 0);
}

#[test]
fn test_clear_all_on_empty_registry_does_not_prompt() {
    let mut s = session();
    let mut asked = false;
    assert_eq!(
        s.clear_annotations(&mut |_: &str| {
            asked = true;
            true
        }),
        0
    );
    assert!(!asked);
}

#[test]
fn test_delete_selected_annotation() {
    let mut s = session();
    let keep = draw(&mut s, Tool::Rectangle, (0.0, 0.0), (10.0, 10.0));
    let gone = draw(&mut s, Tool::Rectangle, (100.0, 100.0), (150.0, 150.0));

    s.set_tool(Tool::Select);
    down(&mut s, 120.0, 120.0, PointerButton::Primary);
    up(&mut s, 120.0, 120.0);
    assert_eq!(s.selected().map(|a| a.id), Some(gone));

    let removed = s.delete_selected().unwrap();
    assert_eq!(removed.id, gone);
    assert!(s.selected().is_none());
    assert_eq!(s.annotation_count(), 1);
    assert!(s.registry().get(keep).is_some());
    assert!(s.registry().find_by_drawable(removed.drawable.id).is_none());
    assert!(s.delete_selected().is_none());
}

#[test]
fn test_delete_unknown_annotation() {
    let mut s = session();
    draw(&mut s, Tool::Circle, (0.0, 0.0), (10.0, 0.0));
    let err = s.delete_annotation(AnnotationId(3)).unwrap_err();
    assert!(matches!(err, ViewerError::UnknownAnnotation(AnnotationId(3))));
    assert_eq!(s.annotation_count(), 1);
}

#[test]
fn test_selection_from_list_and_canvas_pick() {
    let mut s = session();
    let a = draw(&mut s, Tool::Rectangle, (0.0, 0.0), (10.0, 10.0));
    let b = draw(&mut s, Tool::Circle, (200.0, 200.0), (210.0, 200.0));

    s.select_annotation(Some(a));
    assert_eq!(s.selected().map(|x| x.id), Some(a));

    s.set_tool(Tool::Select);
    let drawable = s.registry().get(b).unwrap().drawable_id();
    assert_eq!(
        s.handle_event(ViewerEvent::ObjectSelected(drawable)),
        Transition::SelectionChanged(Some(b))
    );
    assert_eq!(s.selected().map(|x| x.id), Some(b));

    s.handle_event(ViewerEvent::SelectionCleared);
    assert!(s.selected().is_none());

    let scene = s.scene();
    assert!(scene.items.iter().all(|item| item.selectable && !item.selected));
}

#[test]
fn test_export_matches_survivors() {
    let mut s = session();
    s.load_image_bytes(
        ImageSource::new("chest.png").with_title("Chest X-ray"),
        &png_bytes(8, 8),
    )
    .unwrap();
    let a = draw(&mut s, Tool::Rectangle, (10.0, 10.0), (100.0, 80.0));
    let b = draw(&mut s, Tool::Circle, (200.0, 200.0), (200.0, 280.0));
    let c = draw(&mut s, Tool::Polygon, (300.0, 300.0), (320.0, 310.0));
    s.delete_annotation(b).unwrap();

    let snapshot = s.export_snapshot(1_709_210_096_789);
    assert_eq!(snapshot.image, "Chest X-ray");
    assert_eq!(snapshot.timestamp, "2024-02-29T12:34:56.789Z");
    let ids: Vec<_> = snapshot.annotations.iter().map(|e| e.id).collect();
    assert_eq!(ids, [a, c]);
    let labels: Vec<_> = snapshot.annotations.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["Rectangle 1", "Polygon 3"]);

    // Export leaves the session as it was
    assert_eq!(s.annotation_count(), 2);
}

#[test]
fn test_export_file() {
    let mut s = session();
    draw(&mut s, Tool::Rectangle, (10.0, 10.0), (20.0, 20.0));

    let file = s.export().unwrap();
    assert!(file.file_name.starts_with("annotations_"));
    assert!(file.file_name.ends_with(".json"));

    let value: serde_json::Value = serde_json::from_str(&file.contents).unwrap();
    assert_eq!(value["image"], "Medical image");
    assert_eq!(value["annotations"][0]["type"], "rectangle");
    assert_eq!(value["annotations"][0]["properties"]["type"], "rect");
    assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
}
