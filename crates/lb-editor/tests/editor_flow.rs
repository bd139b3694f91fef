//! Integration tests: end-to-end editing through the `Editor` session.
//!
//! Drives the editor the way a canvas host would (screen-space pointer and
//! key input) and checks the committed diagram, selection and overlay.

use lb_core::{KeyCode, LinkEnd, Point, Rect, Vec2};
use lb_editor::{Editor, EditorConfig, ToolEvent};
use lb_render::Scene;
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

fn type_text(editor: &mut Editor, text: &str) -> Option<ToolEvent> {
    let mut last = None;
    for c in text.chars() {
        last = editor.key(KeyCode::Char(c), None);
    }
    last
}

fn place_box(editor: &mut Editor, x: f64, y: f64, name: &str) {
    editor.activate("Box");
    editor.pointer_up(Point::new(x, y));
    type_text(editor, name);
    let done = editor.key(KeyCode::Enter, None).unwrap();
    assert!(done.is_finished());
}

// ─── Box ────────────────────────────────────────────────────────────────

#[test]
fn box_flow_from_click_to_commit() {
    let mut editor = Editor::default();
    assert!(matches!(
        editor.activate("Box"),
        Some(ToolEvent::Activated { ref tool }) if tool == "Box"
    ));

    let changed = editor.pointer_up(Point::new(20.0, 30.0)).unwrap();
    assert_eq!(changed.messages(), ["Choose the Box Name"]);
    let preview = changed.element().and_then(|e| e.as_box()).unwrap();
    assert_eq!(preview.rect, Rect::new(20.0, 30.0, 170.0, 80.0));
    assert_eq!(editor.model().feedback().len(), 1);

    let typing = type_text(&mut editor, "Server").unwrap();
    assert_eq!(typing.element().map(|e| e.name()), Some("Server"));
    assert!(editor.model().is_empty());

    let done = editor.key(KeyCode::Enter, None).unwrap();
    assert!(done.is_finished());

    let model = editor.model();
    assert_eq!(model.len(), 1);
    let b = model.boxes().next().unwrap();
    assert_eq!(b.name, "Server");
    assert_eq!(b.rect, Rect::new(20.0, 30.0, 170.0, 80.0));
    assert!(model.feedback().is_empty());
    assert!(editor.prompts().is_empty());
}

#[test]
fn pointer_move_previews_without_accepting() {
    let mut editor = Editor::default();
    editor.activate("Box");
    let moved = editor.pointer_move(Point::new(5.0, 5.0)).unwrap();
    assert!(!moved.is_finished());
    assert!(editor.current_tool().unwrap().inputs().is_empty());
    assert_eq!(editor.model().feedback().len(), 1);
}

// ─── Link ───────────────────────────────────────────────────────────────

#[test]
fn link_between_box_and_empty_space() {
    let mut editor = Editor::default();
    place_box(&mut editor, 0.0, 0.0, "web");
    let web = editor.model().drawable_ids()[0];

    editor.activate("Link");
    let first = editor.pointer_up(Point::new(10.0, 10.0)).unwrap();
    assert_eq!(first.messages(), ["Choose the Second Box", "Choose the Box Name"]);
    editor.pointer_up(Point::new(600.0, 600.0));
    type_text(&mut editor, "out");
    assert!(editor.key(KeyCode::Return, None).unwrap().is_finished());

    let model = editor.model();
    assert_eq!(model.drawable_ids().len(), 3);
    let link = model.links().next().unwrap();
    assert_eq!(link.name, "out");
    assert_eq!(link.source, LinkEnd::Committed(web));
    let anchor = model.get_box(link.target_id()).unwrap();
    assert_eq!(anchor.rect, Rect::new(600.0, 600.0, 601.0, 601.0));
    assert_eq!(model.get_box(web).unwrap().links(), &[link.id]);
}

// ─── Select ─────────────────────────────────────────────────────────────

#[test]
fn marquee_selects_enclosed_boxes() {
    let mut editor = Editor::default();
    place_box(&mut editor, 0.0, 0.0, "a");
    place_box(&mut editor, 300.0, 0.0, "b");
    let a = editor.model().drawable_ids()[0];

    editor.activate("Select");
    editor.pointer_up(Point::new(-10.0, -10.0));
    let dragging = editor.pointer_move(Point::new(100.0, 100.0)).unwrap();
    assert_eq!(dragging.messages(), ["selection window ready"]);
    assert!(!dragging.is_finished());

    let done = editor.pointer_up(Point::new(200.0, 100.0)).unwrap();
    assert!(done.is_finished());
    assert_eq!(editor.model().selection(), &[a]);
    assert!(editor.model().feedback().is_empty());
}

#[test]
fn escape_clears_selection_and_restarts() {
    let mut editor = Editor::default();
    place_box(&mut editor, 0.0, 0.0, "a");

    editor.activate("Select");
    editor.pointer_up(Point::new(500.0, 60.0));
    editor.pointer_up(Point::new(10.0, 10.0));
    assert_eq!(editor.model().selection().len(), 1);

    editor.pointer_up(Point::new(400.0, 400.0));
    let restarted = editor.key(KeyCode::Escape, None).unwrap();
    assert_eq!(restarted.messages(), ["select start point"]);
    assert!(editor.model().selection().is_empty());
    assert!(editor.current_tool().unwrap().inputs().is_empty());
}

#[test]
fn escape_drops_box_preview() {
    let mut editor = Editor::default();
    editor.activate("Box");
    editor.pointer_up(Point::new(20.0, 30.0));
    type_text(&mut editor, "Ser");
    assert_eq!(editor.model().feedback().len(), 1);

    let restarted = editor.key(KeyCode::Escape, None).unwrap();
    assert!(matches!(restarted, ToolEvent::Activated { ref tool } if tool == "Box"));
    assert!(editor.model().feedback().is_empty());
    assert!(editor.prompts().is_empty());
    assert!(editor.current_tool().unwrap().inputs().is_empty());
    assert_eq!(editor.status(), "Input Buffer: ");
}

#[test]
fn switching_tools_discards_progress() {
    let mut editor = Editor::default();
    editor.activate("Link");
    editor.pointer_up(Point::new(10.0, 10.0));
    assert_eq!(editor.model().feedback().len(), 1);

    editor.activate("Box");
    let link_tool = editor.tools().iter().find(|t| t.name() == "Link").unwrap();
    assert!(link_tool.inputs().is_empty());
    assert!(editor.model().feedback().is_empty());
    assert!(editor.model().is_empty());
}

// ─── Viewport ───────────────────────────────────────────────────────────

#[test]
fn zoomed_clicks_land_in_model_space() {
    let mut editor = Editor::default();
    let t0 = Instant::now();
    let zoom = editor.wheel(Point::ORIGIN, 240.0, t0);
    assert_eq!(zoom.zoom_value, 240.0);
    assert_eq!(editor.viewport().scale, 2.0);
    assert!(!editor.poll(t0 + Duration::from_millis(100)));
    assert!(editor.poll(t0 + Duration::from_millis(300)));

    place_box(&mut editor, 40.0, 60.0, "db");
    let b = editor.model().boxes().next().unwrap();
    assert_eq!(b.rect, Rect::new(20.0, 30.0, 170.0, 80.0));

    let mut scene = Scene::new();
    let labels = editor.paint(&mut scene);
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].text, "db");
    assert_eq!(labels[0].at, Point::new(50.0, 90.0));
}

#[test]
fn config_sets_initial_viewport() {
    let config = EditorConfig::from_json(r#"{ "initial_offset": [50.0, 0.0] }"#).unwrap();
    let mut editor = Editor::new(config);
    assert_eq!(editor.viewport().offset, Vec2::new(50.0, 0.0));

    place_box(&mut editor, 60.0, 10.0, "shifted");
    let b = editor.model().boxes().next().unwrap();
    assert_eq!(b.rect.origin(), Point::new(10.0, 10.0));
}
