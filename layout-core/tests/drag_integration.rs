//! Drag and Snap Integration Tests
//!
//! Drives the editor through complete drag sessions:
//! - Snapping against stationary layers
//! - Grab-offset stability under zoom
//! - Drag end idempotence
//! - Mouse / touch parity
//! - Orientation changes during a session

use layout_core::{
    Category, Editor, EditorConfig, EventResponse, GuideOrientation, InputEvent, LayerId,
    Orientation, Point, PointerEvent, PointerPhase, PointerTarget, Size, SnapPolicy, TouchEvent,
    TouchPhase,
};
use proptest::prelude::*;

fn editor() -> Editor {
    Editor::new_document(vec![Category::new("parte", "Parte")])
}

/// Add a measured text layer at the given document position.
fn measured_layer(editor: &mut Editor, x: f32, y: f32, w: f32, h: f32) -> LayerId {
    let id = editor.add_text("layer");
    editor.record_size(id, Size::new(w, h)).expect("valid size");
    editor.set_position(id, Point::new(x, y)).expect("finite");
    id
}

fn position(editor: &Editor, id: LayerId) -> Point {
    editor
        .document()
        .layer(id)
        .map(|l| l.position())
        .expect("layer exists")
}

fn pointer(phase: PointerPhase, x: f32, y: f32) -> InputEvent {
    InputEvent::Pointer(PointerEvent::new(phase, x, y))
}

// ============================================================================
// Snap correctness
// ============================================================================

#[test]
fn test_left_edge_snaps_within_threshold() {
    let mut editor = editor();
    let _a = measured_layer(&mut editor, 100.0, 100.0, 60.0, 20.0);
    let b = measured_layer(&mut editor, 400.0, 400.0, 90.0, 30.0);

    // Grab B at its top-left corner and move its left edge to x = 103.
    editor.begin_drag(b, Point::new(400.0, 400.0)).expect("begin");
    assert!(editor.drag_to(Point::new(103.0, 500.0)));
    assert!((position(&editor, b).x - 100.0).abs() < f32::EPSILON);
    assert_eq!(editor.guides().len(), 1);
    assert_eq!(editor.guides()[0].orientation, GuideOrientation::Vertical);

    // x = 107 is outside the threshold: no snap, guides replaced wholesale.
    assert!(editor.drag_to(Point::new(107.0, 500.0)));
    assert!((position(&editor, b).x - 107.0).abs() < f32::EPSILON);
    assert!(editor.guides().is_empty());
}

#[test]
fn test_single_layer_never_snaps() {
    let mut editor = editor();
    let only = measured_layer(&mut editor, 100.0, 100.0, 60.0, 20.0);

    editor.begin_drag(only, Point::new(110.0, 105.0)).expect("begin");
    for step in 0..20_u8 {
        let d = f32::from(step) * 0.7;
        editor.drag_to(Point::new(110.0 + d, 105.0 + d));
        assert!(editor.guides().is_empty());
        let p = position(&editor, only);
        assert!((p.x - (100.0 + d)).abs() < 1e-4);
        assert!((p.y - (100.0 + d)).abs() < 1e-4);
    }
}

#[test]
fn test_snapshot_fixed_for_drag_duration() {
    let mut editor = editor();
    let a = measured_layer(&mut editor, 100.0, 100.0, 60.0, 20.0);
    let b = measured_layer(&mut editor, 400.0, 400.0, 90.0, 30.0);

    editor.begin_drag(b, Point::new(400.0, 400.0)).expect("begin");
    // A grows mid-drag; the snapshot keeps its old size.
    editor.record_size(a, Size::new(300.0, 20.0)).expect("size");
    // B right edge 163 vs A's snapshotted right edge 160.
    editor.drag_to(Point::new(73.0, 500.0));
    assert!((position(&editor, b).x - 70.0).abs() < f32::EPSILON);
}

#[test]
fn test_nearest_policy_prefers_closest_match() {
    let mut editor = editor().with_config(EditorConfig {
        snap_policy: SnapPolicy::Nearest,
    });
    let _a = measured_layer(&mut editor, 100.0, 0.0, 300.0, 10.0);
    let _b = measured_layer(&mut editor, 97.0, 600.0, 300.0, 10.0);
    let c = measured_layer(&mut editor, 500.0, 300.0, 20.0, 10.0);

    editor.begin_drag(c, Point::new(500.0, 300.0)).expect("begin");
    editor.drag_to(Point::new(101.0, 300.0));
    assert!((position(&editor, c).x - 100.0).abs() < f32::EPSILON);
}

// ============================================================================
// Grab offset and scale
// ============================================================================

#[test]
fn test_grab_offset_under_zoom_and_origin() {
    let mut editor = editor();
    editor.set_canvas_origin(Point::new(40.0, 80.0));
    editor.zoom_in();
    editor.zoom_in();
    let scale = editor.scale();

    let id = measured_layer(&mut editor, 200.0, 300.0, 50.0, 50.0);
    let grab = editor
        .viewport()
        .document_to_screen(Point::new(220.0, 310.0), Point::new(40.0, 80.0));
    editor.begin_drag(id, grab).expect("begin");
    let offset = editor.drag_session().map(|s| s.grab_offset()).expect("dragging");
    assert!((offset.x - 20.0).abs() < 1e-3);
    assert!((offset.y - 10.0).abs() < 1e-3);

    editor.drag_to(Point::new(grab.x + 36.0, grab.y - 12.0));
    let p = position(&editor, id);
    assert!((p.x - (200.0 + 36.0 / scale)).abs() < 1e-3);
    assert!((p.y - (300.0 - 12.0 / scale)).abs() < 1e-3);
}

#[test]
fn test_unmeasured_layer_move_is_skipped() {
    let mut editor = editor();
    let id = editor.add_text("not rendered yet");
    let before = position(&editor, id);

    editor.begin_drag(id, before).expect("begin");
    assert!(!editor.drag_to(Point::new(300.0, 300.0)));
    assert_eq!(position(&editor, id), before);

    // Measurement arrives; the next move goes through.
    editor.record_size(id, Size::new(80.0, 20.0)).expect("size");
    assert!(editor.drag_to(Point::new(300.0, 300.0)));
    assert_eq!(position(&editor, id), Point::new(300.0, 300.0));
}

#[test]
fn test_non_finite_pointer_is_ignored() {
    let mut editor = editor();
    let id = measured_layer(&mut editor, 10.0, 10.0, 20.0, 20.0);
    editor.begin_drag(id, Point::new(10.0, 10.0)).expect("begin");
    assert!(!editor.drag_to(Point::new(f32::NAN, 20.0)));
    assert!(!editor.drag_to(Point::new(5.0, f32::INFINITY)));
    assert!(position(&editor, id).is_finite());
    assert_eq!(position(&editor, id), Point::new(10.0, 10.0));
}

// ============================================================================
// Drag lifecycle
// ============================================================================

#[test]
fn test_end_drag_is_idempotent() {
    let mut editor = editor();
    let _a = measured_layer(&mut editor, 100.0, 100.0, 60.0, 20.0);
    let b = measured_layer(&mut editor, 400.0, 400.0, 90.0, 30.0);

    editor.begin_drag(b, Point::new(400.0, 400.0)).expect("begin");
    editor.drag_to(Point::new(102.0, 450.0));
    assert!(!editor.guides().is_empty());
    let last = position(&editor, b);

    assert!(editor.end_drag());
    assert!(editor.guides().is_empty());
    assert_eq!(position(&editor, b), last);

    assert!(!editor.end_drag());
    assert_eq!(position(&editor, b), last);
    assert!(!editor.drag_to(Point::new(0.0, 0.0)));
}

#[test]
fn test_pointer_events_drive_state_machine() {
    let mut editor = editor();
    let a = measured_layer(&mut editor, 100.0, 100.0, 60.0, 20.0);
    editor.deselect();

    // Unresolved target is hit-tested.
    let down = editor.handle_event(&pointer(PointerPhase::Down, 110.0, 110.0));
    assert_eq!(down, EventResponse::HANDLED);
    assert_eq!(editor.selected(), Some(a));
    assert!(editor.is_dragging());

    editor.handle_event(&pointer(PointerPhase::Move, 130.0, 150.0));
    assert_eq!(position(&editor, a), Point::new(120.0, 140.0));

    assert!(editor.handle_event(&pointer(PointerPhase::Cancel, 0.0, 0.0)).handled);
    assert!(!editor.is_dragging());
    assert!(!editor.handle_event(&pointer(PointerPhase::Up, 0.0, 0.0)).handled);
    assert_eq!(position(&editor, a), Point::new(120.0, 140.0));
}

#[test]
fn test_background_press_clears_selection() {
    let mut editor = editor();
    let a = measured_layer(&mut editor, 100.0, 100.0, 60.0, 20.0);
    editor.select(a).expect("select");

    let event = InputEvent::Pointer(
        PointerEvent::new(PointerPhase::Down, 700.0, 900.0).with_target(PointerTarget::Background),
    );
    editor.handle_event(&event);
    assert_eq!(editor.selected(), None);
    assert!(!editor.is_dragging());
}

#[test]
fn test_editable_text_press_does_not_drag() {
    let mut editor = editor();
    let a = measured_layer(&mut editor, 100.0, 100.0, 60.0, 20.0);
    let event = InputEvent::Pointer(
        PointerEvent::new(PointerPhase::Down, 110.0, 110.0)
            .with_target(PointerTarget::EditableText(a)),
    );
    assert_eq!(editor.handle_event(&event), EventResponse::IGNORED);
    assert!(!editor.is_dragging());
}

#[test]
fn test_touch_parity_and_scroll_suppression() {
    let mut editor = editor();
    let a = measured_layer(&mut editor, 100.0, 100.0, 60.0, 20.0);

    let start =
        TouchEvent::single(TouchPhase::Start, 110.0, 110.0).with_target(PointerTarget::Layer(a));
    assert!(editor.handle_event(&InputEvent::Touch(start)).handled);

    let cancelable = TouchEvent::single(TouchPhase::Move, 130.0, 150.0);
    let response = editor.handle_event(&InputEvent::Touch(cancelable));
    assert!(response.prevent_default);
    assert_eq!(position(&editor, a), Point::new(120.0, 140.0));

    let passive = TouchEvent::single(TouchPhase::Move, 140.0, 150.0).with_cancelable(false);
    let response = editor.handle_event(&InputEvent::Touch(passive));
    assert!(response.handled);
    assert!(!response.prevent_default);

    let end = TouchEvent::single(TouchPhase::End, 140.0, 150.0);
    assert!(editor.handle_event(&InputEvent::Touch(end)).handled);

    // Not dragging: scrolling is left alone.
    let idle_move = TouchEvent::single(TouchPhase::Move, 10.0, 10.0);
    assert_eq!(editor.handle_event(&InputEvent::Touch(idle_move)), EventResponse::IGNORED);
}

#[test]
fn test_touch_cancel_ends_drag_like_pointer_up() {
    let mut editor = editor();
    let _a = measured_layer(&mut editor, 100.0, 100.0, 60.0, 20.0);
    let b = measured_layer(&mut editor, 400.0, 400.0, 90.0, 30.0);

    let start =
        TouchEvent::single(TouchPhase::Start, 400.0, 400.0).with_target(PointerTarget::Layer(b));
    assert!(editor.handle_event(&InputEvent::Touch(start)).handled);

    // Left edge lands 2px from A's left edge and snaps.
    let snapping = TouchEvent::single(TouchPhase::Move, 102.0, 450.0);
    assert!(editor.handle_event(&InputEvent::Touch(snapping)).prevent_default);
    assert_eq!(position(&editor, b), Point::new(100.0, 450.0));
    assert!(!editor.guides().is_empty());

    let cancel = TouchEvent::single(TouchPhase::Cancel, 102.0, 450.0);
    assert_eq!(
        editor.handle_event(&InputEvent::Touch(cancel.clone())),
        EventResponse::HANDLED
    );
    assert!(!editor.is_dragging());
    assert!(editor.guides().is_empty());
    assert_eq!(position(&editor, b), Point::new(100.0, 450.0));
    assert_eq!(editor.selected(), Some(b));

    // A second cancel is a no-op, like a second pointer-up.
    assert_eq!(
        editor.handle_event(&InputEvent::Touch(cancel)),
        EventResponse::IGNORED
    );
    assert_eq!(position(&editor, b), Point::new(100.0, 450.0));
}

#[test]
fn test_multi_touch_does_not_start_drag() {
    let mut editor = editor();
    let a = measured_layer(&mut editor, 100.0, 100.0, 60.0, 20.0);
    let pinch = TouchEvent::new(
        TouchPhase::Start,
        vec![
            layout_core::TouchPoint { id: 0, x: 110.0, y: 110.0 },
            layout_core::TouchPoint { id: 1, x: 150.0, y: 150.0 },
        ],
    )
    .with_target(PointerTarget::Layer(a));
    assert!(!editor.handle_event(&InputEvent::Touch(pinch)).handled);
    assert!(!editor.is_dragging());
}

// ============================================================================
// Orientation
// ============================================================================

#[test]
fn test_orientation_toggle_keeps_positions() {
    let mut editor = editor();
    editor.resize_container(Size::new(1000.0, 800.0), false);
    let a = measured_layer(&mut editor, 700.0, 1000.0, 60.0, 20.0);
    let before = editor.scale();

    assert_eq!(editor.toggle_orientation(), Orientation::Landscape);
    assert_eq!(editor.document().page_size(), Size::new(1123.0, 794.0));
    assert!((editor.scale() - before).abs() > 1e-3);
    assert_eq!(position(&editor, a), Point::new(700.0, 1000.0));

    // Manual zoom: toggling no longer refits.
    let zoomed = editor.zoom_in();
    editor.toggle_orientation();
    assert!((editor.scale() - zoomed).abs() < f32::EPSILON);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_unsnapped_move_follows_pointer_over_scale(
        zoom_steps in 0usize..10,
        zoom_in in any::<bool>(),
        grab_x in 0.0f32..50.0,
        grab_y in 0.0f32..50.0,
        dx in -300.0f32..300.0,
        dy in -300.0f32..300.0,
    ) {
        let mut editor = editor();
        for _ in 0..zoom_steps {
            if zoom_in { editor.zoom_in(); } else { editor.zoom_out(); }
        }
        let scale = editor.scale();
        let id = measured_layer(&mut editor, 200.0, 200.0, 50.0, 50.0);
        let origin = Point::new(0.0, 0.0);
        let grab = editor
            .viewport()
            .document_to_screen(Point::new(200.0 + grab_x, 200.0 + grab_y), origin);

        editor.begin_drag(id, grab).expect("begin");
        editor.drag_to(Point::new(grab.x + dx, grab.y + dy));

        let p = position(&editor, id);
        prop_assert!(editor.guides().is_empty());
        prop_assert!((p.x - (200.0 + dx / scale)).abs() < 1e-2);
        prop_assert!((p.y - (200.0 + dy / scale)).abs() < 1e-2);
    }

    #[test]
    fn prop_positions_stay_finite(
        moves in prop::collection::vec((-2000.0f32..2000.0, -2000.0f32..2000.0), 1..30)
    ) {
        let mut editor = editor();
        let _a = measured_layer(&mut editor, 100.0, 100.0, 60.0, 20.0);
        let b = measured_layer(&mut editor, 300.0, 300.0, 40.0, 40.0);
        editor.begin_drag(b, Point::new(310.0, 310.0)).expect("begin");
        for (x, y) in moves {
            editor.drag_to(Point::new(x, y));
            prop_assert!(position(&editor, b).is_finite());
            // Every guide sits on one of A's edges or centres.
            for guide in editor.guides() {
                let lines: &[f32] = match guide.orientation {
                    GuideOrientation::Vertical => &[100.0, 160.0, 130.0],
                    GuideOrientation::Horizontal => &[100.0, 120.0, 110.0],
                };
                prop_assert!(lines.iter().any(|l| (l - guide.position).abs() < f32::EPSILON));
            }
        }
        editor.end_drag();
        prop_assert!(editor.guides().is_empty());
    }
}
