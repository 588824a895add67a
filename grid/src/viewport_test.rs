#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

fn vp(pan_x: f64, pan_y: f64, zoom: f64) -> Viewport {
    Viewport { pan_x, pan_y, zoom }
}

// =============================================================
// dragged
// =============================================================

#[test]
fn dragged_moves_pan_opposite_to_pointer() {
    let anchor = DragAnchor { pan_x: 100.0, pan_y: 50.0, pointer: pt(10.0, 10.0) };
    let next = dragged(vp(100.0, 50.0, 6.0), anchor, pt(30.0, 5.0));
    assert_eq!(next.pan_x, 80.0);
    assert_eq!(next.pan_y, 55.0);
    assert_eq!(next.zoom, 6.0);
}

#[test]
fn dragged_is_unbounded() {
    let anchor = DragAnchor { pan_x: 0.0, pan_y: 0.0, pointer: pt(0.0, 0.0) };
    let next = dragged(Viewport::default(), anchor, pt(1e7, -1e7));
    assert_eq!(next.pan_x, -1e7);
    assert_eq!(next.pan_y, 1e7);
}

// =============================================================
// zoomed_at
// =============================================================

#[test]
fn zoomed_at_keeps_world_point_under_pointer() {
    let cases = [
        (vp(0.0, 0.0, 6.0), pt(300.0, 200.0), 1.1),
        (vp(-1234.5, 987.0, 0.3), pt(17.0, 600.0), 0.9),
        (vp(50_000.0, -3.0, 49.0), pt(0.0, 0.0), 1.1),
        (vp(12.0, 12.0, 2.0), pt(799.0, 1.0), 0.5),
    ];
    for (before, pointer, factor) in cases {
        let after = zoomed_at(before, pointer, factor);
        assert!(
            point_approx_eq(before.screen_to_world(pointer), after.screen_to_world(pointer)),
            "{before:?} -> {after:?} at {pointer:?}"
        );
    }
}

#[test]
fn zoomed_at_clamps_high() {
    let after = zoomed_at(vp(0.0, 0.0, 48.0), pt(10.0, 10.0), 1.1);
    assert_eq!(after.zoom, 50.0);
}

#[test]
fn zoomed_at_clamps_low() {
    let after = zoomed_at(vp(0.0, 0.0, 0.1), pt(10.0, 10.0), 0.9);
    assert_eq!(after.zoom, 0.1);
}

#[test]
fn non_finite_factor_leaves_viewport_unchanged() {
    let before = vp(12.0, -4.0, 6.0);
    for factor in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(zoomed_at(before, pt(10.0, 10.0), factor), before);
        assert_eq!(zoomed(before, factor), before);
    }
    let after = zoomed_at(zoomed_at(before, pt(0.0, 0.0), f64::NAN), pt(0.0, 0.0), 1.1);
    assert!(after.zoom.is_finite());
}

#[test]
fn zoomed_leaves_pan_alone() {
    let after = zoomed(vp(7.0, 8.0, 6.0), 1.2);
    assert_eq!(after.pan_x, 7.0);
    assert_eq!(after.pan_y, 8.0);
    assert!((after.zoom - 7.2).abs() < EPSILON);
}

// =============================================================
// ViewportController
// =============================================================

#[test]
fn controller_default_is_idle_default_viewport() {
    let c = ViewportController::default();
    assert!(!c.is_dragging());
    assert_eq!(c.viewport(), Viewport::default());
}

#[test]
fn drag_sequence_pans() {
    let mut c = ViewportController::new(vp(10.0, 20.0, 6.0));
    c.start_drag(pt(100.0, 100.0));
    assert!(c.is_dragging());
    assert!(c.drag_to(pt(90.0, 130.0)));
    assert_eq!(c.viewport().pan_x, 20.0);
    assert_eq!(c.viewport().pan_y, -10.0);
    // Moves are relative to the press, not the previous move.
    assert!(c.drag_to(pt(100.0, 100.0)));
    assert_eq!(c.viewport().pan_x, 10.0);
    assert_eq!(c.viewport().pan_y, 20.0);
}

#[test]
fn drag_to_without_press_is_ignored() {
    let mut c = ViewportController::new(vp(10.0, 20.0, 6.0));
    assert!(!c.drag_to(pt(500.0, 500.0)));
    assert_eq!(c.viewport(), vp(10.0, 20.0, 6.0));
}

#[test]
fn end_drag_small_move_is_click() {
    let mut c = ViewportController::default();
    c.start_drag(pt(100.0, 100.0));
    c.drag_to(pt(101.0, 101.0));
    assert!(c.end_drag(pt(101.0, 101.0)));
    assert!(!c.is_dragging());
}

#[test]
fn end_drag_large_move_is_pan() {
    let mut c = ViewportController::default();
    c.start_drag(pt(100.0, 100.0));
    c.drag_to(pt(110.0, 100.0));
    assert!(!c.end_drag(pt(110.0, 100.0)));
    assert!(!c.is_dragging());
}

#[test]
fn end_drag_without_press_is_not_click() {
    let mut c = ViewportController::default();
    assert!(!c.end_drag(pt(0.0, 0.0)));
}

#[test]
fn cancel_drag_returns_to_idle() {
    let mut c = ViewportController::default();
    c.start_drag(pt(0.0, 0.0));
    c.cancel_drag();
    assert!(!c.is_dragging());
    assert!(!c.end_drag(pt(0.0, 0.0)));
}

#[test]
fn controller_zoom_at_matches_pure_transition() {
    let start = vp(33.0, -12.0, 4.0);
    let mut c = ViewportController::new(start);
    c.zoom_at(pt(200.0, 150.0), 1.1);
    assert_eq!(c.viewport(), zoomed_at(start, pt(200.0, 150.0), 1.1));
}

#[test]
fn controller_zoom_by_clamps() {
    let mut c = ViewportController::new(vp(0.0, 0.0, 0.11));
    c.zoom_by(0.8);
    assert_eq!(c.viewport().zoom, 0.1);
}
