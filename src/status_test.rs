#![allow(clippy::float_cmp)]

use super::*;
use crate::config::EngineConfig;
use crate::geom::Rect;
use crate::input::{Key, Modifiers, WheelDelta};

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

// =============================================================
// StatusReadout
// =============================================================

#[test]
fn readout_rounds_zoom_percent() {
    let view = View { zoom: 1.104, ..View::default() };
    assert_eq!(StatusReadout::from_view(&view).zoom_percent, 110.0);
}

#[test]
fn indicator_points_up_at_zero() {
    let readout = StatusReadout::from_view(&View::default());
    assert!(close(readout.indicator_endpoint(9.0, 9.0, 5.0), Point::new(9.0, 4.0)));
}

#[test]
fn indicator_points_right_at_quarter_turn() {
    let view = View { rotation: 90.0, ..View::default() };
    let readout = StatusReadout::from_view(&view);
    assert!(close(readout.indicator_endpoint(9.0, 9.0, 5.0), Point::new(14.0, 9.0)));
}

#[test]
fn label_format() {
    let view = View { origin: Point::new(12.0, -3.5), rotation: 15.0, zoom: 2.0, ..View::default() };
    assert_eq!(StatusReadout::from_view(&view).label(), "200%  12•-3.5  15°");
}

// =============================================================
// StatusBoard
// =============================================================

#[test]
fn board_follows_workspace() {
    let mut workspace = WorkspaceState::new(Rect::new(0.0, 0.0, 100.0, 80.0), EngineConfig::default());
    let board = StatusBoard::connect(&workspace);
    assert_eq!(board.readout().label(), "100%  0•0  0°");

    workspace.on_key_press(&Key::new("[")).unwrap();
    workspace.on_wheel(WheelDelta::vertical(-500.0), Modifiers::ctrl(), 0.0).unwrap();
    workspace.set_origin(Point::new(4.0, 2.0)).unwrap();

    let readout = board.readout();
    assert_eq!(readout.rotation, 345.0);
    assert_eq!(readout.zoom_percent, 150.0);
    assert_eq!(readout.origin, Point::new(4.0, 2.0));
}

#[test]
fn dropped_board_unsubscribes() {
    let workspace = WorkspaceState::new(Rect::new(0.0, 0.0, 100.0, 80.0), EngineConfig::default());
    let board = StatusBoard::connect(&workspace);
    assert_eq!(workspace.events().subscriber_count(), 1);
    drop(board);
    assert_eq!(workspace.events().subscriber_count(), 0);
}
