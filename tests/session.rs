//! End-to-end: a workspace, a project with two layers, a status board, and a
//! full pan / draw / zoom / settle sequence on the native raster backend.
#![allow(clippy::float_cmp)]

use easel::brush::{Brush, RoundBrush, share};
use easel::color::Color;
use easel::config::EngineConfig;
use easel::geom::{Point, Rect, Size};
use easel::input::{Cursor, Key, Modifiers, WheelDelta, WheelResponse};
use easel::layer::LayerHandle;
use easel::project::Project;
use easel::status::StatusBoard;
use easel::stroke::StrokeLog;
use easel::surface::pixmap::PixmapSurface;
use easel::surface::{ImageRendering, Surface};
use easel::workspace::Workspace;

const RED: Color = Color::rgb(255, 0, 0);

fn init_tracing() {
    tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::DEBUG).try_init().ok();
}

struct Session {
    workspace: Workspace<PixmapSurface>,
    project: Project<PixmapSurface>,
    status: StatusBoard,
    bottom: LayerHandle<PixmapSurface>,
    top: LayerHandle<PixmapSurface>,
}

/// 100x80 workspace, 40x30 canvas centered at (50, 40), red round brush of 4.
fn session() -> Session {
    init_tracing();
    let brush = share(RoundBrush::new(4.0, RED));
    let mut project = Project::new(Size::new(40.0, 30.0), brush);
    let mut workspace = Workspace::new(Rect::new(0.0, 0.0, 100.0, 80.0), EngineConfig::default());
    workspace.attach_project(&project).unwrap();
    let status = StatusBoard::connect(&workspace.state().unwrap());

    let bottom = project.create_layer(PixmapSurface::new(1, 1).unwrap()).unwrap();
    let top = project.create_layer(PixmapSurface::new(1, 1).unwrap()).unwrap();
    project.add_layer(bottom.clone()).unwrap();
    project.add_layer(top.clone()).unwrap();
    Session { workspace, project, status, bottom, top }
}

fn stroke(layer: &LayerHandle<PixmapSurface>, from: Point, to: Point) -> bool {
    let mut layer = layer.layer_mut().unwrap();
    if !layer.on_pointer_down(from).unwrap() {
        return false;
    }
    layer.on_pointer_move(to).unwrap();
    layer.on_pointer_up()
}

#[test]
fn layers_follow_every_gesture() {
    let s = session();
    for layer in [&s.bottom, &s.top] {
        assert!(layer.layer().unwrap().is_attached());
        assert_eq!(layer.layer().unwrap().style().left, 30.0);
    }

    s.workspace.on_key_down(&Key::new(" ")).unwrap();
    s.workspace.on_pointer_down(Point::new(0.0, 0.0)).unwrap();
    s.workspace.on_pointer_move(Point::new(10.0, -5.0)).unwrap();
    s.workspace.on_pointer_up().unwrap();
    s.workspace.on_key_up(&Key::new(" ")).unwrap();
    s.workspace.on_key_press(&Key::new("]")).unwrap();

    for layer in [&s.bottom, &s.top] {
        let layer = layer.layer().unwrap();
        assert_eq!(layer.style().left, 40.0);
        assert_eq!(layer.style().top, 20.0);
        assert_eq!(layer.style().rotation, 15.0);
        assert_eq!(layer.view(), s.workspace.view().unwrap());
    }
    assert_eq!(s.status.readout().label(), "100%  10•5  15°");
}

#[test]
fn pan_disables_drawing_until_space_released() {
    let s = session();
    s.workspace.on_key_down(&Key::new(" ")).unwrap();
    assert_eq!(s.workspace.cursor().unwrap(), Cursor::Grab);
    assert!(!s.top.layer().unwrap().style().pointer_events);
    assert!(!stroke(&s.top, Point::new(45.0, 40.0), Point::new(55.0, 40.0)));

    s.workspace.on_key_up(&Key::new(" ")).unwrap();
    assert!(s.top.layer().unwrap().style().pointer_events);
    assert!(stroke(&s.top, Point::new(45.0, 40.0), Point::new(55.0, 40.0)));
    assert!(s.bottom.layer().unwrap().strokes().is_empty());
}

#[test]
fn zoom_session_stretches_then_replays_sharply() {
    let s = session();
    assert!(stroke(&s.bottom, Point::new(45.0, 40.0), Point::new(55.0, 40.0)));

    let response = s.workspace.on_wheel(WheelDelta::vertical(-1000.0), Modifiers::ctrl(), 0.0).unwrap();
    assert_eq!(response, WheelResponse::PreventDefault);
    assert_eq!(s.workspace.cursor().unwrap(), Cursor::ZoomIn);
    {
        let layer = s.bottom.layer().unwrap();
        assert_eq!(layer.surface().backing_size(), (80, 60));
        assert!(!layer.style().pointer_events);
        assert_eq!(layer.style().image_rendering, ImageRendering::Pixelated);
    }
    assert!(!stroke(&s.top, Point::new(45.0, 40.0), Point::new(55.0, 40.0)));

    // Not yet settled.
    assert!(!s.workspace.tick(100.0).unwrap());
    assert!(s.workspace.tick(200.0).unwrap());

    let layer = s.bottom.layer().unwrap();
    assert!(layer.style().pointer_events);
    assert_eq!(layer.scale(), 2.0);
    assert_eq!(layer.surface().backing_size(), (80, 60));
    // Drawing (20, 15) sits at backing (40, 30); the stroke edge at y 13 is at backing row 26.
    assert_eq!(layer.surface().pixel(40, 30), Some(RED));
    assert_eq!(layer.surface().pixel(40, 10), Some(Color::WHITE));
    assert_eq!(s.status.readout().zoom_percent, 200.0);
}

#[test]
fn strokes_drawn_while_zoomed_land_in_drawing_space() {
    let s = session();
    s.workspace.set_zoom(2.0).unwrap();
    assert!(stroke(&s.top, Point::new(40.0, 40.0), Point::new(60.0, 40.0)));

    let layer = s.top.layer().unwrap();
    let strokes = layer.strokes().as_slice();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].points.first().map(|p| p.point), Some(Point::new(15.0, 15.0)));
    assert_eq!(strokes[0].points.last().map(|p| p.point), Some(Point::new(25.0, 15.0)));
}

#[test]
fn stroke_log_survives_json() {
    let s = session();
    assert!(stroke(&s.top, Point::new(45.0, 40.0), Point::new(55.0, 42.0)));
    s.project.brush().borrow_mut().set_size(8.0);
    assert!(stroke(&s.top, Point::new(40.0, 30.0), Point::new(42.0, 30.0)));

    let layer = s.top.layer().unwrap();
    let json = serde_json::to_string(layer.strokes()).unwrap();
    let restored: StrokeLog = serde_json::from_str(&json).unwrap();
    assert_eq!(&restored, layer.strokes());
    assert_eq!(restored.len(), 2);
    assert!(restored.as_slice()[1].points.iter().all(|p| p.size == 8.0));
}

#[test]
fn removed_layer_stops_following() {
    let mut s = session();
    let removed = s.project.remove_layer(s.bottom.id()).unwrap();
    assert!(!removed.layer().unwrap().is_attached());
    assert_eq!(s.project.layers().len(), 1);

    s.workspace.set_origin(Point::new(7.0, 0.0)).unwrap();
    assert_eq!(s.bottom.layer().unwrap().style().left, 30.0);
    assert_eq!(s.top.layer().unwrap().style().left, 37.0);
}

#[test]
fn brush_is_shared_across_layers() {
    let s = session();
    s.project.brush().borrow_mut().set_color(Color::rgb(0, 0, 255));
    assert!(stroke(&s.bottom, Point::new(45.0, 40.0), Point::new(50.0, 40.0)));
    assert!(stroke(&s.top, Point::new(45.0, 40.0), Point::new(50.0, 40.0)));
    for layer in [&s.bottom, &s.top] {
        assert_eq!(layer.layer().unwrap().strokes().as_slice()[0].color, Color::rgb(0, 0, 255));
    }
    assert_eq!(s.project.brush().borrow().size(), 4.0);
}
