use super::*;
use crate::geom::Point;

const RED: Color = Color::rgb(255, 0, 0);

fn circle(x: f64, y: f64, radius: f64) -> DabPath {
    let mut path = DabPath::new();
    path.push(DabShape::Circle { center: Point::new(x, y), radius });
    path
}

// =============================================================
// Allocation
// =============================================================

#[test]
fn new_surface_is_transparent() {
    let surface = PixmapSurface::new(4, 3).unwrap();
    assert_eq!(surface.backing_size(), (4, 3));
    assert_eq!(surface.pixel(0, 0).map(|c| c.alpha), Some(0));
}

#[test]
fn zero_size_is_rejected() {
    let err = PixmapSurface::new(0, 10).unwrap_err();
    assert_eq!(err, SurfaceError::InvalidSize { width: 0.0, height: 10.0 });
}

#[test]
fn resize_discards_contents_and_sets_scale() {
    let mut surface = PixmapSurface::new(10, 10).unwrap();
    surface.fill_background(RED).unwrap();
    surface.resize(20, 5, 2.0).unwrap();
    assert_eq!(surface.backing_size(), (20, 5));
    assert_eq!(surface.scale(), 2.0);
    assert_eq!(surface.pixel(1, 1).map(|c| c.alpha), Some(0));
}

// =============================================================
// Fills
// =============================================================

#[test]
fn fill_background_covers_every_pixel() {
    let mut surface = PixmapSurface::new(8, 8).unwrap();
    surface.fill_background(Color::WHITE).unwrap();
    assert_eq!(surface.pixel(0, 0), Some(Color::WHITE));
    assert_eq!(surface.pixel(7, 7), Some(Color::WHITE));
}

#[test]
fn clear_makes_transparent() {
    let mut surface = PixmapSurface::new(8, 8).unwrap();
    surface.fill_background(Color::WHITE).unwrap();
    surface.clear();
    assert_eq!(surface.pixel(4, 4).map(|c| c.alpha), Some(0));
}

#[test]
fn fill_path_paints_circle_interior_only() {
    let mut surface = PixmapSurface::new(40, 40).unwrap();
    surface.fill_path(&circle(20.0, 20.0, 8.0), RED).unwrap();
    assert_eq!(surface.pixel(20, 20), Some(RED));
    assert_eq!(surface.pixel(2, 2).map(|c| c.alpha), Some(0));
}

#[test]
fn fill_path_paints_polygon() {
    let mut surface = PixmapSurface::new(20, 20).unwrap();
    let mut path = DabPath::new();
    path.push(DabShape::Polygon(vec![
        Point::new(5.0, 5.0),
        Point::new(15.0, 5.0),
        Point::new(15.0, 15.0),
        Point::new(5.0, 15.0),
    ]));
    surface.fill_path(&path, RED).unwrap();
    assert_eq!(surface.pixel(10, 10), Some(RED));
    assert_eq!(surface.pixel(1, 1).map(|c| c.alpha), Some(0));
}

#[test]
fn empty_path_is_a_no_op() {
    let mut surface = PixmapSurface::new(4, 4).unwrap();
    surface.fill_path(&DabPath::new(), RED).unwrap();
    assert!(surface.data().iter().all(|b| *b == 0));
}

// =============================================================
// Snapshots and style
// =============================================================

#[test]
fn snapshot_stretches_over_resized_store() {
    let mut surface = PixmapSurface::new(10, 10).unwrap();
    surface.fill_background(RED).unwrap();
    let snap = surface.snapshot().unwrap();

    surface.resize(20, 20, 2.0).unwrap();
    surface.draw_snapshot(&snap).unwrap();

    for (x, y) in [(0, 0), (10, 10), (19, 19)] {
        let c = surface.pixel(x, y).unwrap();
        assert_eq!(c.red, 255, "({x}, {y})");
        assert!(c.alpha > 250, "({x}, {y}) alpha {}", c.alpha);
    }
}

#[test]
fn apply_style_is_recorded() {
    let mut surface = PixmapSurface::new(4, 4).unwrap();
    let style = LayerStyle { left: 3.0, rotation: 90.0, ..LayerStyle::default() };
    surface.apply_style(&style).unwrap();
    assert_eq!(surface.style(), &style);
}
