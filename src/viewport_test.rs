#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_equality() {
    assert_eq!(Point::new(1.0, 2.0), Point::new(1.0, 2.0));
    assert_ne!(Point::new(1.0, 2.0), Point::new(1.0, 3.0));
}

// --- map_to_surface: identity ---

#[test]
fn map_identity_when_rendered_at_intrinsic_size() {
    let rect = ViewRect::new(0.0, 0.0, 800.0, 400.0);
    let mapped = map_to_surface(Point::new(50.0, 75.0), rect, 800, 400);
    assert!(mapped.is_some_and(|p| point_approx_eq(p, Point::new(50.0, 75.0))));
}

// --- map_to_surface: scaling ---

#[test]
fn map_scales_up_when_rendered_smaller() {
    // 800x400 surface rendered at 400x200: viewport units double.
    let rect = ViewRect::new(0.0, 0.0, 400.0, 200.0);
    let mapped = map_to_surface(Point::new(5.0, 5.0), rect, 800, 400);
    assert!(mapped.is_some_and(|p| point_approx_eq(p, Point::new(10.0, 10.0))));
}

#[test]
fn map_scales_down_when_rendered_larger() {
    let rect = ViewRect::new(0.0, 0.0, 1600.0, 800.0);
    let mapped = map_to_surface(Point::new(100.0, 100.0), rect, 800, 400);
    assert!(mapped.is_some_and(|p| point_approx_eq(p, Point::new(50.0, 50.0))));
}

#[test]
fn map_axes_scale_independently() {
    // Non-uniform CSS stretch: x doubles, y stays.
    let rect = ViewRect::new(0.0, 0.0, 400.0, 400.0);
    let mapped = map_to_surface(Point::new(10.0, 10.0), rect, 800, 400);
    assert!(mapped.is_some_and(|p| point_approx_eq(p, Point::new(20.0, 10.0))));
}

// --- map_to_surface: offsets ---

#[test]
fn map_subtracts_rect_origin() {
    let rect = ViewRect::new(100.0, 50.0, 800.0, 400.0);
    let mapped = map_to_surface(Point::new(100.0, 50.0), rect, 800, 400);
    assert!(mapped.is_some_and(|p| point_approx_eq(p, Point::new(0.0, 0.0))));
}

#[test]
fn map_offset_and_scale_combine() {
    let rect = ViewRect::new(20.0, 10.0, 400.0, 200.0);
    let mapped = map_to_surface(Point::new(25.0, 15.0), rect, 800, 400);
    assert!(mapped.is_some_and(|p| point_approx_eq(p, Point::new(10.0, 10.0))));
}

#[test]
fn map_positions_outside_rect_go_outside_surface() {
    // The mapper does not clamp; the raster clips later.
    let rect = ViewRect::new(0.0, 0.0, 800.0, 400.0);
    let mapped = map_to_surface(Point::new(-10.0, 500.0), rect, 800, 400);
    assert!(mapped.is_some_and(|p| point_approx_eq(p, Point::new(-10.0, 500.0))));
}

// --- map_to_surface: degenerate rects ---

#[test]
fn map_zero_width_rect_is_none() {
    let rect = ViewRect::new(0.0, 0.0, 0.0, 200.0);
    assert!(map_to_surface(Point::new(5.0, 5.0), rect, 800, 400).is_none());
}

#[test]
fn map_zero_height_rect_is_none() {
    let rect = ViewRect::new(0.0, 0.0, 400.0, 0.0);
    assert!(map_to_surface(Point::new(5.0, 5.0), rect, 800, 400).is_none());
}

#[test]
fn map_negative_extent_rect_is_none() {
    let rect = ViewRect::new(0.0, 0.0, -400.0, -200.0);
    assert!(map_to_surface(Point::new(5.0, 5.0), rect, 800, 400).is_none());
}
