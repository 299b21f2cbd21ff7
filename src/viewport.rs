//! Viewport geometry: points and the viewport→surface coordinate mapping.
//!
//! A surface has fixed intrinsic pixel dimensions but is rendered at whatever
//! size responsive CSS gives its element, so pointer events arrive in
//! viewport units and must be rescaled into surface pixels before painting.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

/// A point in either viewport or surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding rectangle of the rendered surface element, in viewport units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }
}

/// Map a viewport-space position onto surface pixel coordinates.
///
/// Returns `None` when the rectangle is degenerate (zero or negative
/// extent), which happens while the element is detached or mid-layout.
/// Events arriving in that window are dropped rather than scaled by a
/// garbage factor.
#[must_use]
pub fn map_to_surface(client: Point, rect: ViewRect, surface_w: u32, surface_h: u32) -> Option<Point> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let scale_x = f64::from(surface_w) / rect.width;
    let scale_y = f64::from(surface_h) / rect.height;
    Some(Point::new(
        (client.x - rect.left) * scale_x,
        (client.y - rect.top) * scale_y,
    ))
}
