//! Stroke rasterization: paints pen marks onto a [`Surface`].
//!
//! This is the only module that turns stroke geometry into pixels. The pen
//! is painted with rounded caps and joins: a segment stamps a pen-width disc
//! at every cell of a Bresenham walk along its centerline, so consecutive
//! segments meet in a round join and a bare pointer-down still leaves a
//! visible dot. No anti-aliasing beyond what the raster gives for free.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::TAP_DOT_RADIUS;
use crate::surface::{Rgba, Surface};
use crate::viewport::Point;

/// Paint a filled disc centered at `center`.
///
/// A radius of `0.5` covers exactly the center pixel, which is what makes a
/// zero-length stroke (a tap) visible at pen width 1.
pub fn paint_dot(surface: &mut Surface, center: Point, radius: f64, color: Rgba) {
    let cx = round(center.x);
    let cy = round(center.y);
    let r = radius.max(0.0);
    let span = round(r.ceil());
    for dy in -span..=span {
        for dx in -span..=span {
            if f64::from(dx * dx + dy * dy) <= r * r {
                surface.put_pixel(cx + dx, cy + dy, color);
            }
        }
    }
}

/// Paint a straight segment from `a` to `b` with the given pen width.
///
/// Positions may lie outside the surface; the walk still runs and the
/// per-pixel writes clip.
pub fn paint_segment(surface: &mut Surface, a: Point, b: Point, width: f64, color: Rgba) {
    let radius = (width / 2.0).max(TAP_DOT_RADIUS);

    let (mut x0, mut y0) = (round(a.x), round(a.y));
    let (x1, y1) = (round(b.x), round(b.y));
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        paint_dot(surface, Point::new(f64::from(x0), f64::from(y0)), radius, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Round to the nearest pixel index. NaN and out-of-range values saturate.
#[allow(clippy::cast_possible_truncation)]
fn round(v: f64) -> i32 {
    v.round() as i32
}
