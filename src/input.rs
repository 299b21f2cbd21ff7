//! Input model: pointer samples, touch normalization, and the stroke state
//! machine.
//!
//! The host wires raw DOM events (mouse, touch, pointer) to the engine; this
//! module defines the normalized sample type it hands over and the gesture
//! state tracked between pointer-down and pointer-up. Only one stroke can be
//! in progress at a time: the first active pointer owns it, and samples from
//! every other contact are ignored until the machine returns to idle.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::viewport::Point;

/// Identifier of a pointer or touch contact, as reported by the browser.
pub type PointerId = i64;

/// One active contact from a touch list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: PointerId,
    /// Viewport-space x of the contact.
    pub x: f64,
    /// Viewport-space y of the contact.
    pub y: f64,
}

/// A normalized pointer sample handed to the engine by the host.
///
/// `client` is `None` when the source event carried no usable coordinates
/// (no touches and no client position). Such samples are ignored downstream
/// instead of aborting the gesture — drawing is best-effort UX.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub id: PointerId,
    pub client: Option<Point>,
}

impl PointerInput {
    /// A sample at a viewport position.
    #[must_use]
    pub fn at(id: PointerId, x: f64, y: f64) -> Self {
        Self { id, client: Some(Point::new(x, y)) }
    }

    /// A sample with no usable position.
    #[must_use]
    pub fn positionless(id: PointerId) -> Self {
        Self { id, client: None }
    }

    /// Normalize a touch list: the first active touch wins. An empty list
    /// yields a positionless sample.
    #[must_use]
    pub fn from_touches(touches: &[TouchPoint]) -> Self {
        match touches.first() {
            Some(touch) => Self::at(touch.id, touch.x, touch.y),
            None => Self::positionless(0),
        }
    }
}

/// Gesture state machine: at most one stroke is in progress at any time.
///
/// `Idle → Drawing` on pointer-down; `Drawing → Drawing` on matching
/// pointer-move; `Drawing → Idle` on matching pointer-up or any cancel.
/// Moves while `Idle` are ignored, which guards against stray move events
/// after an unmatched up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawState {
    /// No stroke in progress; waiting for the next pointer-down.
    Idle,
    /// A stroke is being drawn.
    Drawing {
        /// The contact that owns the stroke; all others are ignored until
        /// the machine returns to `Idle`.
        pointer: PointerId,
        /// Surface-space position of the previous sample; the next segment
        /// is painted from here.
        last: Point,
    },
}

impl Default for DrawState {
    fn default() -> Self {
        Self::Idle
    }
}

impl DrawState {
    /// Whether a stroke is currently in progress.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}
