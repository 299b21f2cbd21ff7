#![allow(clippy::float_cmp)]

use super::*;
use crate::viewport::Point;

// --- PointerInput construction ---

#[test]
fn at_carries_position() {
    let input = PointerInput::at(3, 10.0, 20.0);
    assert_eq!(input.id, 3);
    assert_eq!(input.client, Some(Point::new(10.0, 20.0)));
}

#[test]
fn positionless_has_no_client() {
    let input = PointerInput::positionless(7);
    assert_eq!(input.id, 7);
    assert!(input.client.is_none());
}

// --- Touch normalization ---

#[test]
fn from_touches_takes_first_touch() {
    let touches = [
        TouchPoint { id: 11, x: 1.0, y: 2.0 },
        TouchPoint { id: 22, x: 3.0, y: 4.0 },
    ];
    let input = PointerInput::from_touches(&touches);
    assert_eq!(input.id, 11);
    assert_eq!(input.client, Some(Point::new(1.0, 2.0)));
}

#[test]
fn from_touches_single_touch() {
    let touches = [TouchPoint { id: 5, x: 9.0, y: 8.0 }];
    let input = PointerInput::from_touches(&touches);
    assert_eq!(input.id, 5);
    assert_eq!(input.client, Some(Point::new(9.0, 8.0)));
}

#[test]
fn from_empty_touch_list_is_positionless() {
    let input = PointerInput::from_touches(&[]);
    assert!(input.client.is_none());
}

// --- DrawState ---

#[test]
fn default_state_is_idle() {
    assert_eq!(DrawState::default(), DrawState::Idle);
}

#[test]
fn idle_is_not_drawing() {
    assert!(!DrawState::Idle.is_drawing());
}

#[test]
fn drawing_is_drawing() {
    let state = DrawState::Drawing { pointer: 1, last: Point::new(0.0, 0.0) };
    assert!(state.is_drawing());
}
