//! Pure geometry over one hand's landmarks.

use crate::landmark::{Finger, HandLandmarks, Joint, Landmark};

/// Coarse vertical orientation of the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Up,
    Down,
    Neutral,
}

/// True iff the tip sits strictly above the pip joint (smaller `y`).
pub fn is_finger_extended(hand: &HandLandmarks, tip: Joint, pip: Joint) -> bool {
    hand[tip].y < hand[pip].y
}

/// [`is_finger_extended`] for a named finger.
pub fn finger_extended(hand: &HandLandmarks, finger: Finger) -> bool {
    is_finger_extended(hand, finger.tip(), finger.pip())
}

/// Wrist-vs-knuckles heuristic.  Nothing downstream gates on it.
///
/// Both branches require the pinky knuckle left of the wrist, so a mirrored
/// hand always reads `Neutral`.
pub fn hand_orientation(hand: &HandLandmarks) -> Orientation {
    let wrist     = hand[Joint::Wrist];
    let index_mcp = hand[Joint::IndexMcp];
    let pinky_mcp = hand[Joint::PinkyMcp];

    let pinky_inside = pinky_mcp.x < wrist.x;
    if wrist.y < index_mcp.y && wrist.y < pinky_mcp.y && pinky_inside {
        Orientation::Up
    } else if wrist.y > index_mcp.y && wrist.y > pinky_mcp.y && pinky_inside {
        Orientation::Down
    } else {
        Orientation::Neutral
    }
}

/// Euclidean distance in normalised `(x, y)`; depth is ignored.
pub fn distance_2d(a: Landmark, b: Landmark) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// [`distance_2d`] between two joints of the same hand.
pub fn joint_distance(hand: &HandLandmarks, a: Joint, b: Joint) -> f32 {
    distance_2d(hand[a], hand[b])
}
