//! The 21-point hand model and pixel-space points.
//!
//! Indices follow the MediaPipe hand landmark convention.  Coordinates are
//! normalised to the frame: `x` and `y` in `[0, 1]`, `y` growing downward,
//! `z` a relative depth.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Joint
// ════════════════════════════════════════════════════════════════════════════

/// Number of landmarks reported per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Anatomical landmark names, in detector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Joint {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl Joint {
    pub fn index(self) -> usize {
        self as usize
    }

    /// (parent, child) pairs forming the hand skeleton, for drawing.
    pub const BONES: [(Joint, Joint); 21] = [
        (Joint::Wrist, Joint::ThumbCmc),     (Joint::ThumbCmc, Joint::ThumbMcp),
        (Joint::ThumbMcp, Joint::ThumbIp),   (Joint::ThumbIp, Joint::ThumbTip),
        (Joint::Wrist, Joint::IndexMcp),     (Joint::IndexMcp, Joint::IndexPip),
        (Joint::IndexPip, Joint::IndexDip),  (Joint::IndexDip, Joint::IndexTip),
        (Joint::Wrist, Joint::MiddleMcp),    (Joint::MiddleMcp, Joint::MiddlePip),
        (Joint::MiddlePip, Joint::MiddleDip),(Joint::MiddleDip, Joint::MiddleTip),
        (Joint::Wrist, Joint::RingMcp),      (Joint::RingMcp, Joint::RingPip),
        (Joint::RingPip, Joint::RingDip),    (Joint::RingDip, Joint::RingTip),
        (Joint::Wrist, Joint::PinkyMcp),     (Joint::PinkyMcp, Joint::PinkyPip),
        (Joint::PinkyPip, Joint::PinkyDip),  (Joint::PinkyDip, Joint::PinkyTip),
        (Joint::IndexMcp, Joint::MiddleMcp),
    ];
}

/// Tip/pip pairs used by the extension test, one per long finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub fn tip(self) -> Joint {
        match self {
            Finger::Index  => Joint::IndexTip,
            Finger::Middle => Joint::MiddleTip,
            Finger::Ring   => Joint::RingTip,
            Finger::Pinky  => Joint::PinkyTip,
        }
    }

    pub fn pip(self) -> Joint {
        match self {
            Finger::Index  => Joint::IndexPip,
            Finger::Middle => Joint::MiddlePip,
            Finger::Ring   => Joint::RingPip,
            Finger::Pinky  => Joint::PinkyPip,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark / HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// One normalised landmark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    WrongCount(usize),
    #[error("malformed detection line: {0}")]
    Malformed(String),
}

/// One detected hand for one frame.  Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points:         [Landmark; LANDMARK_COUNT],
    pub handedness: Option<Handedness>,
    /// Detector confidence, 0.0–1.0.
    pub score:      f32,
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks { points, handedness: None, score: 1.0 }
    }

    /// Build from a detector-supplied list; anything but 21 points is rejected.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let arr: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount(points.len()))?;
        Ok(HandLandmarks::new(arr))
    }

    pub fn with_handedness(mut self, handedness: Option<Handedness>) -> Self {
        self.handedness = handedness;
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn get(&self, joint: Joint) -> Landmark {
        self.points[joint.index()]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// Scale one landmark into pixel space.
    pub fn to_pixels(&self, joint: Joint, frame_w: f32, frame_h: f32) -> Point {
        let lm = self.get(joint);
        Point::new(lm.x * frame_w, lm.y * frame_h)
    }
}

impl std::ops::Index<Joint> for HandLandmarks {
    type Output = Landmark;

    fn index(&self, joint: Joint) -> &Landmark {
        &self.points[joint.index()]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Point — pixel space
// ════════════════════════════════════════════════════════════════════════════

/// A position in frame or UI pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Integer pixel, truncating toward zero as the renderer expects.
    pub fn to_pixel(self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_indices_follow_detector_order() {
        assert_eq!(Joint::Wrist.index(), 0);
        assert_eq!(Joint::ThumbTip.index(), 4);
        assert_eq!(Joint::IndexTip.index(), 8);
        assert_eq!(Joint::MiddlePip.index(), 10);
        assert_eq!(Joint::PinkyTip.index(), LANDMARK_COUNT - 1);
    }

    #[test]
    fn from_slice_rejects_wrong_count() {
        let pts = vec![Landmark::default(); 20];
        assert_eq!(HandLandmarks::from_slice(&pts), Err(LandmarkError::WrongCount(20)));
        let pts = vec![Landmark::default(); 21];
        assert!(HandLandmarks::from_slice(&pts).is_ok());
    }

    #[test]
    fn to_pixels_scales_by_frame() {
        let mut pts = [Landmark::default(); LANDMARK_COUNT];
        pts[Joint::IndexTip.index()] = Landmark::new(0.25, 0.5, 0.0);
        let hand = HandLandmarks::new(pts);
        assert_eq!(hand.to_pixels(Joint::IndexTip, 1920.0, 1080.0), Point::new(480.0, 540.0));
        assert_eq!(hand[Joint::IndexTip].x, 0.25);
    }

    #[test]
    fn midpoint_and_truncation() {
        let m = Point::new(10.0, 20.0).midpoint(Point::new(15.0, 25.0));
        assert_eq!(m, Point::new(12.5, 22.5));
        assert_eq!(m.to_pixel(), (12, 22));
    }
}
