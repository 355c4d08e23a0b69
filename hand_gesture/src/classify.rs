//! Per-frame gesture predicates.
//!
//! Every threshold is a distance in normalised landmark space, so the same
//! values hold at any camera resolution.

use serde::{Deserialize, Serialize};

use crate::geometry::{finger_extended, joint_distance};
use crate::landmark::{Finger, HandLandmarks, Joint, Point};

// ════════════════════════════════════════════════════════════════════════════
// Thresholds
// ════════════════════════════════════════════════════════════════════════════

/// Empirically tuned distances.  An earlier tuning used `0.039` for the pinch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureThresholds {
    /// Thumb-tip to index-tip distance below which the hand is pinching.
    #[serde(default = "GestureThresholds::default_pinch_distance")]
    pub pinch_distance: f32,
    /// Index-tip to middle-tip distance below which two raised fingers count
    /// as "together" for scrolling.
    #[serde(default = "GestureThresholds::default_scroll_tip_distance")]
    pub scroll_tip_distance: f32,
}

impl GestureThresholds {
    fn default_pinch_distance() -> f32 {
        0.045
    }
    fn default_scroll_tip_distance() -> f32 {
        0.1
    }
}

impl Default for GestureThresholds {
    fn default() -> Self {
        GestureThresholds {
            pinch_distance:      Self::default_pinch_distance(),
            scroll_tip_distance: Self::default_scroll_tip_distance(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Predicates
// ════════════════════════════════════════════════════════════════════════════

/// Index and middle raised and held together, ring and pinky curled.
pub fn is_scroll_gesture(hand: &HandLandmarks, t: &GestureThresholds) -> bool {
    let posture = finger_extended(hand, Finger::Index)
        && finger_extended(hand, Finger::Middle)
        && !finger_extended(hand, Finger::Ring)
        && !finger_extended(hand, Finger::Pinky);

    posture && joint_distance(hand, Joint::IndexTip, Joint::MiddleTip) < t.scroll_tip_distance
}

/// Thumb tip touching index tip, whatever the other fingers do.
pub fn is_pinch_gesture(hand: &HandLandmarks, t: &GestureThresholds) -> bool {
    joint_distance(hand, Joint::ThumbTip, Joint::IndexTip) < t.pinch_distance
}

/// Pixel midpoint between thumb tip and index tip while pinching.
pub fn pinch_position(
    hand: &HandLandmarks,
    frame_w: f32,
    frame_h: f32,
    t: &GestureThresholds,
) -> Option<Point> {
    if !is_pinch_gesture(hand, t) {
        return None;
    }
    let thumb = hand.to_pixels(Joint::ThumbTip, frame_w, frame_h);
    let index = hand.to_pixels(Joint::IndexTip, frame_w, frame_h);
    Some(thumb.midpoint(index))
}

// ════════════════════════════════════════════════════════════════════════════
// Gesture — one-word summary
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Scroll,
    Pinch,
    /// Only the index finger raised.
    Point,
    Open,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Scroll => "scroll",
            Gesture::Pinch  => "pinch",
            Gesture::Point  => "point",
            Gesture::Open   => "open",
        }
    }
}

/// Scroll wins over pinch, matching the order the frame loop checks them.
pub fn classify(hand: &HandLandmarks, t: &GestureThresholds) -> Gesture {
    if is_scroll_gesture(hand, t) {
        Gesture::Scroll
    } else if is_pinch_gesture(hand, t) {
        Gesture::Pinch
    } else if finger_extended(hand, Finger::Index)
        && !finger_extended(hand, Finger::Middle)
        && !finger_extended(hand, Finger::Ring)
        && !finger_extended(hand, Finger::Pinky)
    {
        Gesture::Point
    } else {
        Gesture::Open
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
