//! Synthetic hands for the simulation source.
//!
//! Each pose is a plausible 21-point hand with the index fingertip at the
//! requested normalised position, shaped so the classifier reads it as the
//! named gesture.

use hand_gesture::{HandLandmarks, Handedness, Joint, Landmark, LANDMARK_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    /// Index finger raised, the rest curled.
    Point,
    /// Thumb tip on the index tip.
    Pinch,
    /// Index and middle raised side by side.
    Scroll,
    /// All four fingers raised, thumb out.
    Open,
}

/// Build `pose` with the index tip at `(x, y)` in normalised frame
/// coordinates.
pub fn synth_hand(pose: Pose, x: f32, y: f32) -> HandLandmarks {
    let mut p = [Landmark::default(); LANDMARK_COUNT];
    let at = |dx: f32, dy: f32| Landmark::new(x + dx, y + dy, 0.0);

    p[Joint::Wrist.index()]    = at(0.05, 0.35);
    p[Joint::ThumbCmc.index()] = at(0.00, 0.30);
    p[Joint::ThumbMcp.index()] = at(-0.04, 0.25);
    p[Joint::ThumbIp.index()]  = at(-0.07, 0.20);
    p[Joint::ThumbTip.index()] = at(-0.09, 0.15);

    p[Joint::IndexMcp.index()] = at(0.00, 0.16);
    p[Joint::IndexPip.index()] = at(0.00, 0.08);
    p[Joint::IndexDip.index()] = at(0.00, 0.04);
    p[Joint::IndexTip.index()] = at(0.00, 0.00);

    let raised = |pose: Pose, col: usize| match pose {
        Pose::Open   => true,
        Pose::Scroll => col == 1,
        _            => false,
    };

    // middle, ring, pinky columns to the right of the index finger
    for (col, mcp) in [(1usize, Joint::MiddleMcp), (2, Joint::RingMcp), (3, Joint::PinkyMcp)] {
        let dx = 0.03 * col as f32;
        let base = mcp.index();
        p[base] = at(dx, 0.16);
        p[base + 1] = at(dx, 0.09);
        if raised(pose, col) {
            p[base + 2] = at(dx, 0.05);
            p[base + 3] = at(dx, 0.01);
        } else {
            p[base + 2] = at(dx, 0.13);
            p[base + 3] = at(dx, 0.14);
        }
    }

    if pose == Pose::Pinch {
        p[Joint::ThumbIp.index()]  = at(-0.03, 0.05);
        p[Joint::ThumbTip.index()] = at(0.00, 0.00);
    }

    HandLandmarks::new(p)
        .with_handedness(Some(Handedness::Right))
        .with_score(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::{classify, Gesture, GestureThresholds};

    #[test]
    fn poses_classify_as_named() {
        let t = GestureThresholds::default();
        assert_eq!(classify(&synth_hand(Pose::Point, 0.5, 0.3), &t), Gesture::Point);
        assert_eq!(classify(&synth_hand(Pose::Pinch, 0.5, 0.3), &t), Gesture::Pinch);
        assert_eq!(classify(&synth_hand(Pose::Scroll, 0.5, 0.3), &t), Gesture::Scroll);
        assert_eq!(classify(&synth_hand(Pose::Open, 0.5, 0.3), &t), Gesture::Open);
    }

    #[test]
    fn index_tip_is_where_asked() {
        let hand = synth_hand(Pose::Scroll, 0.25, 0.75);
        assert_eq!(hand[Joint::IndexTip], Landmark::new(0.25, 0.75, 0.0));
    }
}
