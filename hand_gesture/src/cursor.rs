//! Cursor estimation from the index finger.
//!
//! One [`CursorEstimator`] carries the smoothing state across frames; the
//! [`CursorStrategy`] picked at construction decides which landmarks feed it
//! and whether the cursor is gated on posture.

use serde::{Deserialize, Serialize};

use crate::geometry::finger_extended;
use crate::landmark::{Finger, HandLandmarks, Joint, Point};

// ════════════════════════════════════════════════════════════════════════════
// CursorStrategy
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CursorStrategy {
    /// Raw index tip, no smoothing.
    TipFollow,
    /// Index tip with exponential smoothing, `factor` in `(0, 1]`.
    SmoothedTip { factor: f32 },
    /// Weighted tip/pip/mcp blend, smoothed, and only while the index finger
    /// is raised above the wrist.
    WeightedBlend { tip: f32, pip: f32, mcp: f32, factor: f32 },
}

impl Default for CursorStrategy {
    fn default() -> Self {
        CursorStrategy::SmoothedTip { factor: 0.5 }
    }
}

impl CursorStrategy {
    /// Blend with the stock 0.6 / 0.3 / 0.1 weights.
    pub fn weighted_blend(factor: f32) -> Self {
        CursorStrategy::WeightedBlend { tip: 0.6, pip: 0.3, mcp: 0.1, factor }
    }

    fn factor(&self) -> f32 {
        match *self {
            CursorStrategy::TipFollow                       => 1.0,
            CursorStrategy::SmoothedTip { factor }          => factor,
            CursorStrategy::WeightedBlend { factor, .. }    => factor,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CursorEstimator
// ════════════════════════════════════════════════════════════════════════════

/// Cursor state that lives for the whole session.
#[derive(Debug, Clone)]
pub struct CursorEstimator {
    strategy: CursorStrategy,
    last:     Option<Point>,
}

impl CursorEstimator {
    pub fn new(strategy: CursorStrategy) -> Self {
        CursorEstimator { strategy, last: None }
    }

    pub fn strategy(&self) -> CursorStrategy {
        self.strategy
    }

    /// Last emitted position; survives frames without a hand.
    pub fn last(&self) -> Option<Point> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Cursor for this frame in `frame_w × frame_h` pixels.
    ///
    /// `None` when there is no hand or the gate rejects the posture; in both
    /// cases the smoothing state is left as it was.
    pub fn estimate(&mut self, hand: Option<&HandLandmarks>, frame_w: f32, frame_h: f32) -> Option<Point> {
        let hand = hand?;
        let raw = self.raw_point(hand, frame_w, frame_h)?;

        let factor = self.strategy.factor();
        let next = match self.last {
            Some(prev) => Point::new(
                prev.x + (raw.x - prev.x) * factor,
                prev.y + (raw.y - prev.y) * factor,
            ),
            None => raw,
        };
        self.last = Some(next);
        Some(next)
    }

    fn raw_point(&self, hand: &HandLandmarks, frame_w: f32, frame_h: f32) -> Option<Point> {
        match self.strategy {
            CursorStrategy::TipFollow | CursorStrategy::SmoothedTip { .. } => {
                Some(hand.to_pixels(Joint::IndexTip, frame_w, frame_h))
            }
            CursorStrategy::WeightedBlend { tip, pip, mcp, .. } => {
                let pointing_up = hand[Joint::IndexTip].y < hand[Joint::Wrist].y;
                if !finger_extended(hand, Finger::Index) || !pointing_up {
                    return None;
                }
                let total = tip + pip + mcp;
                if total <= 0.0 {
                    return None;
                }
                let (t, p, m) = (hand[Joint::IndexTip], hand[Joint::IndexPip], hand[Joint::IndexMcp]);
                let x = (t.x * tip + p.x * pip + m.x * mcp) / total;
                let y = (t.y * tip + p.y * pip + m.y * mcp) / total;
                Some(Point::new(x * frame_w, y * frame_h))
            }
        }
    }
}

impl Default for CursorEstimator {
    fn default() -> Self {
        CursorEstimator::new(CursorStrategy::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
