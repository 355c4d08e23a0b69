//! Vertical scroll offset driven by cursor motion during the scroll gesture.
//!
//! The offset is a running sum of filtered deltas, not an absolute mapping.
//! Order per update: dead zone, subtract threshold, scale, quantise,
//! accumulate, clamp.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Dead zone in pixels; deltas at or below this are ignored.
    #[serde(default = "ScrollConfig::default_movement_threshold")]
    pub movement_threshold: f32,
    #[serde(default = "ScrollConfig::default_sensitivity")]
    pub sensitivity: f32,
    /// Each step is rounded to a multiple of this many pixels.
    #[serde(default = "ScrollConfig::default_quantum")]
    pub quantum: f32,
    /// Upper bound as a multiple of the frame height.
    #[serde(default = "ScrollConfig::default_max_scroll_frames")]
    pub max_scroll_frames: f32,
}

impl ScrollConfig {
    fn default_movement_threshold() -> f32 {
        20.0
    }
    fn default_sensitivity() -> f32 {
        0.8
    }
    fn default_quantum() -> f32 {
        10.0
    }
    fn default_max_scroll_frames() -> f32 {
        2.0
    }

    pub fn max_scroll(&self, frame_height: f32) -> i32 {
        (self.max_scroll_frames * frame_height) as i32
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig {
            movement_threshold: Self::default_movement_threshold(),
            sensitivity:        Self::default_sensitivity(),
            quantum:            Self::default_quantum(),
            max_scroll_frames:  Self::default_max_scroll_frames(),
        }
    }
}

/// One scroll step.  Returns `offset` untouched unless the gesture is active,
/// both positions exist, and the move clears the dead zone.
pub fn update_scroll(
    cursor_y:      Option<f32>,
    prev_cursor_y: Option<f32>,
    active:        bool,
    offset:        i32,
    cfg:           &ScrollConfig,
    frame_height:  f32,
) -> i32 {
    let (Some(y), Some(prev)) = (cursor_y, prev_cursor_y) else {
        return offset;
    };
    if !active {
        return offset;
    }

    let delta = y - prev;
    if delta.abs() <= cfg.movement_threshold {
        return offset;
    }

    let amount = delta.signum() * (delta.abs() - cfg.movement_threshold) * cfg.sensitivity;
    let amount = if cfg.quantum > 0.0 {
        (amount / cfg.quantum).round_ties_even() * cfg.quantum
    } else {
        amount
    };

    let max = cfg.max_scroll(frame_height) as f32;
    (offset as f32 + amount).clamp(0.0, max) as i32
}

// ════════════════════════════════════════════════════════════════════════════
// ScrollAccumulator
// ════════════════════════════════════════════════════════════════════════════

/// Owns the offset between frames.
#[derive(Debug, Clone)]
pub struct ScrollAccumulator {
    cfg:          ScrollConfig,
    frame_height: f32,
    offset:       i32,
}

impl ScrollAccumulator {
    pub fn new(cfg: ScrollConfig, frame_height: f32) -> Self {
        ScrollAccumulator { cfg, frame_height, offset: 0 }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn max_scroll(&self) -> i32 {
        self.cfg.max_scroll(self.frame_height)
    }

    /// Follow a change in frame size; the offset is re-clamped.
    pub fn set_frame_height(&mut self, frame_height: f32) {
        if frame_height != self.frame_height {
            self.frame_height = frame_height;
            self.offset = self.offset.clamp(0, self.max_scroll().max(0));
        }
    }

    pub fn update(&mut self, cursor_y: Option<f32>, prev_cursor_y: Option<f32>, active: bool) -> i32 {
        self.offset = update_scroll(
            cursor_y, prev_cursor_y, active, self.offset, &self.cfg, self.frame_height,
        );
        self.offset
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const H: f32 = 1080.0;

    fn step(y: f32, prev: f32, offset: i32) -> i32 {
        update_scroll(Some(y), Some(prev), true, offset, &ScrollConfig::default(), H)
    }

    #[test]
    fn inactive_never_changes_offset() {
        let cfg = ScrollConfig::default();
        for (y, prev) in [(500.0, 100.0), (100.0, 500.0), (0.0, 1000.0)] {
            assert_eq!(update_scroll(Some(y), Some(prev), false, 120, &cfg, H), 120);
        }
    }

    #[test]
    fn missing_positions_are_ignored() {
        let cfg = ScrollConfig::default();
        assert_eq!(update_scroll(None, Some(100.0), true, 40, &cfg, H), 40);
        assert_eq!(update_scroll(Some(300.0), None, true, 40, &cfg, H), 40);
    }

    #[test]
    fn dead_zone() {
        assert_eq!(step(110.0, 100.0, 0), 0);
        assert_eq!(step(120.0, 100.0, 0), 0);
        assert_eq!(step(80.0, 100.0, 50), 50);
    }

    #[test]
    fn threshold_then_scale_then_quantise() {
        // (70 - 20) * 0.8 = 40
        assert_eq!(step(170.0, 100.0, 0), 40);
        // (45 - 20) * 0.8 = 20
        assert_eq!(step(145.0, 100.0, 100), 120);
        // upward: -(60 - 20) * 0.8 = -32 → -30
        assert_eq!(step(40.0, 100.0, 100), 70);
    }

    #[test]
    fn quantise_rounds_half_to_even() {
        // (26.25 - 20) * 0.8 = 5 → 0
        assert_eq!(step(126.25, 100.0, 0), 0);
        // (38.75 - 20) * 0.8 = 15 → 20
        assert_eq!(step(138.75, 100.0, 0), 20);
    }

    #[test]
    fn clamps_to_range() {
        let mut acc = ScrollAccumulator::new(ScrollConfig::default(), H);
        for _ in 0..100 {
            acc.update(Some(600.0), Some(100.0), true);
            assert!(acc.offset() <= 2 * H as i32);
        }
        assert_eq!(acc.offset(), acc.max_scroll());

        for _ in 0..100 {
            acc.update(Some(100.0), Some(600.0), true);
            assert!(acc.offset() >= 0);
        }
        assert_eq!(acc.offset(), 0);
    }

    #[test]
    fn shrinking_frame_reclamps() {
        let mut acc = ScrollAccumulator::new(ScrollConfig::default(), H);
        for _ in 0..100 {
            acc.update(Some(600.0), Some(100.0), true);
        }
        acc.set_frame_height(480.0);
        assert_eq!(acc.offset(), 960);
    }
}
