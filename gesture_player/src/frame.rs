//! Per-frame orchestration: landmarks in, cursor / scroll / click out.
//!
//! [`FrameProcessor`] owns the state that has to survive between frames (the
//! cursor smoothing, the scroll offset, the previous cursor height and the
//! pinch latch).  Everything else is recomputed every frame.

use std::time::Instant;

use hand_gesture::{
    classify, is_scroll_gesture, pinch_position, remap, rescale, CursorEstimator, Gesture,
    GestureThresholds, HandLandmarks, Point, ScrollAccumulator, SplitView,
};
use playlist::{PlaybackService, Song};

use crate::config::{AppConfig, GestureConfig};
use crate::interaction::{hover, resolve_click, Interaction};
use crate::layout::{Layout, RegionKind};
use crate::session::PlaybackSession;

/// What the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// Cursor in UI coordinates.
    pub cursor:        Option<Point>,
    /// Cursor in camera pixels, for the preview.
    pub camera_cursor: Option<Point>,
    pub is_clicking:   bool,
    pub scroll_offset: i32,
    pub scroll_active: bool,
    pub hover:         Option<RegionKind>,
    pub interaction:   Interaction,
    pub gesture:       Option<Gesture>,
}

impl FrameOutput {
    fn idle(scroll_offset: i32) -> Self {
        FrameOutput {
            cursor:        None,
            camera_cursor: None,
            is_clicking:   false,
            scroll_offset,
            scroll_active: false,
            hover:         None,
            interaction:   Interaction::None,
            gesture:       None,
        }
    }
}

pub struct FrameProcessor {
    thresholds:           GestureThresholds,
    cursor:               CursorEstimator,
    scroll:               ScrollAccumulator,
    layout:               Layout,
    split:                Option<SplitView>,
    click_on_pinch_start: bool,
    prev_y:               Option<f32>,
    pinch_held:           bool,
}

impl FrameProcessor {
    pub fn new(gesture: &GestureConfig, layout: Layout, split: Option<SplitView>) -> Self {
        FrameProcessor {
            thresholds:           gesture.thresholds,
            cursor:               CursorEstimator::new(gesture.cursor),
            scroll:               ScrollAccumulator::new(gesture.scroll, layout.height()),
            layout,
            split,
            click_on_pinch_start: gesture.click_on_pinch_start,
            prev_y:               None,
            pinch_held:           false,
        }
    }

    /// Full-canvas UI, or camera preview on the left and UI on the right when
    /// split view is on.
    pub fn from_config(cfg: &AppConfig) -> Self {
        let (w, h) = (cfg.camera.width as f32, cfg.camera.height as f32);
        let split = cfg.display.split_view.then(|| SplitView::halves(w, 2.0 * w));
        let layout = match &split {
            Some(s) => Layout::new(cfg.layout.clone(), s.ui_origin_x, s.ui_width, h),
            None    => Layout::new(cfg.layout.clone(), 0.0, w, h),
        };
        FrameProcessor::new(&cfg.gesture, layout, split)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn split(&self) -> Option<&SplitView> {
        self.split.as_ref()
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll.offset()
    }

    /// Width of the whole canvas, preview included.
    pub fn canvas_width(&self) -> f32 {
        self.layout.right()
    }

    /// Camera size the layout was built for.
    fn camera_size(&self) -> (f32, f32) {
        let w = self.split.map_or(self.layout.width(), |s| s.camera_width);
        (w, self.layout.height())
    }

    /// Frame pixels → UI pixels, whatever resolution the detector reports.
    fn to_ui(&self, p: Point, frame_w: f32, frame_h: f32) -> Point {
        let camera = rescale(p, (frame_w, frame_h), self.camera_size());
        remap(camera, self.split.as_ref())
    }

    /// Run one frame.  Without a hand nothing but the bookkeeping changes:
    /// no scroll, no click, no playback call.
    pub fn process<S: PlaybackService>(
        &mut self,
        hand:    Option<&HandLandmarks>,
        frame_w: f32,
        frame_h: f32,
        songs:   &mut [Song],
        session: &mut PlaybackSession<S>,
        now:     Instant,
    ) -> FrameOutput {
        let Some(hand) = hand else {
            self.prev_y = None;
            self.pinch_held = false;
            return FrameOutput::idle(self.scroll.offset());
        };

        self.scroll.set_frame_height(frame_h);
        let camera_cursor = self.cursor.estimate(Some(hand), frame_w, frame_h);
        let cursor = camera_cursor.map(|p| self.to_ui(p, frame_w, frame_h));
        let scroll_active = is_scroll_gesture(hand, &self.thresholds);
        let pinch = pinch_position(hand, frame_w, frame_h, &self.thresholds);

        let mut interaction = Interaction::None;
        let mut is_clicking = false;

        if scroll_active && camera_cursor.is_some() {
            let before = self.scroll.offset();
            let after = self.scroll.update(camera_cursor.map(|p| p.y), self.prev_y, true);
            if after != before {
                log::trace!("scroll {} -> {}", before, after);
            }
        } else if let Some(p) = pinch {
            is_clicking = true;
            if !(self.click_on_pinch_start && self.pinch_held) {
                let click = self.to_ui(p, frame_w, frame_h);
                interaction = resolve_click(&self.layout, click, self.scroll.offset(), songs, session);
                log::debug!("click at ({:.0}, {:.0}) at {:?}: {:?}", click.x, click.y, now, interaction);
            }
        }
        self.pinch_held = pinch.is_some();

        let scroll_offset = self.scroll.offset();
        let hover = hover(&self.layout, cursor, songs.len(), scroll_offset);
        self.prev_y = camera_cursor.map(|p| p.y);

        FrameOutput {
            cursor,
            camera_cursor,
            is_clicking,
            scroll_offset,
            scroll_active,
            hover,
            interaction,
            gesture: Some(classify(hand, &self.thresholds)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use hand_gesture::CursorStrategy;
    use playlist::Library;

    use crate::pose::{synth_hand, Pose};
    use crate::session::testing::ScriptedPlayback;
    use crate::session::Action;

    const W: f32 = 1920.0;
    const H: f32 = 1080.0;

    struct Rig {
        fp:    FrameProcessor,
        songs: Vec<Song>,
        sess:  PlaybackSession<ScriptedPlayback>,
    }

    impl Rig {
        fn new(cfg: AppConfig) -> Self {
            Rig {
                fp:    FrameProcessor::from_config(&cfg),
                songs: Library::demo().songs().to_vec(),
                sess:  PlaybackSession::new(ScriptedPlayback::default(), Duration::from_secs(1)),
            }
        }

        fn tip_follow() -> Self {
            let mut cfg = AppConfig::default();
            cfg.gesture.cursor = CursorStrategy::TipFollow;
            Rig::new(cfg)
        }

        /// One frame with `pose` whose index tip sits at pixel `(x, y)`.
        fn frame(&mut self, pose: Option<Pose>, x: f32, y: f32) -> FrameOutput {
            self.frame_sized(pose, x / W, y / H, W, H)
        }

        /// One frame at normalised `(nx, ny)` from a `w`×`h` detector.
        fn frame_sized(&mut self, pose: Option<Pose>, nx: f32, ny: f32, w: f32, h: f32) -> FrameOutput {
            let hand = pose.map(|p| synth_hand(p, nx, ny));
            self.fp.process(hand.as_ref(), w, h, &mut self.songs, &mut self.sess, Instant::now())
        }

        fn calls(&self) -> Vec<Action> {
            self.sess.service().calls.iter().map(|(a, _)| *a).collect()
        }
    }

    #[test]
    fn no_hand_is_a_quiet_frame() {
        let mut rig = Rig::tip_follow();
        let out = rig.frame(None, 0.0, 0.0);
        assert_eq!(out.cursor, None);
        assert_eq!(out.scroll_offset, 0);
        assert_eq!(out.interaction, Interaction::None);
        assert!(!out.is_clicking);
        assert!(rig.sess.service().calls.is_empty());
        assert_eq!(rig.sess.service().polls, 0);
    }

    #[test]
    fn scroll_gesture_accumulates() {
        let mut rig = Rig::tip_follow();
        rig.frame(Some(Pose::Scroll), 800.0, 300.0);
        // (100 - 20) * 0.8 = 64 → 60
        let out = rig.frame(Some(Pose::Scroll), 800.0, 400.0);
        assert!(out.scroll_active);
        assert_eq!(out.scroll_offset, 60);
        // inside the dead zone
        let out = rig.frame(Some(Pose::Scroll), 800.0, 415.0);
        assert_eq!(out.scroll_offset, 60);
    }

    #[test]
    fn lost_hand_resets_previous_height() {
        let mut rig = Rig::tip_follow();
        rig.frame(Some(Pose::Scroll), 800.0, 300.0);
        rig.frame(None, 0.0, 0.0);
        // first frame after the gap has nothing to compare with
        let out = rig.frame(Some(Pose::Scroll), 800.0, 700.0);
        assert_eq!(out.scroll_offset, 0);
    }

    #[test]
    fn pointing_does_not_scroll_or_click() {
        let mut rig = Rig::tip_follow();
        rig.frame(Some(Pose::Point), 800.0, 300.0);
        let out = rig.frame(Some(Pose::Point), 800.0, 700.0);
        assert_eq!(out.scroll_offset, 0);
        assert!(!out.is_clicking);
        assert_eq!(out.interaction, Interaction::None);
        assert_eq!(out.gesture, Some(Gesture::Point));
    }

    #[test]
    fn pinch_clicks_once_per_pinch() {
        let mut rig = Rig::tip_follow();
        let at = rig.fp.layout().play_center(rig.fp.layout().row_y(0, 0));

        let out = rig.frame(Some(Pose::Pinch), at.x, at.y);
        assert!(out.is_clicking);
        assert_eq!(out.interaction, Interaction::Play(rig.songs[0].id.clone()));
        assert_eq!(out.hover, Some(RegionKind::PlayButton(0)));

        // held
        let out = rig.frame(Some(Pose::Pinch), at.x, at.y);
        assert!(out.is_clicking);
        assert_eq!(out.interaction, Interaction::None);

        // released and pinched again
        rig.frame(Some(Pose::Point), at.x, at.y);
        let out = rig.frame(Some(Pose::Pinch), at.x, at.y);
        assert_eq!(out.interaction, Interaction::AlreadyPlaying(rig.songs[0].id.clone()));

        assert_eq!(rig.calls(), [Action::Play]);
    }

    #[test]
    fn held_pinch_repeats_when_latch_is_off() {
        let mut cfg = AppConfig::default();
        cfg.gesture.cursor = CursorStrategy::TipFollow;
        cfg.gesture.click_on_pinch_start = false;
        let mut rig = Rig::new(cfg);
        let l = rig.fp.layout().clone();
        let at = l.pause_center(l.row_y(2, 0));

        rig.frame(Some(Pose::Pinch), at.x, at.y);
        let out = rig.frame(Some(Pose::Pinch), at.x, at.y);
        assert_eq!(out.interaction, Interaction::PauseIgnored(rig.songs[2].id.clone()));
    }

    #[test]
    fn click_uses_scrolled_rows() {
        let mut rig = Rig::tip_follow();
        rig.frame(Some(Pose::Scroll), 800.0, 300.0);
        // (145 - 20) * 0.8 = 100
        assert_eq!(rig.frame(Some(Pose::Scroll), 800.0, 445.0).scroll_offset, 100);

        // row 1 now sits where row 0 was
        let at = rig.fp.layout().play_center(rig.fp.layout().row_y(0, 0));
        rig.frame(Some(Pose::Point), at.x, at.y);
        let out = rig.frame(Some(Pose::Pinch), at.x, at.y);
        assert_eq!(out.interaction, Interaction::Play(rig.songs[1].id.clone()));
    }

    #[test]
    fn only_one_song_plays_after_switching() {
        let mut rig = Rig::tip_follow();
        let l = rig.fp.layout().clone();
        for row in [0, 2, 4] {
            let at = l.play_center(l.row_y(row, 0));
            rig.frame(Some(Pose::Point), at.x, at.y);
            rig.frame(Some(Pose::Pinch), at.x, at.y);
        }
        let playing: Vec<usize> = rig.songs.iter().enumerate()
            .filter(|(_, s)| s.is_playing)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(playing, [4]);
        assert_eq!(rig.calls(), [Action::Play, Action::Stop, Action::Play, Action::Stop, Action::Play]);
    }

    #[test]
    fn split_view_remaps_clicks_onto_ui_half() {
        let mut cfg = AppConfig::default();
        cfg.gesture.cursor = CursorStrategy::TipFollow;
        cfg.display.split_view = true;
        let mut rig = Rig::new(cfg);
        assert_eq!(rig.fp.layout().origin_x(), W);
        assert_eq!(rig.fp.canvas_width(), 2.0 * W);

        // camera x = 100 → UI x = 100 + 1920, inside the sidebar
        let out = rig.frame(Some(Pose::Pinch), 100.0, 170.0);
        assert!(matches!(out.interaction, Interaction::Menu { index: 1, .. }));
        assert!((out.cursor.unwrap().x - (100.0 + W)).abs() < 0.01);
        assert!((out.camera_cursor.unwrap().x - 100.0).abs() < 0.01);
    }

    #[test]
    fn smaller_detector_frames_still_reach_the_buttons() {
        let mut rig = Rig::tip_follow();
        let l = rig.fp.layout().clone();
        let play = l.play_center(l.row_y(0, 0));

        // a 1280×720 webcam against the 1920×1080 layout
        let out = rig.frame_sized(Some(Pose::Point), 1.0, play.y / H, 1280.0, 720.0);
        assert!((out.cursor.unwrap().x - W).abs() < 0.01);
        assert!((out.camera_cursor.unwrap().x - 1280.0).abs() < 0.01);

        let out = rig.frame_sized(Some(Pose::Pinch), play.x / W, play.y / H, 1280.0, 720.0);
        assert_eq!(out.interaction, Interaction::Play(rig.songs[0].id.clone()));

        // bottom rows are reachable too
        let last = l.row_y(9, 0);
        let out = rig.frame_sized(Some(Pose::Point), 0.5, last / H, 1280.0, 720.0);
        assert!((out.cursor.unwrap().y - last).abs() < 0.01);
    }

    #[test]
    fn split_view_scales_both_axes_from_smaller_frames() {
        let mut cfg = AppConfig::default();
        cfg.gesture.cursor = CursorStrategy::TipFollow;
        cfg.display.split_view = true;
        let mut rig = Rig::new(cfg);

        // menu item 1 sits at y = 170 in the 1080-high layout
        let out = rig.frame_sized(Some(Pose::Pinch), 100.0 / W, 170.0 / H, 1280.0, 720.0);
        assert!(matches!(out.interaction, Interaction::Menu { index: 1, .. }));
        let p = out.cursor.unwrap();
        assert!((p.x - (100.0 + W)).abs() < 0.01);
        assert!((p.y - 170.0).abs() < 0.01);
    }

    #[test]
    fn smoothing_trails_the_fingertip() {
        let mut rig = Rig::new(AppConfig::default());
        rig.frame(Some(Pose::Point), 400.0, 400.0);
        let out = rig.frame(Some(Pose::Point), 800.0, 400.0);
        let x = out.cursor.unwrap().x;
        assert!((x - 600.0).abs() < 0.5, "x = {}", x);
    }
}
