//! # hand_gesture
//!
//! Turns one hand's 21 normalised landmarks into the inputs a pointer UI
//! needs: a cursor, a click (pinch) and a scroll delta.
//!
//! ## Pipeline
//!
//! | Stage | Module | State |
//! |---|---|---|
//! | finger extension, orientation, distances | [`geometry`] | none |
//! | pinch / scroll / point predicates | [`classify`] | none |
//! | index-finger cursor with smoothing | [`cursor`] | last position |
//! | scroll offset from cursor deltas | [`scroll`] | offset |
//! | camera → UI pane coordinates | [`remap`] | none |
//!
//! Detector output arrives as JSON lines, decoded by [`detection`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use hand_gesture::{parse_detection_line, CursorEstimator, GestureThresholds, is_pinch_gesture};
//!
//! let mut cursor = CursorEstimator::default();
//! let thresholds = GestureThresholds::default();
//! let frame = parse_detection_line(r#"{"hands":[]}"#).unwrap();
//!
//! let pos = cursor.estimate(frame.hand.as_ref(), 1920.0, 1080.0);
//! let clicking = frame.hand.as_ref().map_or(false, |h| is_pinch_gesture(h, &thresholds));
//! println!("{:?} {}", pos, clicking);
//! ```

pub mod landmark;
pub mod geometry;
pub mod classify;
pub mod cursor;
pub mod scroll;
pub mod remap;
pub mod detection;

pub use landmark::{Finger, HandLandmarks, Handedness, Joint, Landmark, LandmarkError, Point, LANDMARK_COUNT};
pub use geometry::{distance_2d, finger_extended, hand_orientation, is_finger_extended, Orientation};
pub use classify::{classify, is_pinch_gesture, is_scroll_gesture, pinch_position, Gesture, GestureThresholds};
pub use cursor::{CursorEstimator, CursorStrategy};
pub use scroll::{update_scroll, ScrollAccumulator, ScrollConfig};
pub use remap::{remap, rescale, SplitView};
pub use detection::{parse_detection_line, to_detection_line, Detection};
