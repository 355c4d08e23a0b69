//! Newline-delimited JSON produced by the external hand detector.
//!
//! One line per camera frame:
//!
//! ```text
//! {"width":1920,"height":1080,"hands":[{"handedness":"Right","score":0.97,
//!   "landmarks":[{"x":0.51,"y":0.62,"z":-0.01}, … 21 entries …]}]}
//! ```
//!
//! `width`/`height` are optional.  Only the first hand is used.

use serde::{Deserialize, Serialize};

use crate::landmark::{HandLandmarks, Handedness, Landmark, LandmarkError};

#[derive(Debug, Serialize, Deserialize)]
struct HandJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handedness: Option<Handedness>,
    #[serde(default = "default_score")]
    score: f32,
    landmarks: Vec<Landmark>,
}

fn default_score() -> f32 {
    1.0
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DetectionJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// One decoded detector frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Detection {
    pub width:  Option<u32>,
    pub height: Option<u32>,
    pub hand:   Option<HandLandmarks>,
}

impl Detection {
    /// Frame size, falling back to `default` for whatever the line omitted.
    pub fn frame_size(&self, default: (u32, u32)) -> (u32, u32) {
        (self.width.unwrap_or(default.0), self.height.unwrap_or(default.1))
    }
}

/// Decode one line.  A hand with the wrong number of landmarks is dropped
/// with a warning; the frame still counts as "no hand".
pub fn parse_detection_line(line: &str) -> Result<Detection, LandmarkError> {
    let raw: DetectionJson = serde_json::from_str(line.trim())
        .map_err(|e| LandmarkError::Malformed(e.to_string()))?;

    if let Some(err) = &raw.error {
        log::warn!("detector reported: {}", err);
    }

    let hand = match raw.hands.into_iter().next() {
        Some(h) => match HandLandmarks::from_slice(&h.landmarks) {
            Ok(lm) => Some(lm.with_handedness(h.handedness).with_score(h.score)),
            Err(e) => {
                log::warn!("dropping hand: {}", e);
                None
            }
        },
        None => None,
    };

    Ok(Detection { width: raw.width, height: raw.height, hand })
}

/// Encode a frame in the format [`parse_detection_line`] reads.
pub fn to_detection_line(hand: Option<&HandLandmarks>, width: u32, height: u32) -> String {
    let raw = DetectionJson {
        width:  Some(width),
        height: Some(height),
        hands:  hand
            .map(|h| vec![HandJson {
                handedness: h.handedness,
                score:      h.score,
                landmarks:  h.points().to_vec(),
            }])
            .unwrap_or_default(),
        error:  None,
    };
    // Plain structs of numbers and strings always serialise.
    serde_json::to_string(&raw).unwrap_or_default()
}
