//! # gesture_player
//!
//! A playlist UI driven by one hand in front of a camera: the index fingertip
//! moves the cursor, a thumb/index pinch clicks, and two raised fingers held
//! together scroll.
//!
//! ## Per frame
//!
//! ```text
//! detector thread ──► FrameSlot ──► FrameProcessor::process ──► Interaction
//!                                         │                        │
//!                                         ▼                        ▼
//!                                    Visualizer              PlaybackSession
//!                                                          (reconciled ≤ 1/s)
//! ```
//!
//! [`frame`] holds everything that survives between frames; [`interaction`]
//! decides what a click means; [`session`] is the only path to the playback
//! service.

pub mod config;
pub mod layout;
pub mod session;
pub mod interaction;
pub mod pose;
pub mod frame;
pub mod source;
pub mod visualizer;
pub mod cli;
pub mod app;

pub use config::AppConfig;
pub use frame::{FrameOutput, FrameProcessor};
pub use interaction::Interaction;
pub use layout::{Layout, LayoutConfig, RegionKind};
pub use session::PlaybackSession;
pub use source::{spawn_detector_source, DetectorSource, Frame, FrameSlot, SimInput};
