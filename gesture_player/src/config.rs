//! TOML configuration.
//!
//! Every field has a serde default, so a partial file only overrides what it
//! names.  A missing file is created with the defaults written out.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hand_gesture::{CursorStrategy, GestureThresholds, ScrollConfig};
use playlist::{demo_now_playing, Library, MidiSettings, Song, SongEntry};

use crate::layout::LayoutConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("parsing {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
}

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Frame size used when a detection line does not carry one.
    #[serde(default = "CameraConfig::default_width")]
    pub width:  u32,
    #[serde(default = "CameraConfig::default_height")]
    pub height: u32,
}

impl CameraConfig {
    fn default_width() -> u32 {
        1920
    }
    fn default_height() -> u32 {
        1080
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig { width: Self::default_width(), height: Self::default_height() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    #[serde(default)]
    pub thresholds:           GestureThresholds,
    #[serde(default)]
    pub cursor:               CursorStrategy,
    #[serde(default)]
    pub scroll:               ScrollConfig,
    /// Fire a click only on the first frame of a pinch.
    #[serde(default = "GestureConfig::default_click_on_pinch_start")]
    pub click_on_pinch_start: bool,
}

impl GestureConfig {
    fn default_click_on_pinch_start() -> bool {
        true
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            thresholds:           GestureThresholds::default(),
            cursor:               CursorStrategy::default(),
            scroll:               ScrollConfig::default(),
            click_on_pinch_start: Self::default_click_on_pinch_start(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Minimum time between current-playback queries.
    #[serde(default = "PlaybackConfig::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub midi:             MidiSettings,
}

impl PlaybackConfig {
    fn default_poll_interval_ms() -> u64 {
        1000
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            poll_interval_ms: Self::default_poll_interval_ms(),
            midi:             MidiSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Hand preview on the left half, controls on the right.
    #[serde(default)]
    pub split_view: bool,
    /// Frames per second for the render loop.
    #[serde(default = "DisplayConfig::default_fps")]
    pub fps:        u32,
}

impl DisplayConfig {
    fn default_fps() -> u32 {
        30
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig { split_view: false, fps: Self::default_fps() }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub camera:   CameraConfig,
    #[serde(default)]
    pub gesture:  GestureConfig,
    #[serde(default)]
    pub layout:   LayoutConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub display:  DisplayConfig,
    /// Catalogue; the demo playlist when empty.
    #[serde(default)]
    pub songs:    Vec<SongEntry>,
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_string(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_string(), source })
    }

    /// Load `path`; on a missing file write the defaults there, on a bad file
    /// warn and use the defaults.
    pub fn load_or_default(path: &str) -> Self {
        if Path::new(path).exists() {
            return match Self::load(path) {
                Ok(cfg) => cfg,
                Err(e)  => {
                    log::warn!("{}; using defaults", e);
                    Self::default()
                }
            };
        }

        let cfg = Self::default();
        match toml::to_string_pretty(&cfg) {
            Ok(text) => match fs::write(path, text) {
                Ok(())  => log::info!("wrote default config to {}", path),
                Err(e)  => log::warn!("could not write default config to {}: {}", path, e),
            },
            Err(e) => log::warn!("could not serialise default config: {}", e),
        }
        cfg
    }

    pub fn library(&self) -> Library {
        if self.songs.is_empty() {
            Library::demo()
        } else {
            Library::from_entries(self.songs.clone())
        }
    }

    /// Track for the now-playing panel before anything is played.  Only the
    /// demo catalogue has one.
    pub fn now_playing(&self) -> Option<Song> {
        self.songs.is_empty().then(demo_now_playing)
    }
}
