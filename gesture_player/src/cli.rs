use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::AppConfig;

/// Where hand landmarks come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Mouse and keyboard stand in for a camera.
    Sim,
    /// Detector JSON lines piped into stdin.
    Stdin,
    /// A recorded JSON-lines file.
    Replay,
    /// Spawn a detector process and read its stdout.
    Command,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Hand-gesture music player: pinch to click, two fingers to scroll")]
pub struct Args {
    /// Path to config TOML (written with defaults if missing)
    #[arg(long, default_value = "gesture_player.toml")]
    pub config: String,

    /// Landmark source
    #[arg(long, value_enum, default_value_t = SourceKind::Sim)]
    pub source: SourceKind,

    /// Replay file for `--source replay`
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Replay speed in frames per second (0 = as fast as possible)
    #[arg(long, default_value_t = 30.0)]
    pub replay_fps: f32,

    /// Detector command line for `--source command`
    #[arg(long)]
    pub detector_cmd: Option<String>,

    /// Camera preview on the left, player on the right
    #[arg(long, default_value_t = false)]
    pub split_view: bool,

    /// No window; log interactions until the source runs dry
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Print catalogue matches for a query and exit
    #[arg(long)]
    pub search: Option<String>,

    /// Override the pinch distance threshold
    #[arg(long)]
    pub pinch_threshold: Option<f32>,
}

impl Args {
    /// Fold command-line overrides into the loaded config.
    pub fn apply(&self, cfg: &mut AppConfig) {
        if self.split_view {
            cfg.display.split_view = true;
        }
        if let Some(t) = self.pinch_threshold {
            cfg.gesture.thresholds.pinch_distance = t;
        }
    }
}
