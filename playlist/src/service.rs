//! The playback-service boundary.
//!
//! Implementations may block (network, device I/O) and may fail; callers
//! treat the service's view of what is playing as authoritative.

use thiserror::Error;

use crate::song::{Song, SongId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("no playback device available")]
    DeviceUnavailable,
    #[error("playback restricted: {0}")]
    Restricted(String),
    #[error("unknown song {0}")]
    UnknownSong(SongId),
    #[error("{0} is not the active song")]
    NotActive(SongId),
    #[error("playback service disconnected")]
    Disconnected,
}

/// What the service reports as current.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub song:       SongId,
    /// 0.0–1.0
    pub progress:   f32,
    pub is_playing: bool,
}

pub trait PlaybackService {
    /// Catalogue search, best matches first.
    fn search(&mut self, query: &str, limit: usize) -> Result<Vec<Song>, PlaybackError>;

    /// `None` when nothing is loaded.
    fn current_playback(&mut self) -> Result<Option<PlaybackSnapshot>, PlaybackError>;

    /// Start `song` from the beginning.
    fn play(&mut self, song: &Song) -> Result<(), PlaybackError>;
    fn pause(&mut self, song: &Song) -> Result<(), PlaybackError>;
    fn resume(&mut self, song: &Song) -> Result<(), PlaybackError>;
    /// Unload `song`.  Stopping something that is not loaded succeeds.
    fn stop(&mut self, song: &Song) -> Result<(), PlaybackError>;
}

impl<S: PlaybackService + ?Sized> PlaybackService for Box<S> {
    fn search(&mut self, query: &str, limit: usize) -> Result<Vec<Song>, PlaybackError> {
        (**self).search(query, limit)
    }
    fn current_playback(&mut self) -> Result<Option<PlaybackSnapshot>, PlaybackError> {
        (**self).current_playback()
    }
    fn play(&mut self, song: &Song) -> Result<(), PlaybackError> {
        (**self).play(song)
    }
    fn pause(&mut self, song: &Song) -> Result<(), PlaybackError> {
        (**self).pause(song)
    }
    fn resume(&mut self, song: &Song) -> Result<(), PlaybackError> {
        (**self).resume(song)
    }
    fn stop(&mut self, song: &Song) -> Result<(), PlaybackError> {
        (**self).stop(song)
    }
}
