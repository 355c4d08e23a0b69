//! # playlist
//!
//! Songs, the catalogue they come from, and the [`PlaybackService`] seam the
//! player UI drives.
//!
//! The bundled backend, [`MidiPlayback`], renders each song as a looping
//! motif on a MIDI port (or silently when none is present) and reports
//! progress the same way a remote streaming service would.

pub mod song;
pub mod library;
pub mod service;
pub mod motif;
pub mod midi;

pub use song::{format_duration, parse_duration, Song, SongEntry, SongId};
pub use library::{demo_now_playing, Library};
pub use service::{PlaybackError, PlaybackService, PlaybackSnapshot};
pub use motif::{motif_for, Scale};
pub use midi::{MidiOut, MidiPlayback, MidiSettings, NullOut};
