//! Songs as the UI and the playback service see them.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Stable identifier the playback service understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub String);

impl SongId {
    /// `local:` id derived from a title, e.g. "Ocean Breeze" → `local:ocean-breeze`.
    pub fn from_title(title: &str) -> Self {
        let mut slug = String::with_capacity(title.len());
        let mut dash = false;
        for c in title.chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
                dash = false;
            } else if !dash && !slug.is_empty() {
                slug.push('-');
                dash = true;
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        SongId(format!("local:{}", slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Song
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub id:         SongId,
    pub title:      String,
    pub artist:     String,
    pub duration:   Duration,
    pub album:      Option<String>,
    /// Fraction played, 0.0–1.0.  Owned by the playback service.
    pub progress:   f32,
    /// Owned by the playback service; the UI only mirrors confirmed changes.
    pub is_playing: bool,
}

impl Song {
    pub fn new(title: &str, artist: &str, duration: &str) -> Self {
        Song {
            id:         SongId::from_title(title),
            title:      title.to_string(),
            artist:     artist.to_string(),
            duration:   parse_duration(duration).unwrap_or_default(),
            album:      None,
            progress:   0.0,
            is_playing: false,
        }
    }

    pub fn with_album(mut self, album: &str) -> Self {
        self.album = Some(album.to_string());
        self
    }

    pub fn with_progress(mut self, progress: f32) -> Self {
        self.progress = progress.clamp(0.0, 1.0);
        self
    }

    /// `m:ss` for display.
    pub fn duration_label(&self) -> String {
        format_duration(self.duration)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SongEntry — the config/catalogue form
// ════════════════════════════════════════════════════════════════════════════

/// A catalogue entry as written in TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id:       Option<SongId>,
    pub title:    String,
    pub artist:   String,
    /// `m:ss`
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album:    Option<String>,
}

impl From<SongEntry> for Song {
    fn from(e: SongEntry) -> Song {
        let duration = parse_duration(&e.duration).unwrap_or_else(|| {
            log::warn!("song {:?}: bad duration {:?}, using 0:00", e.title, e.duration);
            Duration::ZERO
        });
        Song {
            id:         e.id.unwrap_or_else(|| SongId::from_title(&e.title)),
            title:      e.title,
            artist:     e.artist,
            duration,
            album:      e.album,
            progress:   0.0,
            is_playing: false,
        }
    }
}

impl From<&Song> for SongEntry {
    fn from(s: &Song) -> SongEntry {
        SongEntry {
            id:       Some(s.id.clone()),
            title:    s.title.clone(),
            artist:   s.artist.clone(),
            duration: s.duration_label(),
            album:    s.album.clone(),
        }
    }
}

/// Parse `m:ss` (or `h:mm:ss`).
pub fn parse_duration(s: &str) -> Option<Duration> {
    let mut secs = 0u64;
    let mut parts = 0;
    for part in s.trim().split(':') {
        let v: u64 = part.parse().ok()?;
        if parts > 0 && v >= 60 {
            return None;
        }
        secs = secs * 60 + v;
        parts += 1;
    }
    if !(2..=3).contains(&parts) {
        return None;
    }
    Some(Duration::from_secs(secs))
}

pub fn format_duration(d: Duration) -> String {
    let s = d.as_secs();
    format!("{}:{:02}", s / 60, s % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_title() {
        assert_eq!(SongId::from_title("Ocean Breeze").as_str(), "local:ocean-breeze");
        assert_eq!(SongId::from_title("  Night -- Drive! ").as_str(), "local:night-drive");
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("3:45"), Some(Duration::from_secs(225)));
        assert_eq!(parse_duration("1:02:03"), Some(Duration::from_secs(3723)));
        assert_eq!(parse_duration("3:75"), None);
        assert_eq!(parse_duration("345"), None);
        assert_eq!(parse_duration("x:10"), None);
        assert_eq!(format_duration(Duration::from_secs(245)), "4:05");
    }

    #[test]
    fn entry_to_song_and_back() {
        let e = SongEntry {
            id: None,
            title: "Forest Rain".into(),
            artist: "Green Echo".into(),
            duration: "3:33".into(),
            album: None,
        };
        let song: Song = e.clone().into();
        assert_eq!(song.id.as_str(), "local:forest-rain");
        assert!(!song.is_playing);
        let back = SongEntry::from(&song);
        assert_eq!(back.duration, "3:33");
        assert_eq!(back.title, e.title);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(Song::new("a", "b", "1:00").with_progress(1.7).progress, 1.0);
    }
}
