//! In-memory catalogue.

use crate::song::{Song, SongEntry, SongId};

#[derive(Debug, Clone, Default)]
pub struct Library {
    songs: Vec<Song>,
}

impl Library {
    pub fn new(songs: Vec<Song>) -> Self {
        Library { songs }
    }

    pub fn from_entries(entries: Vec<SongEntry>) -> Self {
        Library::new(entries.into_iter().map(Song::from).collect())
    }

    /// Ten-track demo playlist.
    pub fn demo() -> Self {
        Library::new(demo_playlist())
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, id: &SongId) -> Option<&Song> {
        self.songs.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &SongId) -> bool {
        self.get(id).is_some()
    }

    /// Case-insensitive substring match on title, artist and album, in
    /// catalogue order.  An empty query lists the catalogue.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Song> {
        let q = query.trim().to_lowercase();
        self.songs
            .iter()
            .filter(|s| {
                q.is_empty()
                    || s.title.to_lowercase().contains(&q)
                    || s.artist.to_lowercase().contains(&q)
                    || s.album.as_deref().is_some_and(|a| a.to_lowercase().contains(&q))
            })
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Shown in the now-playing panel of the demo until a row is played.  Not
/// part of the playlist.
pub fn demo_now_playing() -> Song {
    Song::new("Starlight Dreams", "Luna Eclipse", "3:45")
        .with_album("Midnight Waves")
        .with_progress(0.7)
}

pub fn demo_playlist() -> Vec<Song> {
    vec![
        Song::new("Cosmic Journey", "Solar Beats",   "4:12"),
        Song::new("Ocean Breeze",   "Wave Riders",   "3:28"),
        Song::new("Mountain Echo",  "Nature Sound",  "5:01"),
        Song::new("City Lights",    "Urban Pulse",   "3:56"),
        Song::new("Desert Wind",    "Sand Walker",   "4:45"),
        Song::new("Forest Rain",    "Green Echo",    "3:33"),
        Song::new("Night Drive",    "Midnight Run",  "4:22"),
        Song::new("Morning Mist",   "Dawn Breaker",  "3:15"),
        Song::new("Sunset Melody",  "Evening Glow",  "4:05"),
        Song::new("River Flow",     "Water Spirit",  "3:48"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn demo_has_ten_rows_without_the_now_playing_track() {
        let lib = Library::demo();
        assert_eq!(lib.len(), 10);
        assert_eq!(lib.songs()[0].title, "Cosmic Journey");
        assert_eq!(lib.songs()[2].duration, Duration::from_secs(301));
        assert!(!lib.contains(&demo_now_playing().id));
    }

    #[test]
    fn search_matches_title_artist_album() {
        let lib = Library::demo();
        let hits: Vec<_> = lib.search("echo", 10).into_iter().map(|s| s.title).collect();
        assert_eq!(hits, ["Mountain Echo", "Forest Rain"]);
        assert_eq!(lib.search("MIDNIGHT", 10).len(), 1);
        assert!(lib.search("zzz", 10).is_empty());
    }

    #[test]
    fn empty_query_lists_with_limit() {
        let lib = Library::demo();
        assert_eq!(lib.search("", 4).len(), 4);
        assert_eq!(lib.search("  ", 100).len(), 10);
    }

    #[test]
    fn entries_from_toml() {
        #[derive(serde::Deserialize)]
        struct Doc {
            songs: Vec<SongEntry>,
        }
        let doc: Doc = toml::from_str(
            r#"
            [[songs]]
            title = "Glass Harbor"
            artist = "Tide Lines"
            duration = "2:59"

            [[songs]]
            id = "remote:42"
            title = "Paper Moons"
            artist = "Kite Club"
            duration = "4:00"
            album = "Folds"
            "#,
        )
        .unwrap();
        let lib = Library::from_entries(doc.songs);
        assert_eq!(lib.len(), 2);
        assert!(lib.contains(&SongId::from_title("Glass Harbor")));
        assert_eq!(lib.get(&SongId("remote:42".into())).unwrap().album.as_deref(), Some("Folds"));
    }
}
