//! Click resolution: which region a click lands in, and the playback action
//! that follows.
//!
//! Exactly one region answers per click, in [`Layout::regions`] order.  Local
//! `is_playing` flags move only after the service confirms a call.

use hand_gesture::Point;
use playlist::{PlaybackError, PlaybackService, Song, SongId};

use crate::layout::{Layout, RegionKind};
use crate::session::{Action, PlaybackSession};

#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    None,
    Menu { index: usize, label: String },
    /// Row body outside the buttons; nothing is sent to the service.
    Selected(SongId),
    Play(SongId),
    Resume(SongId),
    AlreadyPlaying(SongId),
    Pause(SongId),
    PauseIgnored(SongId),
    Failed { action: Action, song: SongId, error: PlaybackError },
}

impl Interaction {
    pub fn is_none(&self) -> bool {
        matches!(self, Interaction::None)
    }

    /// One line for the status bar.
    pub fn describe(&self, songs: &[Song]) -> String {
        let title = |id: &SongId| {
            songs
                .iter()
                .find(|s| &s.id == id)
                .map(|s| s.title.clone())
                .unwrap_or_else(|| id.to_string())
        };
        match self {
            Interaction::None                    => String::new(),
            Interaction::Menu { label, .. }      => format!("Menu: {}", label),
            Interaction::Selected(id)            => format!("Selected {}", title(id)),
            Interaction::Play(id)                => format!("Playing {}", title(id)),
            Interaction::Resume(id)              => format!("Resumed {}", title(id)),
            Interaction::AlreadyPlaying(id)      => format!("{} is already playing", title(id)),
            Interaction::Pause(id)               => format!("Paused {}", title(id)),
            Interaction::PauseIgnored(id)        => format!("{} is not playing", title(id)),
            Interaction::Failed { action, song, error } => {
                format!("Could not {} {}: {}", action, title(song), error)
            }
        }
    }
}

/// Region under the displayed cursor, for highlighting.
pub fn hover(layout: &Layout, cursor: Option<Point>, n_songs: usize, scroll: i32) -> Option<RegionKind> {
    cursor.and_then(|p| layout.hit_test(p, n_songs, scroll))
}

/// Resolve one click at `click` (UI coordinates) and carry out its action.
pub fn resolve_click<S: PlaybackService>(
    layout:  &Layout,
    click:   Point,
    scroll:  i32,
    songs:   &mut [Song],
    session: &mut PlaybackSession<S>,
) -> Interaction {
    let Some(kind) = layout.hit_test(click, songs.len(), scroll) else {
        return Interaction::None;
    };

    match kind {
        RegionKind::MenuItem(index) => {
            let label = layout.config().menu_items.get(index).cloned().unwrap_or_default();
            log::debug!("menu: {}", label);
            Interaction::Menu { index, label }
        }
        RegionKind::PlaylistRow(i) => {
            log::debug!("selected: {}", songs[i].title);
            Interaction::Selected(songs[i].id.clone())
        }
        RegionKind::PlayButton(i)  => press_play(i, songs, session),
        RegionKind::PauseButton(i) => press_pause(i, songs, session),
    }
}

fn press_play<S: PlaybackService>(
    i:       usize,
    songs:   &mut [Song],
    session: &mut PlaybackSession<S>,
) -> Interaction {
    let id = songs[i].id.clone();

    if session.is_active(&id) {
        if songs[i].is_playing {
            return Interaction::AlreadyPlaying(id);
        }
        return match session.resume(&songs[i]) {
            Ok(()) => {
                songs[i].is_playing = true;
                Interaction::Resume(id)
            }
            Err(error) => Interaction::Failed { action: Action::Resume, song: id, error },
        };
    }

    // Stop whatever else is active first; give up if that fails.
    if let Some(prev) = session.active().cloned() {
        let prev_idx = songs.iter().position(|s| s.id == prev);
        let stopped = match prev_idx {
            Some(p) => session.stop(&songs[p]),
            None    => session.stop(&placeholder(&prev)),
        };
        if let Err(error) = stopped {
            return Interaction::Failed { action: Action::Stop, song: prev, error };
        }
        if let Some(p) = prev_idx {
            songs[p].is_playing = false;
        }
    }

    match session.play(&songs[i]) {
        Ok(()) => {
            for (j, song) in songs.iter_mut().enumerate() {
                song.is_playing = j == i;
            }
            log::debug!("playing: {}", songs[i].title);
            Interaction::Play(id)
        }
        Err(error) => Interaction::Failed { action: Action::Play, song: id, error },
    }
}

fn press_pause<S: PlaybackService>(
    i:       usize,
    songs:   &mut [Song],
    session: &mut PlaybackSession<S>,
) -> Interaction {
    let id = songs[i].id.clone();
    if !session.is_active(&id) {
        return Interaction::PauseIgnored(id);
    }
    match session.pause(&songs[i]) {
        Ok(()) => {
            songs[i].is_playing = false;
            Interaction::Pause(id)
        }
        Err(error) => Interaction::Failed { action: Action::Pause, song: id, error },
    }
}

/// Stand-in for an active song that is not in the displayed list.
fn placeholder(id: &SongId) -> Song {
    Song { id: id.clone(), ..Song::new(id.as_str(), "", "0:00") }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use playlist::Library;

    use crate::layout::LayoutConfig;
    use crate::session::testing::ScriptedPlayback;

    fn layout() -> Layout {
        Layout::new(LayoutConfig::default(), 0.0, 1920.0, 1080.0)
    }

    fn songs() -> Vec<Song> {
        Library::demo().songs().to_vec()
    }

    fn session(svc: ScriptedPlayback) -> PlaybackSession<ScriptedPlayback> {
        PlaybackSession::new(svc, Duration::from_secs(1))
    }

    fn play_at(l: &Layout, row: usize) -> Point {
        l.play_center(l.row_y(row, 0))
    }

    fn pause_at(l: &Layout, row: usize) -> Point {
        l.pause_center(l.row_y(row, 0))
    }

    #[test]
    fn empty_space_is_no_interaction() {
        let l = layout();
        let mut s = songs();
        let mut sess = session(ScriptedPlayback::default());
        let out = resolve_click(&l, Point::new(1000.0, 30.0), 0, &mut s, &mut sess);
        assert_eq!(out, Interaction::None);
        assert!(sess.service().calls.is_empty());
    }

    #[test]
    fn menu_wins_over_overlapping_row() {
        // Sidebar wide enough to reach under row 0's play button.
        let cfg = LayoutConfig { sidebar_width: 1600.0, play_offset_x: -100.0, ..LayoutConfig::default() };
        let l = Layout::new(cfg, 0.0, 1920.0, 1080.0);
        let mut s = songs();
        let mut sess = session(ScriptedPlayback::default());

        // menu slot 2 is at y = 220, row 0 at y = 210
        let row_y = l.row_y(0, 0);
        let click = Point::new(l.play_center(row_y).x, l.menu_slot_y(2) - 5.0);
        assert!(l.regions(s.len(), 0).iter().any(|r| r.kind == RegionKind::PlayButton(0) && r.shape.contains(click)));

        let out = resolve_click(&l, click, 0, &mut s, &mut sess);
        assert!(matches!(out, Interaction::Menu { index: 2, .. }));
        assert!(sess.service().calls.is_empty());
    }

    #[test]
    fn row_body_selects_without_playback() {
        let l = layout();
        let mut s = songs();
        let mut sess = session(ScriptedPlayback::default());
        let out = resolve_click(&l, Point::new(600.0, l.row_y(2, 0)), 0, &mut s, &mut sess);
        assert_eq!(out, Interaction::Selected(s[2].id.clone()));
        assert!(sess.service().calls.is_empty());
    }

    #[test]
    fn play_switches_active_song() {
        let l = layout();
        let mut s = songs();
        let mut sess = session(ScriptedPlayback::default());

        assert_eq!(resolve_click(&l, play_at(&l, 0), 0, &mut s, &mut sess), Interaction::Play(s[0].id.clone()));
        assert!(s[0].is_playing);

        assert_eq!(resolve_click(&l, play_at(&l, 3), 0, &mut s, &mut sess), Interaction::Play(s[3].id.clone()));
        assert!(!s[0].is_playing);
        assert!(s[3].is_playing);
        assert_eq!(s.iter().filter(|x| x.is_playing).count(), 1);
        assert!(sess.is_active(&s[3].id));

        let calls: Vec<Action> = sess.service().calls.iter().map(|(a, _)| *a).collect();
        assert_eq!(calls, [Action::Play, Action::Stop, Action::Play]);
        assert_eq!(sess.service().calls[1].1, s[0].id);
    }

    #[test]
    fn paused_active_song_is_stopped_before_switching() {
        let l = layout();
        let mut s = songs();
        let mut sess = session(ScriptedPlayback::default());

        resolve_click(&l, play_at(&l, 0), 0, &mut s, &mut sess);
        resolve_click(&l, pause_at(&l, 0), 0, &mut s, &mut sess);
        assert!(!s[0].is_playing);
        assert!(sess.is_active(&s[0].id));

        assert_eq!(resolve_click(&l, play_at(&l, 1), 0, &mut s, &mut sess), Interaction::Play(s[1].id.clone()));
        assert!(!s[0].is_playing && s[1].is_playing);
        assert!(sess.is_active(&s[1].id));
        assert!(!sess.is_active(&s[0].id));

        let calls: Vec<Action> = sess.service().calls.iter().map(|(a, _)| *a).collect();
        assert_eq!(calls, [Action::Play, Action::Pause, Action::Stop, Action::Play]);
        assert_eq!(sess.service().calls[2].1, s[0].id);
    }

    #[test]
    fn play_clears_stale_flags_from_any_prior_state() {
        let l = layout();
        let mut s = songs();
        s[1].is_playing = true;
        s[5].is_playing = true;
        let mut sess = session(ScriptedPlayback::default());
        resolve_click(&l, play_at(&l, 2), 0, &mut s, &mut sess);
        let playing: Vec<usize> = s.iter().enumerate().filter(|(_, x)| x.is_playing).map(|(i, _)| i).collect();
        assert_eq!(playing, [2]);
    }

    #[test]
    fn play_on_active_song() {
        let l = layout();
        let mut s = songs();
        let mut sess = session(ScriptedPlayback::default());
        resolve_click(&l, play_at(&l, 1), 0, &mut s, &mut sess);

        assert_eq!(
            resolve_click(&l, play_at(&l, 1), 0, &mut s, &mut sess),
            Interaction::AlreadyPlaying(s[1].id.clone())
        );

        resolve_click(&l, pause_at(&l, 1), 0, &mut s, &mut sess);
        assert!(!s[1].is_playing);
        assert_eq!(
            resolve_click(&l, play_at(&l, 1), 0, &mut s, &mut sess),
            Interaction::Resume(s[1].id.clone())
        );
        assert!(s[1].is_playing);

        let calls: Vec<Action> = sess.service().calls.iter().map(|(a, _)| *a).collect();
        assert_eq!(calls, [Action::Play, Action::Pause, Action::Resume]);
    }

    #[test]
    fn pause_on_inactive_song_is_ignored() {
        let l = layout();
        let mut s = songs();
        let mut sess = session(ScriptedPlayback::default());
        resolve_click(&l, play_at(&l, 0), 0, &mut s, &mut sess);
        assert_eq!(
            resolve_click(&l, pause_at(&l, 4), 0, &mut s, &mut sess),
            Interaction::PauseIgnored(s[4].id.clone())
        );
        assert!(s[0].is_playing);
        assert_eq!(sess.service().calls.len(), 1);
    }

    #[test]
    fn failed_play_leaves_song_stopped() {
        let l = layout();
        let mut s = songs();
        let mut sess = session(ScriptedPlayback::failing(
            Action::Play,
            PlaybackError::Restricted("premium required".into()),
        ));
        let out = resolve_click(&l, play_at(&l, 0), 0, &mut s, &mut sess);
        assert!(matches!(out, Interaction::Failed { action: Action::Play, .. }));
        assert!(!s[0].is_playing);
        assert_eq!(sess.active(), None);
    }

    #[test]
    fn failed_stop_leaves_previous_song_untouched() {
        let l = layout();
        let mut s = songs();
        let mut sess = session(ScriptedPlayback::default());
        resolve_click(&l, play_at(&l, 0), 0, &mut s, &mut sess);

        sess.service_mut().failures.insert(Action::Stop, PlaybackError::Disconnected);
        let out = resolve_click(&l, play_at(&l, 2), 0, &mut s, &mut sess);
        assert_eq!(
            out,
            Interaction::Failed { action: Action::Stop, song: s[0].id.clone(), error: PlaybackError::Disconnected }
        );
        assert!(s[0].is_playing);
        assert!(!s[2].is_playing);
        assert!(sess.is_active(&s[0].id));
    }

    #[test]
    fn failed_pause_keeps_playing_flag() {
        let l = layout();
        let mut s = songs();
        let mut sess = session(ScriptedPlayback::default());
        resolve_click(&l, play_at(&l, 0), 0, &mut s, &mut sess);
        sess.service_mut().failures.insert(Action::Pause, PlaybackError::Disconnected);
        let out = resolve_click(&l, pause_at(&l, 0), 0, &mut s, &mut sess);
        assert!(matches!(out, Interaction::Failed { action: Action::Pause, .. }));
        assert!(s[0].is_playing);
    }

    #[test]
    fn active_song_outside_list_is_stopped_by_id() {
        let l = layout();
        let mut s = songs();
        let mut sess = session(ScriptedPlayback::default());
        let elsewhere = Song::new("Starlight Dreams", "Luna Eclipse", "3:45");
        sess.play(&elsewhere).unwrap();

        resolve_click(&l, play_at(&l, 0), 0, &mut s, &mut sess);
        assert_eq!(sess.service().calls[1], (Action::Stop, elsewhere.id.clone()));
        assert!(sess.is_active(&s[0].id));
    }

    #[test]
    fn hover_reports_region_under_cursor() {
        let l = layout();
        assert_eq!(hover(&l, None, 10, 0), None);
        assert_eq!(hover(&l, Some(Point::new(50.0, 170.0)), 10, 0), Some(RegionKind::MenuItem(1)));
        assert_eq!(hover(&l, Some(play_at(&l, 4)), 10, 0), Some(RegionKind::PlayButton(4)));
    }
}
