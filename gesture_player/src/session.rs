//! The playback service plus the one piece of state the UI keeps about it:
//! which song is active.
//!
//! The session is owned by the frame loop and lent to the resolver; the
//! service's own view (polled through [`PlaybackSession::reconcile`]) always
//! wins over local flags.

use std::fmt;
use std::time::{Duration, Instant};

use playlist::{PlaybackError, PlaybackService, Song, SongId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Play,
    Pause,
    Resume,
    Stop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Play   => "play",
            Action::Pause  => "pause",
            Action::Resume => "resume",
            Action::Stop   => "stop",
        })
    }
}

pub struct PlaybackSession<S: PlaybackService> {
    service:       S,
    active:        Option<SongId>,
    poll_interval: Duration,
    last_poll:     Option<Instant>,
}

impl<S: PlaybackService> PlaybackSession<S> {
    pub fn new(service: S, poll_interval: Duration) -> Self {
        PlaybackSession { service, active: None, poll_interval, last_poll: None }
    }

    pub fn active(&self) -> Option<&SongId> {
        self.active.as_ref()
    }

    pub fn is_active(&self, id: &SongId) -> bool {
        self.active.as_ref() == Some(id)
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    /// Start `song`; it becomes active only once the service accepts.
    pub fn play(&mut self, song: &Song) -> Result<(), PlaybackError> {
        self.call(Action::Play, song)?;
        self.active = Some(song.id.clone());
        Ok(())
    }

    pub fn pause(&mut self, song: &Song) -> Result<(), PlaybackError> {
        self.call(Action::Pause, song)
    }

    pub fn resume(&mut self, song: &Song) -> Result<(), PlaybackError> {
        self.call(Action::Resume, song)
    }

    /// Stop `song`; clears the active pointer if it was the active one.
    pub fn stop(&mut self, song: &Song) -> Result<(), PlaybackError> {
        self.call(Action::Stop, song)?;
        if self.is_active(&song.id) {
            self.active = None;
        }
        Ok(())
    }

    fn call(&mut self, action: Action, song: &Song) -> Result<(), PlaybackError> {
        let result = match action {
            Action::Play   => self.service.play(song),
            Action::Pause  => self.service.pause(song),
            Action::Resume => self.service.resume(song),
            Action::Stop   => self.service.stop(song),
        };
        if let Err(e) = &result {
            log::warn!("{} {:?} failed: {}", action, song.title, e);
        }
        result
    }

    /// Query the service for what is playing, at most once per poll
    /// interval, and overwrite local flags with the answer.  Returns whether
    /// a poll happened.  A failed poll leaves everything as it was.
    pub fn reconcile(&mut self, songs: &mut [Song], now: Instant) -> bool {
        if let Some(last) = self.last_poll {
            if now.saturating_duration_since(last) < self.poll_interval {
                return false;
            }
        }
        self.last_poll = Some(now);

        match self.service.current_playback() {
            Ok(Some(snap)) => {
                for song in songs.iter_mut() {
                    if song.id == snap.song {
                        song.is_playing = snap.is_playing;
                        song.progress = snap.progress.clamp(0.0, 1.0);
                    } else {
                        song.is_playing = false;
                    }
                }
                if self.active.as_ref() != Some(&snap.song) {
                    log::debug!("active song is now {}", snap.song);
                }
                self.active = Some(snap.song);
            }
            Ok(None) => {
                for song in songs.iter_mut() {
                    song.is_playing = false;
                }
                self.active = None;
            }
            Err(e) => log::warn!("playback poll failed: {}", e),
        }
        true
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scripted service for tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use playlist::{PlaybackError, PlaybackService, PlaybackSnapshot, Song, SongId};

    use super::Action;

    /// Records every call; fails the actions it is told to.
    #[derive(Debug, Default)]
    pub struct ScriptedPlayback {
        pub calls:    Vec<(Action, SongId)>,
        pub failures: HashMap<Action, PlaybackError>,
        pub snapshot: Option<PlaybackSnapshot>,
        pub poll_err: Option<PlaybackError>,
        pub polls:    usize,
    }

    impl ScriptedPlayback {
        pub fn failing(action: Action, err: PlaybackError) -> Self {
            let mut s = ScriptedPlayback::default();
            s.failures.insert(action, err);
            s
        }

        fn record(&mut self, action: Action, song: &Song) -> Result<(), PlaybackError> {
            self.calls.push((action, song.id.clone()));
            match self.failures.get(&action) {
                Some(e) => Err(e.clone()),
                None    => Ok(()),
            }
        }
    }

    impl PlaybackService for ScriptedPlayback {
        fn search(&mut self, _query: &str, _limit: usize) -> Result<Vec<Song>, PlaybackError> {
            Ok(Vec::new())
        }
        fn current_playback(&mut self) -> Result<Option<PlaybackSnapshot>, PlaybackError> {
            self.polls += 1;
            match &self.poll_err {
                Some(e) => Err(e.clone()),
                None    => Ok(self.snapshot.clone()),
            }
        }
        fn play(&mut self, song: &Song) -> Result<(), PlaybackError> {
            self.record(Action::Play, song)
        }
        fn pause(&mut self, song: &Song) -> Result<(), PlaybackError> {
            self.record(Action::Pause, song)
        }
        fn resume(&mut self, song: &Song) -> Result<(), PlaybackError> {
            self.record(Action::Resume, song)
        }
        fn stop(&mut self, song: &Song) -> Result<(), PlaybackError> {
            self.record(Action::Stop, song)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedPlayback;
    use super::*;
    use playlist::{Library, PlaybackSnapshot};

    fn songs() -> Vec<Song> {
        Library::demo().songs()[..3].to_vec()
    }

    #[test]
    fn play_sets_active_only_on_success() {
        let s = songs();
        let mut ok = PlaybackSession::new(ScriptedPlayback::default(), Duration::from_secs(1));
        ok.play(&s[0]).unwrap();
        assert!(ok.is_active(&s[0].id));

        let mut bad = PlaybackSession::new(
            ScriptedPlayback::failing(Action::Play, PlaybackError::DeviceUnavailable),
            Duration::from_secs(1),
        );
        assert_eq!(bad.play(&s[0]), Err(PlaybackError::DeviceUnavailable));
        assert_eq!(bad.active(), None);
    }

    #[test]
    fn stop_clears_only_matching_active() {
        let s = songs();
        let mut sess = PlaybackSession::new(ScriptedPlayback::default(), Duration::from_secs(1));
        sess.play(&s[0]).unwrap();
        sess.stop(&s[1]).unwrap();
        assert!(sess.is_active(&s[0].id));
        sess.stop(&s[0]).unwrap();
        assert_eq!(sess.active(), None);
    }

    #[test]
    fn reconcile_is_rate_limited() {
        let mut s = songs();
        let mut sess = PlaybackSession::new(ScriptedPlayback::default(), Duration::from_secs(1));
        let t0 = Instant::now();
        assert!(sess.reconcile(&mut s, t0));
        assert!(!sess.reconcile(&mut s, t0 + Duration::from_millis(500)));
        assert!(!sess.reconcile(&mut s, t0 + Duration::from_millis(999)));
        assert!(sess.reconcile(&mut s, t0 + Duration::from_millis(1000)));
        assert_eq!(sess.service().polls, 2);
    }

    #[test]
    fn reconcile_overwrites_local_flags() {
        let mut s = songs();
        s[0].is_playing = true;
        let mut sess = PlaybackSession::new(ScriptedPlayback::default(), Duration::ZERO);
        sess.play(&s[0]).unwrap();

        sess.service_mut().snapshot = Some(PlaybackSnapshot {
            song: s[2].id.clone(),
            progress: 0.4,
            is_playing: false,
        });
        sess.reconcile(&mut s, Instant::now());
        assert!(!s[0].is_playing);
        assert!(!s[2].is_playing);
        assert_eq!(s[2].progress, 0.4);
        assert!(sess.is_active(&s[2].id));

        sess.service_mut().snapshot = None;
        sess.reconcile(&mut s, Instant::now());
        assert_eq!(sess.active(), None);
    }

    #[test]
    fn failed_poll_keeps_state() {
        let mut s = songs();
        s[1].is_playing = true;
        let mut sess = PlaybackSession::new(ScriptedPlayback::default(), Duration::ZERO);
        sess.play(&s[1]).unwrap();
        sess.service_mut().poll_err = Some(PlaybackError::Disconnected);
        assert!(sess.reconcile(&mut s, Instant::now()));
        assert!(s[1].is_playing);
        assert!(sess.is_active(&s[1].id));
    }
}
