//! Local playback service: songs rendered as MIDI motifs on a player thread.
//!
//! The thread owns the MIDI connection.  [`MidiPlayback`] talks to it over a
//! command channel and learns what is playing from a status channel, so the
//! caller's frame loop never waits on a note.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::library::Library;
use crate::motif::{motif_for, Scale};
use crate::service::{PlaybackError, PlaybackService, PlaybackSnapshot};
use crate::song::{Song, SongId};

// ════════════════════════════════════════════════════════════════════════════
// MidiSettings
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiSettings {
    /// Substring of the preferred output port name.
    #[serde(default)]
    pub port_hint:      Option<String>,
    /// Fail instead of falling back to silent output when no port exists.
    #[serde(default)]
    pub require_device: bool,
    /// General MIDI program 0–127.
    #[serde(default)]
    pub instrument:     u8,
    #[serde(default = "MidiSettings::default_tempo_bpm")]
    pub tempo_bpm:      u32,
    #[serde(default = "MidiSettings::default_velocity")]
    pub velocity:       u8,
    #[serde(default)]
    pub channel:        u8,
    #[serde(default = "MidiSettings::default_root")]
    pub root:           u8,
    #[serde(default)]
    pub scale:          Scale,
}

impl MidiSettings {
    fn default_tempo_bpm() -> u32 {
        120
    }
    fn default_velocity() -> u8 {
        90
    }
    fn default_root() -> u8 {
        60
    }

    /// One motif step is an eighth note.
    fn step(&self) -> Duration {
        Duration::from_millis((30_000 / self.tempo_bpm.max(1) as u64).max(1))
    }
}

impl Default for MidiSettings {
    fn default() -> Self {
        MidiSettings {
            port_hint:      None,
            require_device: false,
            instrument:     0,
            tempo_bpm:      Self::default_tempo_bpm(),
            velocity:       Self::default_velocity(),
            channel:        0,
            root:           Self::default_root(),
            scale:          Scale::default(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MidiOut — midir or silence
// ════════════════════════════════════════════════════════════════════════════

pub trait MidiOut: Send {
    fn program_change(&mut self, channel: u8, program: u8);
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8);
    fn note_off(&mut self, channel: u8, note: u8);
}

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl MidiOut for MidirOut {
    fn program_change(&mut self, channel: u8, program: u8) {
        let _ = self.conn.send(&[0xC0 | (channel & 0x0F), program & 0x7F]);
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        let _ = self.conn.send(&[0x90 | (channel & 0x0F), note, velocity]);
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        let _ = self.conn.send(&[0x80 | (channel & 0x0F), note, 0]);
    }
}

/// Discards everything.  Used when no port is present and in tests.
pub struct NullOut;

impl MidiOut for NullOut {
    fn program_change(&mut self, _ch: u8, _p: u8)  {}
    fn note_on(&mut self, _ch: u8, _n: u8, _v: u8) {}
    fn note_off(&mut self, _ch: u8, _n: u8)         {}
}

/// Open the hinted port, else the first softsynth-looking port, else port 0.
/// `None` when there is no usable port.
fn open_midi_output(hint: Option<&str>) -> Option<Box<dyn MidiOut>> {
    let midi_out = match midir::MidiOutput::new("gesture_player") {
        Ok(m)  => m,
        Err(e) => {
            log::warn!("MIDI init error: {}", e);
            return None;
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        log::warn!("no MIDI output ports found");
        return None;
    }

    let names: Vec<String> = ports
        .iter()
        .map(|p| midi_out.port_name(p).unwrap_or_default().to_lowercase())
        .collect();
    let wanted = |n: &String| match hint {
        Some(h) => n.contains(&h.to_lowercase()),
        None    => ["fluid", "timidity", "microsoft", "synth", "gm"].iter().any(|k| n.contains(k)),
    };
    let idx = names.iter().position(wanted).unwrap_or(0);

    log::info!("opening MIDI port: {}", names[idx]);
    match midi_out.connect(&ports[idx], "gesture-player-out") {
        Ok(conn) => Some(Box::new(MidirOut { conn })),
        Err(e)   => {
            log::warn!("MIDI connect failed: {}", e);
            None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Player thread protocol
// ════════════════════════════════════════════════════════════════════════════

enum PlayerCommand {
    Play { id: SongId, notes: Vec<u8>, length: Duration },
    Pause,
    Resume,
    Stop,
    Quit,
}

/// Sent after every command and every note.
#[derive(Debug, Clone, PartialEq)]
struct PlayerStatus {
    song:    Option<SongId>,
    elapsed: Duration,
    length:  Duration,
    playing: bool,
}

impl PlayerStatus {
    fn idle() -> Self {
        PlayerStatus { song: None, elapsed: Duration::ZERO, length: Duration::ZERO, playing: false }
    }

    fn snapshot(&self) -> Option<PlaybackSnapshot> {
        let song = self.song.clone()?;
        let progress = if self.length.is_zero() {
            0.0
        } else {
            (self.elapsed.as_secs_f32() / self.length.as_secs_f32()).clamp(0.0, 1.0)
        };
        Some(PlaybackSnapshot { song, progress, is_playing: self.playing })
    }
}

struct Track {
    id:      SongId,
    notes:   Vec<u8>,
    length:  Duration,
    elapsed: Duration,
    next:    usize,
}

fn player_thread(
    mut midi:  Box<dyn MidiOut>,
    settings:  MidiSettings,
    cmd_rx:    Receiver<PlayerCommand>,
    status_tx: Sender<PlayerStatus>,
) {
    let step = settings.step();
    let mut track: Option<Track> = None;
    let mut playing = false;

    let status = |track: &Option<Track>, playing: bool| match track {
        Some(t) => PlayerStatus {
            song: Some(t.id.clone()), elapsed: t.elapsed, length: t.length, playing,
        },
        None => PlayerStatus::idle(),
    };

    midi.program_change(settings.channel, settings.instrument);

    loop {
        // ── drain commands ────────────────────────────────────────────────
        loop {
            let cmd = match cmd_rx.try_recv() {
                Ok(c) => c,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            };
            match cmd {
                PlayerCommand::Play { id, notes, length } => {
                    track = Some(Track { id, notes, length, elapsed: Duration::ZERO, next: 0 });
                    playing = true;
                    midi.program_change(settings.channel, settings.instrument);
                }
                PlayerCommand::Pause  => playing = false,
                PlayerCommand::Resume => playing = track.is_some(),
                PlayerCommand::Stop   => {
                    track = None;
                    playing = false;
                }
                PlayerCommand::Quit   => return,
            }
            if status_tx.send(status(&track, playing)).is_err() {
                return;
            }
        }

        let Some(t) = track.as_mut().filter(|_| playing) else {
            thread::sleep(Duration::from_millis(10));
            continue;
        };

        // ── one motif step ────────────────────────────────────────────────
        let note = t.notes.get(t.next % t.notes.len().max(1)).copied();
        t.next += 1;
        if let Some(n) = note {
            midi.note_on(settings.channel, n, settings.velocity);
        }
        thread::sleep(step);
        if let Some(n) = note {
            midi.note_off(settings.channel, n);
        }
        t.elapsed += step;

        if t.elapsed >= t.length {
            log::info!("finished {}", t.id);
            track = None;
            playing = false;
        }
        if status_tx.send(status(&track, playing)).is_err() {
            return;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MidiPlayback — the PlaybackService
// ════════════════════════════════════════════════════════════════════════════

pub struct MidiPlayback {
    library:   Library,
    settings:  MidiSettings,
    cmd_tx:    Sender<PlayerCommand>,
    status_rx: Receiver<PlayerStatus>,
    last:      PlayerStatus,
}

impl MidiPlayback {
    /// Open a MIDI port and spawn the player thread.
    ///
    /// Without a port this falls back to silent output, unless
    /// `settings.require_device` is set.
    pub fn connect(library: Library, settings: MidiSettings) -> Result<Self, PlaybackError> {
        let out = match open_midi_output(settings.port_hint.as_deref()) {
            Some(o) => o,
            None if settings.require_device => return Err(PlaybackError::DeviceUnavailable),
            None => {
                log::warn!("using silent output (install fluidsynth or timidity to hear playback)");
                Box::new(NullOut)
            }
        };
        Ok(MidiPlayback::with_output(library, settings, out))
    }

    /// Spawn the player thread on an explicit output.
    pub fn with_output(library: Library, settings: MidiSettings, out: Box<dyn MidiOut>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (status_tx, status_rx) = mpsc::channel();
        let thread_settings = settings.clone();
        thread::spawn(move || player_thread(out, thread_settings, cmd_rx, status_tx));

        MidiPlayback { library, settings, cmd_tx, status_rx, last: PlayerStatus::idle() }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    fn send(&self, cmd: PlayerCommand) -> Result<(), PlaybackError> {
        self.cmd_tx.send(cmd).map_err(|_| PlaybackError::Disconnected)
    }

    /// Fold in everything the thread has reported.
    fn drain(&mut self) {
        while let Ok(s) = self.status_rx.try_recv() {
            self.last = s;
        }
    }

    fn loaded(&self) -> Option<&SongId> {
        self.last.song.as_ref()
    }

    fn require_loaded(&mut self, song: &Song) -> Result<(), PlaybackError> {
        self.drain();
        if self.loaded() == Some(&song.id) {
            Ok(())
        } else {
            Err(PlaybackError::NotActive(song.id.clone()))
        }
    }
}

impl PlaybackService for MidiPlayback {
    fn search(&mut self, query: &str, limit: usize) -> Result<Vec<Song>, PlaybackError> {
        Ok(self.library.search(query, limit))
    }

    fn current_playback(&mut self) -> Result<Option<PlaybackSnapshot>, PlaybackError> {
        self.drain();
        Ok(self.last.snapshot())
    }

    fn play(&mut self, song: &Song) -> Result<(), PlaybackError> {
        let known = self.library.get(&song.id).ok_or_else(|| PlaybackError::UnknownSong(song.id.clone()))?;
        let notes = motif_for(&known.id, self.settings.scale, self.settings.root);
        let length = known.duration;
        self.send(PlayerCommand::Play { id: known.id.clone(), notes, length })?;
        // Optimistic until the thread's status arrives.
        self.last = PlayerStatus { song: Some(song.id.clone()), elapsed: Duration::ZERO, length, playing: true };
        Ok(())
    }

    fn pause(&mut self, song: &Song) -> Result<(), PlaybackError> {
        self.require_loaded(song)?;
        self.send(PlayerCommand::Pause)?;
        self.last.playing = false;
        Ok(())
    }

    fn resume(&mut self, song: &Song) -> Result<(), PlaybackError> {
        self.require_loaded(song)?;
        self.send(PlayerCommand::Resume)?;
        self.last.playing = true;
        Ok(())
    }

    fn stop(&mut self, song: &Song) -> Result<(), PlaybackError> {
        self.drain();
        if self.loaded() != Some(&song.id) {
            return Ok(());
        }
        self.send(PlayerCommand::Stop)?;
        self.last = PlayerStatus::idle();
        Ok(())
    }
}

impl Drop for MidiPlayback {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(PlayerCommand::Quit);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
