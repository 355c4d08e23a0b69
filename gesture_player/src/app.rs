//! Top-level loop: frame slot → processor → session → renderer.
//!
//! [`App`] owns the per-session state (songs, playback session, last frame
//! result); [`run`] wires it to a detector source and either a window or the
//! headless log.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};

use hand_gesture::HandLandmarks;
use playlist::{MidiPlayback, NullOut, PlaybackService, Song};

use crate::cli::{Args, SourceKind};
use crate::config::AppConfig;
use crate::frame::{FrameOutput, FrameProcessor};
use crate::interaction::Interaction;
use crate::session::PlaybackSession;
use crate::source::{
    spawn_detector_source, CommandSource, Frame, FrameSlot, ReplaySource, SimSource, StdinSource,
};
use crate::visualizer::{Scene, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// App
// ════════════════════════════════════════════════════════════════════════════

pub struct App<S: PlaybackService> {
    processor:     FrameProcessor,
    session:       PlaybackSession<S>,
    songs:         Vec<Song>,
    now_playing:   Option<Song>,
    output:        FrameOutput,
    hand:          Option<HandLandmarks>,
    menu_selected: Option<usize>,
    status:        String,
}

impl<S: PlaybackService> App<S> {
    pub fn new(cfg: &AppConfig, songs: Vec<Song>, service: S) -> Self {
        let processor = FrameProcessor::from_config(cfg);
        let output = FrameOutput {
            cursor:        None,
            camera_cursor: None,
            is_clicking:   false,
            scroll_offset: processor.scroll_offset(),
            scroll_active: false,
            hover:         None,
            interaction:   Interaction::None,
            gesture:       None,
        };
        App {
            processor,
            session:       PlaybackSession::new(service, cfg.playback.poll_interval()),
            songs,
            now_playing:   None,
            output,
            hand:          None,
            menu_selected: None,
            status:        "Point to move, pinch to click, two fingers to scroll".to_string(),
        }
    }

    /// Track shown in the now-playing panel while no row is active.
    pub fn with_now_playing(mut self, song: Option<Song>) -> Self {
        self.now_playing = song;
        self
    }

    pub fn processor(&self) -> &FrameProcessor {
        &self.processor
    }

    pub fn session(&self) -> &PlaybackSession<S> {
        &self.session
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn output(&self) -> &FrameOutput {
        &self.output
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn menu_selected(&self) -> Option<usize> {
        self.menu_selected
    }

    /// One loop tick.  A new frame is processed if there is one; the
    /// playback state is reconciled either way (rate limited).
    pub fn step(&mut self, frame: Option<Frame>, now: Instant) {
        if let Some(frame) = frame {
            let out = self.processor.process(
                frame.hand.as_ref(),
                frame.width,
                frame.height,
                &mut self.songs,
                &mut self.session,
                now,
            );
            if !out.interaction.is_none() {
                self.status = out.interaction.describe(&self.songs);
                log::info!("{}", self.status);
            }
            if let Interaction::Menu { index, .. } = &out.interaction {
                self.menu_selected = Some(*index);
            }
            self.hand = frame.hand;
            self.output = out;
        }
        self.session.reconcile(&mut self.songs, now);
    }

    pub fn scene<'a>(&'a self, clock: &'a str) -> Scene<'a> {
        Scene {
            layout:        self.processor.layout(),
            split:         self.processor.split(),
            songs:         &self.songs,
            active:        self.session.active(),
            now_playing:   self.now_playing.as_ref(),
            frame:         &self.output,
            hand:          self.hand.as_ref(),
            menu_selected: self.menu_selected,
            status:        &self.status,
            clock,
        }
    }
}

/// Catalogue matches for `query`, as the playback service sees them.
pub fn search_catalogue<S: PlaybackService>(service: &mut S, query: &str, limit: usize) -> Result<Vec<Song>> {
    service.search(query, limit).with_context(|| format!("searching for {:?}", query))
}

/// `--search`: a silent backend is enough, no MIDI port is opened.
pub fn run_search(cfg: &AppConfig, query: &str) -> Result<Vec<Song>> {
    let mut service = MidiPlayback::with_output(cfg.library(), cfg.playback.midi.clone(), Box::new(NullOut));
    search_catalogue(&mut service, query, 20)
}

/// `HH:MM` (UTC) for the top bar.
pub fn clock_label(now: SystemTime) -> String {
    let secs = now.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    let day = secs % 86_400;
    format!("{:02}:{:02}", day / 3600, (day % 3600) / 60)
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Drain `slot` until its source is finished, sleeping `idle` whenever no
/// frame is waiting.  Returns the number of frames processed.
pub fn run_headless<S: PlaybackService>(app: &mut App<S>, slot: &FrameSlot, idle: Duration) -> u64 {
    let mut frames = 0u64;
    loop {
        match slot.take() {
            Some(frame) => {
                app.step(Some(frame), Instant::now());
                frames += 1;
            }
            None if slot.is_finished() => break,
            None => {
                app.step(None, Instant::now());
                thread::sleep(idle);
            }
        }
    }
    frames
}

/// Run the full application with the settings from `cfg` and `args`.
pub fn run(cfg: AppConfig, args: &Args) -> Result<()> {
    let library = cfg.library();
    let songs = library.songs().to_vec();
    let service = MidiPlayback::connect(library, cfg.playback.midi.clone())
        .context("opening playback")?;
    let mut app = App::new(&cfg, songs, service).with_now_playing(cfg.now_playing());

    let size = (cfg.camera.width, cfg.camera.height);
    let mut sim_tx = None;
    let (slot, _source) = match args.source {
        SourceKind::Sim => {
            if args.headless {
                bail!("the sim source needs a window; pick --source stdin, replay or command");
            }
            let (tx, rx) = mpsc::channel();
            sim_tx = Some(tx);
            spawn_detector_source(SimSource { rx, width: size.0 as f32, height: size.1 as f32 })
        }
        SourceKind::Stdin => spawn_detector_source(StdinSource { default_size: size }),
        SourceKind::Replay => {
            let path = args.replay.clone().context("--source replay needs --replay <file>")?;
            spawn_detector_source(ReplaySource { path, fps: args.replay_fps, default_size: size })
        }
        SourceKind::Command => {
            let cmd = args.detector_cmd.clone().context("--source command needs --detector-cmd <cmd>")?;
            spawn_detector_source(CommandSource { cmd, default_size: size })
        }
    };

    let idle = Duration::from_secs_f32(1.0 / cfg.display.fps.max(1) as f32);

    if args.headless {
        let frames = run_headless(&mut app, &slot, idle);
        log::info!("{} frames processed, {} dropped", frames, slot.dropped());
        return Ok(());
    }

    let w = app.processor().canvas_width() as usize;
    let h = app.processor().layout().height() as usize;
    let mut vis = Visualizer::new(w, h, cfg.display.fps, sim_tx)
        .map_err(anyhow::Error::msg)
        .context("opening window")?;

    while vis.is_open() {
        if !vis.poll_input(app.processor().layout(), app.processor().split()) {
            break;
        }
        app.step(slot.take(), Instant::now());
        let clock = clock_label(SystemTime::now());
        vis.render(&app.scene(&clock));
    }
    log::info!("window closed after {} frames ({} dropped)", slot.written(), slot.dropped());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
