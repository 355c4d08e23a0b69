//! Where hands come from: a detector on its own thread, handing frames to
//! the loop through a one-entry mailbox.
//!
//! Every source implements [`DetectorSource`] and is started with
//! [`spawn_detector_source`].  The loop never blocks on a source; it takes
//! whatever frame is newest, and unread frames that get overwritten are
//! only counted.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

use hand_gesture::{parse_detection_line, HandLandmarks};

use crate::pose::{synth_hand, Pose};

// ════════════════════════════════════════════════════════════════════════════
// Frame + FrameSlot
// ════════════════════════════════════════════════════════════════════════════

/// One detector frame: at most one hand plus the frame size in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub hand:   Option<HandLandmarks>,
    pub width:  f32,
    pub height: f32,
}

#[derive(Debug, Default)]
struct SlotState {
    latest:  Option<Frame>,
    written: u64,
    dropped: u64,
    closed:  bool,
}

/// Single-entry latest-frame buffer shared by one writer and one reader.
#[derive(Debug, Clone, Default)]
pub struct FrameSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        FrameSlot::default()
    }

    // A panicking writer cannot leave the slot half-written; keep going.
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace whatever is waiting.
    pub fn put(&self, frame: Frame) {
        let mut s = self.lock();
        if s.latest.replace(frame).is_some() {
            s.dropped += 1;
        }
        s.written += 1;
    }

    pub fn take(&self) -> Option<Frame> {
        self.lock().latest.take()
    }

    /// The writer is done; whatever is still waiting can be taken.
    pub fn close(&self) {
        self.lock().closed = true;
    }

    /// Closed and drained.
    pub fn is_finished(&self) -> bool {
        let s = self.lock();
        s.closed && s.latest.is_none()
    }

    pub fn written(&self) -> u64 {
        self.lock().written
    }

    pub fn dropped(&self) -> u64 {
        self.lock().dropped
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DetectorSource
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("reading detector input: {0}")]
    Io(#[from] io::Error),
    #[error("cannot open replay file {path:?}: {source}")]
    Replay { path: PathBuf, source: io::Error },
    #[error("cannot start detector `{cmd}`: {source}")]
    Spawn { cmd: String, source: io::Error },
    #[error("detector `{0}` has no stdout")]
    NoStdout(String),
}

/// Anything that can fill a [`FrameSlot`].  `run` returns when the input is
/// exhausted; the slot is closed afterwards either way.
pub trait DetectorSource: Send + 'static {
    fn name(&self) -> &'static str;
    fn run(self: Box<Self>, slot: &FrameSlot) -> Result<(), SourceError>;
}

/// Start `source` on its own thread.
pub fn spawn_detector_source<D: DetectorSource>(source: D) -> (FrameSlot, JoinHandle<()>) {
    let slot = FrameSlot::new();
    let writer = slot.clone();
    let handle = thread::spawn(move || {
        let name = source.name();
        log::info!("{} source started", name);
        match Box::new(source).run(&writer) {
            Ok(())  => log::info!("{} source finished after {} frames", name, writer.written()),
            Err(e)  => log::error!("{} source stopped: {}", name, e),
        }
        writer.close();
    });
    (slot, handle)
}

// ════════════════════════════════════════════════════════════════════════════
// JSON-lines sources
// ════════════════════════════════════════════════════════════════════════════

/// Decode detection lines from `reader` into `slot` until EOF.  Malformed
/// lines are logged and skipped.  With `pace`, sleep that long after each
/// frame.
pub fn pump_lines<R: BufRead>(
    reader:       R,
    slot:         &FrameSlot,
    default_size: (u32, u32),
    pace:         Option<Duration>,
) -> Result<u64, SourceError> {
    let mut frames = 0u64;
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let detection = match parse_detection_line(&line) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("line {}: {}", n + 1, e);
                continue;
            }
        };
        let (w, h) = detection.frame_size(default_size);
        slot.put(Frame { hand: detection.hand, width: w as f32, height: h as f32 });
        frames += 1;
        if let Some(d) = pace {
            thread::sleep(d);
        }
    }
    Ok(frames)
}

/// Detector output piped into our stdin.
pub struct StdinSource {
    pub default_size: (u32, u32),
}

impl DetectorSource for StdinSource {
    fn name(&self) -> &'static str {
        "stdin"
    }

    fn run(self: Box<Self>, slot: &FrameSlot) -> Result<(), SourceError> {
        let stdin = io::stdin();
        pump_lines(stdin.lock(), slot, self.default_size, None)?;
        Ok(())
    }
}

/// A recorded session, played back at `fps`.
pub struct ReplaySource {
    pub path:         PathBuf,
    pub fps:          f32,
    pub default_size: (u32, u32),
}

impl ReplaySource {
    /// `None` means as fast as possible, including for rates too small to
    /// turn into a delay.
    fn pace(&self) -> Option<Duration> {
        if self.fps > 0.0 {
            Duration::try_from_secs_f32(1.0 / self.fps).ok()
        } else {
            None
        }
    }
}

impl DetectorSource for ReplaySource {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn run(self: Box<Self>, slot: &FrameSlot) -> Result<(), SourceError> {
        let file = File::open(&self.path)
            .map_err(|source| SourceError::Replay { path: self.path.clone(), source })?;
        pump_lines(BufReader::new(file), slot, self.default_size, self.pace())?;
        Ok(())
    }
}

/// An external detector process (camera + hand landmarker) whose stdout is
/// JSON lines.  Run through the platform shell so arguments can be given
/// inline.
pub struct CommandSource {
    pub cmd:          String,
    pub default_size: (u32, u32),
}

impl CommandSource {
    fn command(&self) -> Command {
        if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        }
    }
}

impl DetectorSource for CommandSource {
    fn name(&self) -> &'static str {
        "detector"
    }

    fn run(self: Box<Self>, slot: &FrameSlot) -> Result<(), SourceError> {
        let mut child = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SourceError::Spawn { cmd: self.cmd.clone(), source })?;

        let stdout = child.stdout.take().ok_or_else(|| SourceError::NoStdout(self.cmd.clone()))?;
        let result = pump_lines(BufReader::new(stdout), slot, self.default_size, None);

        match child.wait() {
            Ok(status) if !status.success() => log::warn!("detector exited with {}", status),
            Ok(_) => {}
            Err(e) => log::warn!("waiting for detector: {}", e),
        }
        result.map(|_| ())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimSource — mouse + keyboard stand-in for a camera
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimInput {
    /// Index tip at normalised camera coordinates, held in `pose`.
    Hand { x: f32, y: f32, pose: Pose },
    /// Pointer left the window.
    NoHand,
    Quit,
}

/// Turns [`SimInput`]s from the visualizer into synthetic detector frames.
pub struct SimSource {
    pub rx:     Receiver<SimInput>,
    pub width:  f32,
    pub height: f32,
}

impl DetectorSource for SimSource {
    fn name(&self) -> &'static str {
        "sim"
    }

    fn run(self: Box<Self>, slot: &FrameSlot) -> Result<(), SourceError> {
        for input in self.rx.iter() {
            let hand = match input {
                SimInput::Hand { x, y, pose } => Some(synth_hand(pose, x, y)),
                SimInput::NoHand => None,
                SimInput::Quit => break,
            };
            slot.put(Frame { hand, width: self.width, height: self.height });
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
