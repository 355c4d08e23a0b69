//! Software-rendered player UI using `minifb`.
//!
//! Drawing goes into a plain [`Canvas`] so the whole scene can be painted and
//! inspected without a window; [`Visualizer`] owns the window, blits the
//! canvas and turns mouse/keyboard state into [`SimInput`]s.
//!
//! Split view puts a camera preview (hand wireframe) on the left half and the
//! player on the right:
//!
//! ```text
//! ┌──────────────────────┬──────────┬───────────────────────────────────┐
//! │  camera preview      │ sidebar  │ top bar                     12:34 │
//! │                      │          │  Your Playlist                    │
//! │     \|/   wireframe  │ Home     │  Cosmic Journey  ...   (▶) (❚❚)   │
//! │      o               │ ...      │  ...                              │
//! │                      │ [now pl.]│ status                            │
//! └──────────────────────┴──────────┴───────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

use hand_gesture::{HandLandmarks, Joint, Point, SplitView};
use playlist::{Song, SongId};

use crate::frame::FrameOutput;
use crate::layout::{Layout, RegionKind};
use crate::pose::Pose;
use crate::source::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Palette + text metrics
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:      u32 = 0xFF121212;
const SIDEBAR_BG:    u32 = 0xFF000000;
const TOPBAR_BG:     u32 = 0xFF181818;
const PREVIEW_BG:    u32 = 0xFF1A1A2E;
const ROW_HOVER:     u32 = 0xFF2A2A2A;
const ACCENT:        u32 = 0xFF1DB954;
const PAUSE_COLOR:   u32 = 0xFF535353;
const SCROLL_COLOR:  u32 = 0xFF4FA3FF;
const TEXT:          u32 = 0xFFFFFFFF;
const TEXT_DIM:      u32 = 0xFFB3B3B3;
const BONE_COLOR:    u32 = 0xFFAADDFF;
const STATUS_BG:     u32 = 0xFF0F3460;

const STATUS_H:      i32 = 36;
const CURSOR_R:      i32 = 14;

/// Text scale: the 3×5 font drawn in `TEXT_SCALE`-pixel blocks.
const TEXT_SCALE:    i32 = 3;
const SMALL_SCALE:   i32 = 2;

// ════════════════════════════════════════════════════════════════════════════
// Scene — everything one frame needs
// ════════════════════════════════════════════════════════════════════════════

pub struct Scene<'a> {
    pub layout:        &'a Layout,
    pub split:         Option<&'a SplitView>,
    pub songs:         &'a [Song],
    pub active:        Option<&'a SongId>,
    /// Shown when nothing is active.
    pub now_playing:   Option<&'a Song>,
    pub frame:         &'a FrameOutput,
    /// Hand behind `frame`, for the preview wireframe.
    pub hand:          Option<&'a HandLandmarks>,
    pub menu_selected: Option<usize>,
    pub status:        &'a str,
    pub clock:         &'a str,
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas
// ════════════════════════════════════════════════════════════════════════════

/// ARGB framebuffer with clipped drawing primitives.
pub struct Canvas {
    buf: Vec<u32>,
    w:   usize,
    h:   usize,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Canvas { buf: vec![BG_COLOR; w * h], w, h }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn pixels(&self) -> &[u32] {
        &self.buf
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.in_bounds(x, y).then(|| self.buf[y as usize * self.w + x as usize])
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if self.in_bounds(x, y) {
            self.buf[y as usize * self.w + x as usize] = color;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.w as i32);
        let y1 = (y + h).min(self.h as i32);
        for row in y0..y1 {
            let base = row as usize * self.w;
            for col in x0..x1 {
                self.buf[base + col as usize] = color;
            }
        }
    }

    fn draw_border(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        if w <= 0 || h <= 0 {
            return;
        }
        for col in x..x + w {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..y + h {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        for dy in -r..=r {
            let half = ((r * r - dy * dy) as f32).sqrt() as i32;
            self.fill_rect(cx - half, cy + dy, 2 * half + 1, 1, color);
        }
    }

    fn draw_ring(&mut self, cx: i32, cy: i32, r: i32, thickness: i32, color: u32) {
        let outer = r * r;
        let inner = (r - thickness).max(0).pow(2);
        for dy in -r..=r {
            for dx in -r..=r {
                let d = dx * dx + dy * dy;
                if d <= outer && d >= inner {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_diamond(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        for dy in 0..=r {
            let dx = r - dy;
            for (sx, sy) in [(cx + dx, cy + dy), (cx - dx, cy + dy), (cx + dx, cy - dy), (cx - dx, cy - dy)] {
                self.set_pixel(sx, sy, color);
            }
        }
    }

    /// Right-pointing triangle inscribed in a `size` box centred on `(cx, cy)`.
    fn fill_play_icon(&mut self, cx: i32, cy: i32, size: i32, color: u32) {
        let half = size / 2;
        for dy in -half..=half {
            let len = (half - dy.abs()) * 2;
            self.fill_rect(cx - half / 2, cy + dy, len, 1, color);
        }
    }

    /// Minimal bitmap font, 3×5 glyphs scaled up by `scale`.
    fn draw_label(&mut self, text: &str, x: i32, y: i32, scale: i32, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3i32 {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row as i32 * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale;
            if cx >= self.w as i32 {
                break;
            }
        }
    }
}

fn label_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 4 * scale
}

// ════════════════════════════════════════════════════════════════════════════
// Scene painting
// ════════════════════════════════════════════════════════════════════════════

/// Paint one full frame of `scene` into `c`.
pub fn paint(c: &mut Canvas, scene: &Scene<'_>) {
    c.clear(BG_COLOR);

    if let Some(split) = scene.split {
        paint_preview(c, scene, split);
    }
    paint_sidebar(c, scene);
    paint_playlist(c, scene);
    paint_top_bar(c, scene);
    paint_status(c, scene);

    if let Some(p) = scene.frame.cursor {
        let color = if scene.frame.is_clicking {
            ACCENT
        } else if scene.frame.scroll_active {
            SCROLL_COLOR
        } else {
            TEXT
        };
        let (x, y) = p.to_pixel();
        c.fill_circle(x, y, CURSOR_R, color);
        c.draw_ring(x, y, CURSOR_R, 2, SIDEBAR_BG);
    }
}

fn paint_preview(c: &mut Canvas, scene: &Scene<'_>, split: &SplitView) {
    let w = split.ui_origin_x;
    let h = scene.layout.height();
    c.fill_rect(0, 0, w as i32, h as i32, PREVIEW_BG);
    c.draw_label("CAMERA", 20, 20, SMALL_SCALE, TEXT_DIM);

    let Some(hand) = scene.hand else {
        c.draw_label("NO HAND", 20, 44, SMALL_SCALE, TEXT_DIM);
        return;
    };
    let px = |j: Joint| Point::new(hand[j].x * w, hand[j].y * h).to_pixel();

    for (a, b) in Joint::BONES {
        let (x0, y0) = px(a);
        let (x1, y1) = px(b);
        c.draw_line(x0, y0, x1, y1, BONE_COLOR);
    }
    for lm in hand.points() {
        let (x, y) = Point::new(lm.x * w, lm.y * h).to_pixel();
        c.draw_diamond(x, y, 3, TEXT);
    }
    if let Some(g) = scene.frame.gesture {
        c.draw_label(&g.as_str().to_uppercase(), 20, 44, SMALL_SCALE, ACCENT);
    }
}

fn paint_sidebar(c: &mut Canvas, scene: &Scene<'_>) {
    let l = scene.layout;
    let cfg = l.config();
    let x0 = l.origin_x() as i32;
    let h = l.height() as i32;
    c.fill_rect(x0, 0, cfg.sidebar_width as i32, h, SIDEBAR_BG);

    for (i, label) in cfg.menu_items.iter().enumerate() {
        let y = l.menu_slot_y(i) as i32;
        let half = cfg.menu_hit_half_height as i32;
        if scene.frame.hover == Some(RegionKind::MenuItem(i)) {
            c.fill_rect(x0, y - half, cfg.sidebar_width as i32, 2 * half, ROW_HOVER);
        }
        let color = if scene.menu_selected == Some(i) { ACCENT } else { TEXT_DIM };
        c.draw_label(label, x0 + 30, y - 7, TEXT_SCALE, color);
    }

    // now playing
    let active = scene.active.and_then(|id| scene.songs.iter().find(|s| &s.id == id));
    let Some(song) = active.or(scene.now_playing) else {
        return;
    };
    let top = h - STATUS_H - 140;
    c.draw_label("NOW PLAYING", x0 + 20, top, SMALL_SCALE, TEXT_DIM);
    c.draw_label(&song.title, x0 + 20, top + 30, SMALL_SCALE, TEXT);
    c.draw_label(&song.artist, x0 + 20, top + 52, SMALL_SCALE, TEXT_DIM);
    let bar_w = cfg.sidebar_width as i32 - 40;
    c.fill_rect(x0 + 20, top + 84, bar_w, 4, PAUSE_COLOR);
    c.fill_rect(x0 + 20, top + 84, (bar_w as f32 * song.progress) as i32, 4, ACCENT);
    let state = if song.is_playing { "PLAYING" } else { "PAUSED" };
    c.draw_label(state, x0 + 20, top + 100, SMALL_SCALE, if song.is_playing { ACCENT } else { TEXT_DIM });
}

fn paint_top_bar(c: &mut Canvas, scene: &Scene<'_>) {
    let l = scene.layout;
    let x0 = l.sidebar_right() as i32;
    let w = (l.right() - l.sidebar_right()) as i32;
    let h = l.config().top_bar_height as i32;
    c.fill_rect(x0, 0, w, h, TOPBAR_BG);
    c.draw_label("GESTURE PLAYER", l.content_x() as i32, h / 2 - 7, TEXT_SCALE, TEXT);
    let clock_x = l.right() as i32 - l.config().content_padding as i32 - label_width(scene.clock, TEXT_SCALE);
    c.draw_label(scene.clock, clock_x, h / 2 - 7, TEXT_SCALE, TEXT_DIM);
}

fn paint_playlist(c: &mut Canvas, scene: &Scene<'_>) {
    let l = scene.layout;
    let cfg = l.config();
    let scroll = scene.frame.scroll_offset;
    let cx = l.content_x() as i32;

    let header_y = l.content_y() - scroll as f32;
    if l.row_visible(header_y) {
        c.draw_label("YOUR PLAYLIST", cx, header_y as i32, TEXT_SCALE, TEXT);
    }

    for (i, y) in l.visible_rows(scene.songs.len(), scroll) {
        let song = &scene.songs[i];
        let yi = y as i32;
        let half = cfg.row_hit_half_height as i32;
        let left = cx - cfg.row_hit_left_pad as i32;
        let right = (l.right() - cfg.content_padding) as i32;

        if scene.frame.hover == Some(RegionKind::PlaylistRow(i)) {
            c.fill_rect(left, yi - half, right - left, 2 * half, ROW_HOVER);
        }
        let active = scene.active == Some(&song.id);
        c.draw_label(&song.title, cx, yi - 18, TEXT_SCALE, if song.is_playing { ACCENT } else { TEXT });
        c.draw_label(&song.artist, cx + 480, yi - 18, TEXT_SCALE, TEXT_DIM);
        let dur = song.duration_label();
        c.draw_label(&dur, right - label_width(&dur, TEXT_SCALE) - 10, yi - 18, TEXT_SCALE, TEXT_DIM);
        if active {
            c.draw_border(left, yi - half, right - left, 2 * half, ACCENT);
            c.fill_rect(cx, yi + 10, 900, 4, PAUSE_COLOR);
            c.fill_rect(cx, yi + 10, (900.0 * song.progress) as i32, 4, ACCENT);
        }

        let r = cfg.button_radius as i32;
        let (px, py) = l.play_center(y).to_pixel();
        let hot = scene.frame.hover == Some(RegionKind::PlayButton(i));
        c.fill_circle(px, py, r, if hot { blend(ACCENT, TEXT, 0.3) } else { ACCENT });
        c.fill_play_icon(px + 4, py, r, SIDEBAR_BG);

        let (qx, qy) = l.pause_center(y).to_pixel();
        let hot = scene.frame.hover == Some(RegionKind::PauseButton(i));
        c.fill_circle(qx, qy, r, if hot { blend(PAUSE_COLOR, TEXT, 0.3) } else { PAUSE_COLOR });
        c.fill_rect(qx - r / 3, qy - r / 2, r / 4, r, TEXT);
        c.fill_rect(qx + r / 3 - r / 4, qy - r / 2, r / 4, r, TEXT);
    }
}

fn paint_status(c: &mut Canvas, scene: &Scene<'_>) {
    let l = scene.layout;
    let x0 = l.sidebar_right() as i32;
    let w = (l.right() - l.sidebar_right()) as i32;
    let y = l.height() as i32 - STATUS_H;
    c.fill_rect(x0, y, w, STATUS_H, STATUS_BG);
    c.draw_label(scene.status, x0 + 10, y + 10, SMALL_SCALE, TEXT);

    let gesture = scene.frame.gesture.map_or("-", |g| g.as_str());
    let right = format!("{}  SCROLL {}", gesture, scene.frame.scroll_offset);
    let rx = l.right() as i32 - 10 - label_width(&right, SMALL_SCALE);
    c.draw_label(&right, rx, y + 10, SMALL_SCALE, TEXT_DIM);
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer — the window
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    canvas: Canvas,
    sim_tx: Option<Sender<SimInput>>,
}

impl Visualizer {
    /// Open a `w × h` canvas window.  `sim_tx` receives pointer/pose input
    /// when the simulation source is in use.
    pub fn new(w: usize, h: usize, fps: u32, sim_tx: Option<Sender<SimInput>>) -> Result<Self, String> {
        let mut window = Window::new(
            "Gesture Player  (Q quit)",
            w, h,
            WindowOptions {
                resize:     true,
                scale_mode: ScaleMode::Stretch,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.set_target_fps(fps.max(1) as usize);

        Ok(Visualizer { window, canvas: Canvas::new(w, h), sim_tx })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Read keyboard and mouse.  Returns false when the user asked to quit.
    ///
    /// Sim controls: the mouse is the index fingertip; hold Space or the left
    /// button to pinch, Shift or S to scroll, O to open the hand.
    pub fn poll_input(&mut self, layout: &Layout, split: Option<&SplitView>) -> bool {
        if !self.window.is_open() {
            return false;
        }
        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            if let Some(tx) = &self.sim_tx {
                let _ = tx.send(SimInput::Quit);
            }
            return false;
        }

        let Some(tx) = &self.sim_tx else { return true };

        let down = |k: Key| self.window.is_key_down(k);
        let pose = if down(Key::Space) || self.window.get_mouse_down(MouseButton::Left) {
            Pose::Pinch
        } else if down(Key::LeftShift) || down(Key::RightShift) || down(Key::S) {
            Pose::Scroll
        } else if down(Key::O) {
            Pose::Open
        } else {
            Pose::Point
        };

        let input = match self.window.get_unscaled_mouse_pos(MouseMode::Discard) {
            Some((mx, my)) => {
                let (ww, wh) = self.window.get_size();
                let sx = self.canvas.w as f32 / ww.max(1) as f32;
                let sy = self.canvas.h as f32 / wh.max(1) as f32;
                let (x, y) = canvas_to_camera(mx * sx, my * sy, layout, split);
                SimInput::Hand { x, y, pose }
            }
            None => SimInput::NoHand,
        };
        let _ = tx.send(input);
        true
    }

    pub fn render(&mut self, scene: &Scene<'_>) {
        paint(&mut self.canvas, scene);
        if let Err(e) = self.window.update_with_buffer(self.canvas.pixels(), self.canvas.w, self.canvas.h) {
            log::warn!("window update failed: {}", e);
        }
    }
}

/// Invert the camera → canvas mapping for a pointer at canvas `(x, y)`:
/// normalised camera coordinates.  In split view the preview half maps
/// straight through and the UI half is un-shifted first.
pub fn canvas_to_camera(x: f32, y: f32, layout: &Layout, split: Option<&SplitView>) -> (f32, f32) {
    let ny = y / layout.height();
    match split {
        Some(s) if x >= s.ui_origin_x => ((x - s.ui_origin_x) / s.ui_width, ny),
        Some(s) => (x / s.ui_origin_x, ny),
        None => ((x - layout.origin_x()) / layout.width(), ny),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '&' => [0b010, 0b101, 0b010, 0b101, 0b011],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

/// Blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
