//! Screen geometry shared by hit-testing and rendering.
//!
//! Regions are rebuilt every frame from the menu, the playlist length and the
//! scroll offset; nothing here is cached.
//!
//! ```text
//! ┌──────────┬──────────────────────────────────────────────────────────┐
//! │          │ top bar                                           12:34  │
//! │ Home     ├──────────────────────────────────────────────────────────┤
//! │ Search   │  Your Playlist                                           │
//! │ Library  │  Cosmic Journey   Solar Beats          (▶)  (❚❚)   4:12  │
//! │ ...      │  Ocean Breeze     Wave Riders          (▶)  (❚❚)   3:28  │
//! │          │  ...                                                     │
//! │ [now     │                                                          │
//! │  playing]│                                                          │
//! └──────────┴──────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use hand_gesture::Point;

// ════════════════════════════════════════════════════════════════════════════
// LayoutConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "LayoutConfig::default_sidebar_width")]
    pub sidebar_width:        f32,
    #[serde(default = "LayoutConfig::default_top_bar_height")]
    pub top_bar_height:       f32,
    #[serde(default = "LayoutConfig::default_content_padding")]
    pub content_padding:      f32,
    #[serde(default = "LayoutConfig::default_row_height")]
    pub row_height:           f32,
    /// First row's distance below the content origin.
    #[serde(default = "LayoutConfig::default_row_base_offset")]
    pub row_base_offset:      f32,
    #[serde(default = "LayoutConfig::default_menu_start_y")]
    pub menu_start_y:         f32,
    #[serde(default = "LayoutConfig::default_menu_item_spacing")]
    pub menu_item_spacing:    f32,
    #[serde(default = "LayoutConfig::default_menu_hit_half_height")]
    pub menu_hit_half_height: f32,
    #[serde(default = "LayoutConfig::default_row_hit_half_height")]
    pub row_hit_half_height:  f32,
    /// Rows reach this far left of the content edge.
    #[serde(default = "LayoutConfig::default_row_hit_left_pad")]
    pub row_hit_left_pad:     f32,
    #[serde(default = "LayoutConfig::default_button_radius")]
    pub button_radius:        f32,
    /// Button centres, measured from the content edge.
    #[serde(default = "LayoutConfig::default_play_offset_x")]
    pub play_offset_x:        f32,
    #[serde(default = "LayoutConfig::default_pause_offset_x")]
    pub pause_offset_x:       f32,
    #[serde(default = "LayoutConfig::default_menu_items")]
    pub menu_items:           Vec<String>,
}

impl LayoutConfig {
    fn default_sidebar_width() -> f32        { 220.0 }
    fn default_top_bar_height() -> f32       { 60.0 }
    fn default_content_padding() -> f32      { 50.0 }
    fn default_row_height() -> f32           { 100.0 }
    fn default_row_base_offset() -> f32      { 100.0 }
    fn default_menu_start_y() -> f32         { 120.0 }
    fn default_menu_item_spacing() -> f32    { 50.0 }
    fn default_menu_hit_half_height() -> f32 { 20.0 }
    fn default_row_hit_half_height() -> f32  { 25.0 }
    fn default_row_hit_left_pad() -> f32     { 20.0 }
    fn default_button_radius() -> f32        { 42.0 }
    fn default_play_offset_x() -> f32        { 1200.0 }
    fn default_pause_offset_x() -> f32       { 1300.0 }

    fn default_menu_items() -> Vec<String> {
        ["Home", "Search", "Library", "Playlists", "Settings"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            sidebar_width:        Self::default_sidebar_width(),
            top_bar_height:       Self::default_top_bar_height(),
            content_padding:      Self::default_content_padding(),
            row_height:           Self::default_row_height(),
            row_base_offset:      Self::default_row_base_offset(),
            menu_start_y:         Self::default_menu_start_y(),
            menu_item_spacing:    Self::default_menu_item_spacing(),
            menu_hit_half_height: Self::default_menu_hit_half_height(),
            row_hit_half_height:  Self::default_row_hit_half_height(),
            row_hit_left_pad:     Self::default_row_hit_left_pad(),
            button_radius:        Self::default_button_radius(),
            play_offset_x:        Self::default_play_offset_x(),
            pause_offset_x:       Self::default_pause_offset_x(),
            menu_items:           Self::default_menu_items(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Regions
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    MenuItem(usize),
    /// Hover only.
    PlaylistRow(usize),
    PlayButton(usize),
    PauseButton(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// `left <= x < right`, `top < y < bottom`.
    Rect { left: f32, right: f32, top: f32, bottom: f32 },
    Circle { cx: f32, cy: f32, r: f32 },
}

impl Shape {
    pub fn contains(&self, p: Point) -> bool {
        match *self {
            Shape::Rect { left, right, top, bottom } => {
                left <= p.x && p.x < right && top < p.y && p.y < bottom
            }
            Shape::Circle { cx, cy, r } => {
                let (dx, dy) = (p.x - cx, p.y - cy);
                dx * dx + dy * dy < r * r
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub kind:  RegionKind,
    pub shape: Shape,
}

// ════════════════════════════════════════════════════════════════════════════
// Layout — config placed on a pane
// ════════════════════════════════════════════════════════════════════════════

/// The UI pane: the whole canvas, or its right half in split view.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    cfg:      LayoutConfig,
    origin_x: f32,
    width:    f32,
    height:   f32,
}

impl Layout {
    pub fn new(cfg: LayoutConfig, origin_x: f32, width: f32, height: f32) -> Self {
        Layout { cfg, origin_x, width, height }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.cfg
    }

    pub fn origin_x(&self) -> f32 {
        self.origin_x
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn right(&self) -> f32 {
        self.origin_x + self.width
    }

    pub fn sidebar_right(&self) -> f32 {
        self.origin_x + self.cfg.sidebar_width
    }

    pub fn content_x(&self) -> f32 {
        self.sidebar_right() + self.cfg.content_padding
    }

    /// Header baseline before scrolling.
    pub fn content_y(&self) -> f32 {
        self.cfg.top_bar_height + self.cfg.content_padding
    }

    pub fn menu_slot_y(&self, i: usize) -> f32 {
        self.cfg.menu_start_y + i as f32 * self.cfg.menu_item_spacing
    }

    pub fn row_y(&self, i: usize, scroll: i32) -> f32 {
        self.content_y() - scroll as f32 + self.cfg.row_base_offset + i as f32 * self.cfg.row_height
    }

    /// Rows above the top bar or below the pane are skipped entirely.
    pub fn row_visible(&self, y: f32) -> bool {
        !(y < self.cfg.top_bar_height || y > self.height)
    }

    pub fn visible_rows(&self, n_rows: usize, scroll: i32) -> impl Iterator<Item = (usize, f32)> + '_ {
        (0..n_rows)
            .map(move |i| (i, self.row_y(i, scroll)))
            .filter(move |&(_, y)| self.row_visible(y))
    }

    pub fn play_center(&self, row_y: f32) -> Point {
        Point::new(self.content_x() + self.cfg.play_offset_x, row_y)
    }

    pub fn pause_center(&self, row_y: f32) -> Point {
        Point::new(self.content_x() + self.cfg.pause_offset_x, row_y)
    }

    /// All regions in hit priority order: menu first, then per visible row
    /// play, pause and the row itself.
    pub fn regions(&self, n_rows: usize, scroll: i32) -> Vec<Region> {
        let c = &self.cfg;
        let mut out = Vec::with_capacity(c.menu_items.len() + 3 * n_rows);

        for i in 0..c.menu_items.len() {
            let y = self.menu_slot_y(i);
            out.push(Region {
                kind:  RegionKind::MenuItem(i),
                // open to the left: anything short of the sidebar edge
                shape: Shape::Rect {
                    left:   f32::NEG_INFINITY,
                    right:  self.sidebar_right(),
                    top:    y - c.menu_hit_half_height,
                    bottom: y + c.menu_hit_half_height,
                },
            });
        }

        for (i, y) in self.visible_rows(n_rows, scroll) {
            let play = self.play_center(y);
            let pause = self.pause_center(y);
            out.push(Region {
                kind:  RegionKind::PlayButton(i),
                shape: Shape::Circle { cx: play.x, cy: play.y, r: c.button_radius },
            });
            out.push(Region {
                kind:  RegionKind::PauseButton(i),
                shape: Shape::Circle { cx: pause.x, cy: pause.y, r: c.button_radius },
            });
            out.push(Region {
                kind:  RegionKind::PlaylistRow(i),
                shape: Shape::Rect {
                    left:   self.content_x() - c.row_hit_left_pad,
                    right:  self.right() - c.content_padding,
                    top:    y - c.row_hit_half_height,
                    bottom: y + c.row_hit_half_height,
                },
            });
        }
        out
    }

    /// First region containing `p`.
    pub fn hit_test(&self, p: Point, n_rows: usize, scroll: i32) -> Option<RegionKind> {
        self.regions(n_rows, scroll)
            .into_iter()
            .find(|r| r.shape.contains(p))
            .map(|r| r.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Layout {
        Layout::new(LayoutConfig::default(), 0.0, 1920.0, 1080.0)
    }

    #[test]
    fn reference_positions() {
        let l = layout();
        assert_eq!(l.content_x(), 270.0);
        assert_eq!(l.content_y(), 110.0);
        assert_eq!(l.menu_slot_y(2), 220.0);
        assert_eq!(l.row_y(0, 0), 210.0);
        assert_eq!(l.row_y(3, 150), 360.0);
        assert_eq!(l.play_center(210.0), Point::new(1470.0, 210.0));
    }

    #[test]
    fn rows_outside_band_are_skipped() {
        let l = layout();
        // rows at 210 + 100i; 9 → 1110 is below the frame
        let rows: Vec<usize> = l.visible_rows(10, 0).map(|(i, _)| i).collect();
        assert_eq!(rows, (0..9).collect::<Vec<_>>());
        // scrolled by 200: row 0 at 10 is under the top bar
        let first = l.visible_rows(10, 200).next().map(|(i, _)| i);
        assert_eq!(first, Some(1));
    }

    #[test]
    fn menu_hit_is_strict_and_left_of_sidebar() {
        let l = layout();
        assert_eq!(l.hit_test(Point::new(100.0, 120.0), 0, 0), Some(RegionKind::MenuItem(0)));
        assert_eq!(l.hit_test(Point::new(100.0, 139.0), 0, 0), Some(RegionKind::MenuItem(0)));
        // |140 - 120| = 20 is not < 20; nor is |140 - 170| = 30
        assert_eq!(l.hit_test(Point::new(100.0, 140.0), 0, 0), None);
        assert_eq!(l.hit_test(Point::new(220.0, 120.0), 0, 0), None);
    }

    #[test]
    fn buttons_before_row() {
        let l = layout();
        let y = l.row_y(1, 0);
        assert_eq!(l.hit_test(Point::new(1470.0, y + 30.0), 10, 0), Some(RegionKind::PlayButton(1)));
        assert_eq!(l.hit_test(Point::new(1570.0, y), 10, 0), Some(RegionKind::PauseButton(1)));
        assert_eq!(l.hit_test(Point::new(600.0, y), 10, 0), Some(RegionKind::PlaylistRow(1)));
        // between rows, outside both buttons
        assert_eq!(l.hit_test(Point::new(600.0, y + 50.0), 10, 0), None);
    }

    #[test]
    fn scroll_moves_rows() {
        let l = layout();
        assert_eq!(l.hit_test(Point::new(600.0, 210.0), 10, 100), Some(RegionKind::PlaylistRow(1)));
    }

    #[test]
    fn pane_origin_shifts_x() {
        let l = Layout::new(LayoutConfig::default(), 1920.0, 1920.0, 1080.0);
        assert_eq!(l.content_x(), 2190.0);
        assert_eq!(l.hit_test(Point::new(2000.0, 170.0), 0, 0), Some(RegionKind::MenuItem(1)));
        assert_eq!(l.hit_test(Point::new(100.0, 170.0), 0, 0), Some(RegionKind::MenuItem(1)));
    }
}
