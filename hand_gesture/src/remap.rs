//! Camera-space → UI-space mapping for the split layout, where the camera
//! preview fills one half of the canvas and the controls the other.

use crate::landmark::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitView {
    pub camera_width: f32,
    pub ui_width:     f32,
    /// Left edge of the UI half on the canvas.
    pub ui_origin_x:  f32,
}

impl SplitView {
    /// Preview on the left half of a `canvas_width` canvas, UI on the right.
    pub fn halves(camera_width: f32, canvas_width: f32) -> Self {
        let half = canvas_width / 2.0;
        SplitView { camera_width, ui_width: half, ui_origin_x: half }
    }

    /// Stretch `x` from camera width to UI width and shift it onto the UI
    /// half.  `y` passes through.
    pub fn to_ui(&self, p: Point) -> Point {
        let scale = if self.camera_width > 0.0 { self.ui_width / self.camera_width } else { 1.0 };
        Point::new(p.x * scale + self.ui_origin_x, p.y)
    }
}

/// Stretch `p` from a `from` frame onto a `to` frame on both axes.  Used
/// when the detector reports a different resolution from the one the UI
/// was laid out for.  A degenerate `from` leaves that axis alone.
pub fn rescale(p: Point, from: (f32, f32), to: (f32, f32)) -> Point {
    let axis = |v: f32, src: f32, dst: f32| if src > 0.0 { v * dst / src } else { v };
    Point::new(axis(p.x, from.0, to.0), axis(p.y, from.1, to.1))
}

/// Identity when split view is off.
pub fn remap(p: Point, split: Option<&SplitView>) -> Point {
    match split {
        Some(s) => s.to_ui(p),
        None    => p,
    }
}
