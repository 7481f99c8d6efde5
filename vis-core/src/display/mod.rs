//! Render side of the visualizer
//!
//! Displays only ever read the published [`Analysis`](../playback/struct.Analysis.html) and
//! draw onto a [`Canvas`](trait.Canvas.html), which is implemented by the frontend.
pub mod bars;
pub mod pulse;

pub use self::bars::BarDisplay;
pub use self::pulse::PulseDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }
}

/// Axis aligned rectangle in window coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A window to draw into
pub trait Canvas {
    /// Handle pending window events
    ///
    /// Returns true if the user asked to close the window.
    fn poll_close(&mut self) -> bool;

    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color);

    /// Show everything drawn since the last `clear`
    fn present(&mut self);
}

/// Canvas that remembers the draw calls of the last frame
///
/// Used for headless runs and in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub rects: Vec<(Rect, Color)>,
    pub circles: Vec<([f32; 2], f32, Color)>,
    pub frames: usize,
    /// Report a close request once this many frames were presented
    pub close_after: Option<usize>,
    /// Block in `present` for this long, like a vsynced window would
    pub frame_time: Option<std::time::Duration>,
}

impl RecordingCanvas {
    pub fn new() -> RecordingCanvas {
        Default::default()
    }
}

impl Canvas for RecordingCanvas {
    fn poll_close(&mut self) -> bool {
        self.close_after.map_or(false, |n| self.frames >= n)
    }

    fn clear(&mut self, _color: Color) {
        self.rects.clear();
        self.circles.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.rects.push((rect, color));
    }

    fn fill_circle(&mut self, center: [f32; 2], radius: f32, color: Color) {
        self.circles.push((center, radius, color));
    }

    fn present(&mut self) {
        self.frames += 1;
        if let Some(t) = self.frame_time {
            std::thread::sleep(t);
        }
    }
}
