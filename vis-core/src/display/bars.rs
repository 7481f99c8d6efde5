//! Spectrum bars
use super::{Canvas, Color, Rect};
use crate::analyzer::SignalStrength;

/// One bar per bucket, standing on the bottom edge of the viewport
#[derive(Debug, Clone)]
pub struct BarDisplay {
    heights: Vec<f32>,
    width: f32,
    viewport_height: f32,
    scale: f32,
    color: Color,
}

impl BarDisplay {
    /// Create `num` bars of `width` pixels each
    ///
    /// `num` must be the length of the bucket map returned by
    /// [`log_buckets`](../../analyzer/buckets/fn.log_buckets.html), not the requested count.
    pub fn new(num: usize, width: f32, viewport_height: f32, scale: f32) -> BarDisplay {
        BarDisplay {
            heights: vec![0.0; num],
            width,
            viewport_height,
            scale,
            color: Color::CYAN,
        }
    }

    pub fn with_color(mut self, color: Color) -> BarDisplay {
        self.color = color;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Set bar `i` to `levels[buckets[i]] * scale`
    ///
    /// Negative, non-finite and missing levels give an empty bar.
    pub fn set_heights(&mut self, buckets: &[usize], levels: &[SignalStrength]) {
        debug_assert_eq!(buckets.len(), self.heights.len(), "Bucket map does not fit!");

        for (h, b) in self.heights.iter_mut().zip(buckets.iter()) {
            let height = levels.get(*b).map_or(0.0, |l| l * self.scale);
            *h = if height.is_finite() { height.max(0.0) } else { 0.0 };
        }
    }

    /// Current height of every bar
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Geometry of bar `i`
    pub fn rect(&self, i: usize) -> Rect {
        let height = self.heights[i];

        Rect {
            x: i as f32 * self.width,
            y: self.viewport_height - height,
            width: self.width,
            height,
        }
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for i in 0..self.heights.len() {
            canvas.fill_rect(self.rect(i), self.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingCanvas;

    #[test]
    fn test_heights() {
        let mut bars = BarDisplay::new(4, 10.0, 100.0, 5.0);
        let levels = [1.0, 2.0, 3.0, -4.0, 5.0, std::f32::NEG_INFINITY];

        bars.set_heights(&[0, 2, 3, 5], &levels);
        assert_eq!(bars.heights(), &[5.0, 15.0, 0.0, 0.0]);

        bars.set_heights(&[4, 1, 0, 99], &levels);
        assert_eq!(bars.heights(), &[25.0, 10.0, 5.0, 0.0]);
    }

    #[test]
    fn test_geometry() {
        let mut bars = BarDisplay::new(3, 20.0, 1080.0, 1.0);
        bars.set_heights(&[0, 1, 2], &[100.0, 0.0, 50.0]);

        assert_eq!(
            bars.rect(0),
            Rect {
                x: 0.0,
                y: 980.0,
                width: 20.0,
                height: 100.0
            }
        );
        assert_eq!(bars.rect(2).x, 40.0);
        assert_eq!(bars.rect(2).y + bars.rect(2).height, 1080.0);
        assert_eq!(bars.rect(1).height, 0.0);
    }

    #[test]
    fn test_draw() {
        let mut bars = BarDisplay::new(5, 4.0, 10.0, 1.0).with_color(Color::GREEN);
        bars.set_heights(&[0, 1, 2, 3, 4], &[1.0; 5]);

        let mut canvas = RecordingCanvas::new();
        bars.draw(&mut canvas);

        assert_eq!(canvas.rects.len(), 5);
        assert!(canvas.rects.iter().all(|(_, c)| *c == Color::GREEN));
        assert_eq!(bars.heights(), &[1.0; 5]);
    }
}
