//! A circle pulsing with the volume
use super::{Canvas, Color};
use crate::analyzer::SignalStrength;

#[derive(Debug, Clone)]
pub struct PulseDisplay {
    scale: f32,
    alpha: f32,
    radius: f32,
    center: [f32; 2],
    color: Color,
}

impl PulseDisplay {
    /// `radius` is reached at a smoothed amplitude of 1.0
    pub fn new(alpha: f32, radius: f32, center: [f32; 2]) -> PulseDisplay {
        PulseDisplay {
            scale: 0.0,
            alpha,
            radius,
            center,
            color: Color::GREEN,
        }
    }

    pub fn with_color(mut self, color: Color) -> PulseDisplay {
        self.color = color;
        self
    }

    /// Feed the latest amplitude into the exponential moving average
    pub fn update(&mut self, amplitude: SignalStrength) {
        self.scale = (1.0 - self.alpha) * self.scale + self.alpha * amplitude;
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius * self.scale
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.fill_circle(self.center, self.radius(), self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingCanvas;

    #[test]
    fn test_smoothing() {
        let mut pulse = PulseDisplay::new(0.5, 300.0, [960.0, 540.0]);
        assert_eq!(pulse.radius(), 0.0);

        pulse.update(1.0);
        assert_eq!(pulse.scale(), 0.5);
        pulse.update(1.0);
        assert_eq!(pulse.scale(), 0.75);
        pulse.update(0.0);
        assert_eq!(pulse.scale(), 0.375);
        assert_eq!(pulse.radius(), 112.5);
    }

    #[test]
    fn test_converges() {
        let mut pulse = PulseDisplay::new(0.2, 10.0, [0.0, 0.0]);

        for _ in 0..200 {
            pulse.update(0.3);
        }
        assert!((pulse.scale() - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_draw_centered() {
        let mut pulse = PulseDisplay::new(1.0, 300.0, [960.0, 540.0]);
        pulse.update(0.5);

        let mut canvas = RecordingCanvas::new();
        pulse.draw(&mut canvas);

        assert_eq!(canvas.circles, &[([960.0, 540.0], 150.0, Color::GREEN)]);
    }
}
