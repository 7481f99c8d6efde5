use std::time;

/// Seconds passed since `start`
pub fn time(start: time::Instant) -> f32 {
    start.elapsed().as_secs_f32()
}
