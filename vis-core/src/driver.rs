//! The render loop
//!
//! Maps the published analysis onto the bar and pulse displays once per frame until the
//! track is over or the window gets closed.
use crate::analyzer;
use crate::display::{BarDisplay, Canvas, Color, PulseDisplay};
use crate::{Error, Settings, Visualizer};

/// What happened during a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Number of rendered frames
    pub frames: usize,
    /// Seconds from playback start to the end of the loop
    pub elapsed: f32,
    /// Whether the run ended because the window was closed
    pub closed: bool,
}

/// Play the visualizer's track and draw it onto `canvas`
///
/// The playback stream is stopped before returning, also when the user closed the window.
pub fn run<C: Canvas + ?Sized>(
    visualizer: Visualizer,
    settings: &Settings,
    canvas: &mut C,
) -> crate::Result<Summary> {
    settings.validate()?;

    let buckets = analyzer::log_buckets(settings.min_freq, settings.max_freq, settings.bar_count);

    let (width, height) = (settings.screen_width as f32, settings.screen_height as f32);
    let mut bars = BarDisplay::new(
        buckets.len(),
        width / buckets.len().max(1) as f32,
        height,
        settings.visual_scale,
    )
    .with_color(Color::CYAN);
    if bars.is_empty() {
        return Err(Error::config(
            "bars.count",
            format!(
                "no frequency buckets between {}Hz and {}Hz",
                settings.min_freq, settings.max_freq
            ),
        ));
    }
    log::debug!(
        "Using {} bars ({} requested) from {}Hz to {}Hz",
        bars.len(),
        settings.bar_count,
        buckets[0],
        buckets[buckets.len() - 1],
    );

    let mut pulse = PulseDisplay::new(
        settings.smoothing_alpha,
        settings.pulse_radius,
        [width / 2.0, height / 2.0],
    )
    .with_color(Color::GREEN);

    let mut frames = visualizer.settings(settings.clone()).play()?;
    log::debug!("Rendering until {:.3}s", frames.end());

    let mut rendered = 0;
    let mut closed = false;
    for frame in frames.iter() {
        if canvas.poll_close() {
            log::info!("Window closed at {:.3}s", frame.time);
            closed = true;
            break;
        }

        frame.lock_info(|info| {
            bars.set_heights(&buckets, &info.levels);
            pulse.update(info.amplitude);
        });

        canvas.clear(Color::BLACK);
        bars.draw(canvas);
        pulse.draw(canvas);
        canvas.present();

        rendered += 1;
    }

    let summary = Summary {
        frames: rendered,
        elapsed: frames.elapsed(),
        closed,
    };
    frames.stop()?;

    log::info!(
        "Rendered {} frames in {:.3}s ({:.1} fps)",
        summary.frames,
        summary.elapsed,
        summary.frames as f32 / summary.elapsed.max(std::f32::EPSILON),
    );

    Ok(summary)
}
