//! Playback of a track and the analysis running inside the audio callback
#[cfg(feature = "cpalplayback")]
pub mod cpal;
pub mod null;

use crate::analyzer::{self, Sample, SignalStrength};
use crate::track::Track;
use std::sync::Arc;

/// Names accepted for the `"audio.backend"` setting
pub const BACKENDS: &[&str] = &["cpal", "null"];

/// Everything the audio callback publishes for the render loop
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Signal strength in dB per fourier bucket, averaged over both channels
    pub levels: Vec<SignalStrength>,
    /// Mean absolute sample value of the last buffer
    pub amplitude: SignalStrength,
}

impl Analysis {
    /// Silent analysis with `buckets` fourier buckets
    pub fn new(buckets: usize) -> Analysis {
        Analysis {
            levels: vec![analyzer::FLOOR_DB; buckets],
            amplitude: 0.0,
        }
    }
}

/// Format of the output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    pub rate: usize,
    pub channels: usize,
    pub frames_per_buffer: usize,
}

/// An output device that periodically asks a [`Playback`](struct.Playback.html) for samples
pub trait Device: std::fmt::Debug {
    /// Open a stream with the given format and start calling `playback` from the audio thread
    fn start(&mut self, format: StreamFormat, playback: Playback) -> crate::Result<()>;

    /// Stop and close the stream
    ///
    /// Drops the playback and with it the last reference to the track.  Stopping a device
    /// that is not running is a no-op.
    fn stop(&mut self) -> crate::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct DeviceBuilder {
    pub backend: Option<String>,
}

impl DeviceBuilder {
    pub fn new() -> DeviceBuilder {
        Default::default()
    }

    pub fn backend<S: Into<String>>(&mut self, backend: S) -> &mut DeviceBuilder {
        self.backend = Some(backend.into());
        self
    }

    pub fn build(&mut self) -> crate::Result<Box<dyn Device>> {
        let backend = self
            .backend
            .clone()
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.backend", "cpal".to_string()));

        match &*backend {
            #[cfg(feature = "cpalplayback")]
            "cpal" => Ok(Box::new(self::cpal::CpalDevice::new())),

            "null" => Ok(Box::new(self::null::NullDevice::new())),

            _ => Err(crate::Error::config(
                "audio.backend",
                format!("backend {:?} is not available", backend),
            )),
        }
    }
}

/// State of the audio callback
///
/// Owns the playback cursor, the fourier analyzer and the writing end of the triple buffer.
/// All buffers are allocated on construction, [`fill`](#method.fill) itself never allocates,
/// locks or blocks.
pub struct Playback {
    track: Arc<Track>,
    cursor: usize,
    analyzer: analyzer::FourierAnalyzer,
    info: triple_buffer::Input<Analysis>,
}

impl std::fmt::Debug for Playback {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Playback {{ cursor: {:?}, frames: {:?}, analyzer: {:?} }}",
            self.cursor,
            self.track.frames(),
            self.analyzer,
        )
    }
}

impl Playback {
    pub fn new(
        track: Arc<Track>,
        analyzer: analyzer::FourierAnalyzer,
        info: triple_buffer::Input<Analysis>,
    ) -> Playback {
        Playback {
            track,
            cursor: 0,
            analyzer,
            info,
        }
    }

    /// Start of the window the next analysis runs on
    ///
    /// Follows the cursor while a full window is left.  Near the end the window sticks to the
    /// last `length` frames of the track.
    fn analysis_offset(&self) -> usize {
        let frames = self.track.frames();
        let length = self.analyzer.length();

        if frames - self.cursor < length {
            frames.saturating_sub(length)
        } else {
            self.cursor
        }
    }

    /// Fill an interleaved stereo buffer and publish a fresh analysis
    ///
    /// Once the whole track was played, silence is written.
    pub fn fill(&mut self, out: &mut [Sample]) {
        let offset = self.analysis_offset();
        let track = &*self.track;
        let info = self.info.input_buffer();

        self.analyzer
            .analyze_stereo(track.left(), track.right(), offset, &mut info.levels);

        let frames = out.len() / 2;
        let mut sum = 0.0;

        for frame in out.chunks_exact_mut(2) {
            let (l, r) = if self.cursor < track.frames() {
                let s = (track.left()[self.cursor], track.right()[self.cursor]);
                self.cursor += 1;
                s
            } else {
                (0.0, 0.0)
            };

            frame[0] = l;
            frame[1] = r;
            sum += (l.abs() + r.abs()) / 2.0;
        }
        for s in out.chunks_exact_mut(2).into_remainder() {
            *s = 0.0;
        }

        info.amplitude = if frames > 0 {
            sum / frames as SignalStrength
        } else {
            0.0
        };

        self.info.publish();
    }

    /// Whether the whole track has been written out
    pub fn finished(&self) -> bool {
        self.cursor >= self.track.frames()
    }
}

// Dropped together with the stream, never from inside `fill`
impl Drop for Playback {
    fn drop(&mut self) {
        if self.finished() {
            log::debug!("Playback closed after the whole track");
        } else {
            log::debug!(
                "Playback closed at frame {} of {}",
                self.cursor,
                self.track.frames()
            );
        }

        let failures = self.analyzer.failures();
        if failures > 0 {
            log::warn!("{} fourier transforms failed during playback", failures);
        }
    }
}
