use crate::analyzer;
use crate::playback::{self, Analysis, Device, Playback, StreamFormat};
use crate::{Error, Settings, Track};
use std::sync::Arc;

/// Builder connecting a track, the analysis and a playback device
#[derive(Debug)]
pub struct Visualizer {
    pub track: Arc<Track>,
    pub settings: Option<Settings>,
    pub device: Option<Box<dyn Device>>,
}

impl Visualizer {
    pub fn new(track: Track) -> Visualizer {
        Visualizer {
            track: Arc::new(track),
            settings: None,
            device: None,
        }
    }

    /// Use these settings instead of the ones from config
    pub fn settings(mut self, settings: Settings) -> Visualizer {
        self.settings = Some(settings);
        self
    }

    /// Use this device instead of the `"audio.backend"` one
    pub fn device(mut self, device: Box<dyn Device>) -> Visualizer {
        self.device = Some(device);
        self
    }

    /// Plan the analysis, open the stream and start playing
    pub fn play(self) -> crate::Result<crate::Frames> {
        let settings = match self.settings {
            Some(s) => s,
            None => Settings::from_config()?,
        };
        settings.validate()?;

        let window = analyzer::window::from_str(&settings.window).ok_or_else(|| {
            Error::config("audio.window", format!("unknown window function {:?}", settings.window))
        })?;
        let analyzer = analyzer::FourierBuilder::new().window(window).plan();

        let (input, output) =
            triple_buffer::TripleBuffer::new(&Analysis::new(analyzer.buckets())).split();

        let mut device = match self.device {
            Some(d) => d,
            None => playback::DeviceBuilder::new()
                .backend(settings.backend.clone())
                .build()?,
        };

        let format = StreamFormat {
            rate: self.track.rate(),
            channels: 2,
            frames_per_buffer: settings.frames_per_buffer,
        };
        let end = (self.track.duration() - settings.safety_margin).max(0.0);

        log::info!(
            "Playing {:.3}s of {:.3}s on {:?}",
            end,
            self.track.duration(),
            device,
        );

        device.start(format, Playback::new(self.track, analyzer, input))?;

        Ok(crate::Frames::new(output, device, end))
    }
}
