use crate::error::DeviceStage;
use crate::{playback, Error};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Playback on the default output device of the default host
pub struct CpalDevice {
    stream: Option<cpal::Stream>,
}

impl std::fmt::Debug for CpalDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "CpalDevice {{ running: {:?} }}", self.stream.is_some())
    }
}

impl CpalDevice {
    pub fn new() -> CpalDevice {
        CpalDevice { stream: None }
    }
}

/// Fixed buffer size closest to `frames` the device supports
///
/// Falls back to the host's default if the supported range is unknown.
fn buffer_size(frames: usize, supported: &cpal::SupportedBufferSize) -> cpal::BufferSize {
    match supported {
        cpal::SupportedBufferSize::Range { min, max } => {
            let frames = cpal::FrameCount::try_from(frames).unwrap_or(cpal::FrameCount::MAX);
            cpal::BufferSize::Fixed(frames.max(*min).min(*max))
        }
        cpal::SupportedBufferSize::Unknown => cpal::BufferSize::Default,
    }
}

impl playback::Device for CpalDevice {
    fn start(
        &mut self,
        format: playback::StreamFormat,
        mut playback: playback::Playback,
    ) -> crate::Result<()> {
        if self.stream.is_some() {
            return Err(Error::device(DeviceStage::Start, "stream is already running"));
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::device(DeviceStage::Open, "no output device available"))?;

        let supported = match device.default_output_config() {
            Ok(c) => c.buffer_size().clone(),
            Err(e) => {
                log::warn!("Can't query output config: {}", e);
                cpal::SupportedBufferSize::Unknown
            }
        };
        let buffer_size = buffer_size(format.frames_per_buffer, &supported);
        if buffer_size != cpal::BufferSize::Fixed(format.frames_per_buffer as cpal::FrameCount) {
            log::warn!(
                "Buffer size of {} frames is not supported ({:?}), using {:?}",
                format.frames_per_buffer,
                supported,
                buffer_size,
            );
        }

        let config = cpal::StreamConfig {
            channels: format.channels as cpal::ChannelCount,
            sample_rate: cpal::SampleRate(format.rate as u32),
            buffer_size,
        };

        log::debug!("CPal Playback:");
        log::debug!("    Host        = {:?}", host.id());
        log::debug!(
            "    Device      = {}",
            device.name().unwrap_or_else(|_| "<unknown>".to_string())
        );
        log::debug!("    Sample Rate = {:6}", format.rate);
        log::debug!("    Channels    = {:6}", format.channels);
        log::debug!("    Buffer Size = {:?}", config.buffer_size);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| playback.fill(data),
                |err| log::error!("Playback stream error: {}", err),
                None,
            )
            .map_err(|e| Error::device(DeviceStage::Open, e))?;

        stream
            .play()
            .map_err(|e| Error::device(DeviceStage::Start, e))?;

        self.stream = Some(stream);
        Ok(())
    }

    fn stop(&mut self) -> crate::Result<()> {
        if let Some(stream) = self.stream.take() {
            let res = stream
                .pause()
                .map_err(|e| Error::device(DeviceStage::Stop, e));

            // Dropping the stream closes it, together with the playback callback
            drop(stream);
            res?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size() {
        let range = cpal::SupportedBufferSize::Range { min: 64, max: 1024 };

        assert_eq!(buffer_size(512, &range), cpal::BufferSize::Fixed(512));
        assert_eq!(buffer_size(2048, &range), cpal::BufferSize::Fixed(1024));
        assert_eq!(buffer_size(16, &range), cpal::BufferSize::Fixed(64));
        assert_eq!(
            buffer_size(2048, &cpal::SupportedBufferSize::Unknown),
            cpal::BufferSize::Default
        );
    }
}
