//! Decoded audio tracks
use crate::analyzer::Sample;
use crate::{Error, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// A fully decoded stereo track
///
/// Both channels always have the same length.  Nothing in here changes after loading.
#[derive(Debug, Clone)]
pub struct Track {
    left: Vec<Sample>,
    right: Vec<Sample>,
    rate: usize,
}

impl Track {
    /// Build a track from two channels
    ///
    /// The longer channel is cut to the length of the shorter one.
    pub fn from_channels(mut left: Vec<Sample>, mut right: Vec<Sample>, rate: usize) -> Track {
        let frames = left.len().min(right.len());
        left.truncate(frames);
        right.truncate(frames);

        Track { left, right, rate }
    }

    /// Split interleaved samples into a track
    ///
    /// Mono input is played on both channels, more than two channels are not supported.
    pub fn from_interleaved(samples: &[Sample], channels: usize, rate: usize) -> Result<Track> {
        match channels {
            1 => Ok(Track::from_channels(samples.to_vec(), samples.to_vec(), rate)),
            2 => {
                let frames = samples.len() / 2;
                let mut left = Vec::with_capacity(frames);
                let mut right = Vec::with_capacity(frames);

                for frame in samples.chunks_exact(2) {
                    left.push(frame[0]);
                    right.push(frame[1]);
                }

                Ok(Track::from_channels(left, right, rate))
            }
            n => Err(Error::decode(
                "<interleaved>",
                format!("{} channels are not supported", n),
            )),
        }
    }

    #[inline]
    pub fn left(&self) -> &[Sample] {
        &self.left
    }

    #[inline]
    pub fn right(&self) -> &[Sample] {
        &self.right
    }

    /// Sample rate in Hz
    #[inline]
    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Number of stereo frames
    #[inline]
    pub fn frames(&self) -> usize {
        self.left.len()
    }

    /// Length of the track in seconds
    pub fn duration(&self) -> f32 {
        (self.frames() as f64 / self.rate as f64) as f32
    }
}

/// Decode an audio file into a [`Track`](struct.Track.html)
pub fn load<P: AsRef<Path>>(path: P) -> Result<Track> {
    let path = path.as_ref();
    let name = path.display();

    let file = std::fs::File::open(path).map_err(|e| Error::decode(&name, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::decode(&name, e))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| Error::decode(&name, "no audio tracks found"))?;

    let track_id = track.id;
    let rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::decode(&name, "unknown sample rate"))? as usize;
    let mut channels = track.codec_params.channels.map(|c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::decode(&name, e))?;

    let mut samples: Vec<Sample> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(Error::decode(&name, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                log::warn!("Skipping corrupt packet in {}: {}", name, e);
                continue;
            }
            Err(e) => return Err(Error::decode(&name, e)),
        };

        let spec = *decoded.spec();
        channels.get_or_insert(spec.channels.count());

        let mut buf = SampleBuffer::<Sample>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    let channels = channels.ok_or_else(|| Error::decode(&name, "unknown channel layout"))?;
    let track =
        Track::from_interleaved(&samples, channels, rate).map_err(|e| match e {
            Error::Decode { message, .. } => Error::decode(&name, message),
            e => e,
        })?;

    if track.frames() == 0 {
        return Err(Error::decode(&name, "track is empty"));
    }

    log::info!("Track {}:", name);
    log::info!("    Sample Rate = {:8} Hz", track.rate());
    log::info!("    Channels    = {:8}", channels);
    log::info!("    Frames      = {:8}", track.frames());
    log::info!("    Duration    = {:8.3} s", track.duration());

    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(name: &str, channels: u16, rate: u32, frames: usize) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("vis-core-{}-{}.wav", std::process::id(), name));
        let spec = hound::WavSpec {
            channels,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..frames {
            for c in 0..channels {
                let v = if c == 0 { 8192 } else { -8192 };
                writer.write_sample(if i % 2 == 0 { v } else { 0i16 }).unwrap();
            }
        }
        writer.finalize().unwrap();

        path
    }

    #[test]
    fn test_split() {
        let track = Track::from_interleaved(&[1.0, -1.0, 2.0, -2.0, 3.0, -3.0], 2, 8000).unwrap();

        assert_eq!(track.frames(), 3);
        assert_eq!(track.left(), &[1.0, 2.0, 3.0]);
        assert_eq!(track.right(), &[-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_mono() {
        let track = Track::from_interleaved(&[0.1, 0.2], 1, 8000).unwrap();

        assert_eq!(track.left(), track.right());
        assert_eq!(track.frames(), 2);
    }

    #[test]
    fn test_unsupported_channels() {
        match Track::from_interleaved(&[0.0; 12], 6, 8000) {
            Err(Error::Decode { .. }) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_uneven_channels() {
        let track = Track::from_channels(vec![0.0; 10], vec![0.0; 7], 10);

        assert_eq!(track.left().len(), 7);
        assert_eq!(track.right().len(), 7);
        assert!((track.duration() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_load_wav() {
        let path = write_wav("stereo", 2, 22050, 22050);
        let track = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(track.rate(), 22050);
        assert_eq!(track.frames(), 22050);
        assert!((track.duration() - 1.0).abs() < 1e-6);
        assert!((track.left()[0] - 0.25).abs() < 1e-3);
        assert!((track.right()[0] + 0.25).abs() < 1e-3);
        assert_eq!(track.left()[1], 0.0);
    }

    #[test]
    fn test_load_missing() {
        match load("/this/file/does/not/exist.wav") {
            Err(e @ Error::Decode { .. }) => assert_eq!(e.exit_code(), 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
