//! Error type shared by all pipeline stages
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Which step of the stream lifecycle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStage {
    Open,
    Start,
    Stop,
}

impl fmt::Display for DeviceStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeviceStage::Open => write!(f, "open"),
            DeviceStage::Start => write!(f, "start"),
            DeviceStage::Stop => write!(f, "stop"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The track could not be opened, probed or decoded
    #[error("can't decode {path}: {message}")]
    Decode { path: String, message: String },

    /// The playback stream could not be opened, started or stopped
    #[error("can't {stage} playback stream: {message}")]
    Device { stage: DeviceStage, message: String },

    /// A setting is out of its valid range
    #[error("invalid setting `{key}`: {message}")]
    Config { key: &'static str, message: String },
}

impl Error {
    pub(crate) fn decode<P: fmt::Display, M: fmt::Display>(path: P, message: M) -> Error {
        Error::Decode {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn device<M: fmt::Display>(stage: DeviceStage, message: M) -> Error {
        Error::Device {
            stage,
            message: message.to_string(),
        }
    }

    pub(crate) fn config<M: fmt::Display>(key: &'static str, message: M) -> Error {
        Error::Config {
            key,
            message: message.to_string(),
        }
    }

    /// Process exit status for this error
    ///
    /// Device errors get one status per stage so a failing stream can be told apart
    /// from a failing teardown.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Decode { .. } => 1,
            Error::Device {
                stage: DeviceStage::Open,
                ..
            } => 2,
            Error::Device {
                stage: DeviceStage::Start,
                ..
            } => 3,
            Error::Device {
                stage: DeviceStage::Stop,
                ..
            } => 4,
            Error::Config { .. } => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_distinct() {
        let errors = [
            Error::decode("a.wav", "missing"),
            Error::device(DeviceStage::Open, "no device"),
            Error::device(DeviceStage::Start, "busy"),
            Error::device(DeviceStage::Stop, "gone"),
            Error::config("bars.count", "must not be zero"),
        ];

        let mut codes = errors.iter().map(Error::exit_code).collect::<Vec<_>>();
        assert!(codes.iter().all(|c| *c != 0));
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display() {
        let err = Error::device(DeviceStage::Start, "busy");
        assert_eq!(err.to_string(), "can't start playback stream: busy");
    }
}
