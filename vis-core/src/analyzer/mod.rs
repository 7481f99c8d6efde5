pub mod buckets;
pub mod fourier;

pub use self::buckets::log_buckets;
pub use self::fourier::{window, FourierAnalyzer, FourierBuilder, BAND, FLOOR_DB, SPECTRUM_LEN};

/// Type Alias for Samples
pub type Sample = f32;

/// Type Alias for Signal Strengths
pub type SignalStrength = f32;
