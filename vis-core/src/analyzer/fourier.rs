//! Fourier Analysis
use super::{Sample, SignalStrength};
use rustfft::num_complex::Complex;

/// Length of the analysis window
///
/// Twice the highest audible frequency, so one bucket of the transform is one Hertz wide
/// for a track sampled at this rate.
pub const BAND: usize = 44100;

/// Number of buckets produced from a `BAND` long window
pub const SPECTRUM_LEN: usize = BAND / 2 + 1;

/// Signal strength reported for a bucket without any energy
pub const FLOOR_DB: SignalStrength = -200.0;

const MIN_MAGNITUDE: SignalStrength = 1e-10;

/// Window functions
///
/// A window-function in this case takes a size and should return a `Vec` of that length filled
/// with the precomputed window coefficients.  The following are available by default:
///
/// * [None / Rectangle](fn.none.html)
/// * [Sine](fn.sine.html)
/// * [Hanning](fn.hanning.html)
/// * [Hamming](fn.hamming.html)
/// * [Blackman](fn.blackman.html)
/// * [Nuttall](fn.nuttall.html)
/// * [Triangular](fn.triangular.html)
pub mod window {
    /// Blackman Window
    pub fn blackman(size: usize) -> Vec<f32> {
        apodize::blackman_iter(size).map(|f| f as f32).collect()
    }

    /// Hamming Window
    pub fn hamming(size: usize) -> Vec<f32> {
        apodize::hamming_iter(size).map(|f| f as f32).collect()
    }

    /// Hanning Window
    pub fn hanning(size: usize) -> Vec<f32> {
        apodize::hanning_iter(size).map(|f| f as f32).collect()
    }

    /// No window function / Rectangle window
    pub fn none(size: usize) -> Vec<f32> {
        vec![1.0; size]
    }

    /// Nuttall Window
    pub fn nuttall(size: usize) -> Vec<f32> {
        apodize::nuttall_iter(size).map(|f| f as f32).collect()
    }

    /// Sine Window
    pub fn sine(size: usize) -> Vec<f32> {
        if size <= 1 {
            return vec![1.0; size];
        }

        (0..size)
            .map(|i| (i as f32 / (size - 1) as f32 * std::f32::consts::PI).sin())
            .collect()
    }

    /// Triangular Window
    pub fn triangular(size: usize) -> Vec<f32> {
        apodize::triangular_iter(size).map(|f| f as f32).collect()
    }

    /// Get the window function for the specified name
    pub fn from_str(name: &str) -> Option<fn(usize) -> Vec<f32>> {
        match name {
            "blackman" => Some(blackman),
            "hamming" => Some(hamming),
            "hanning" => Some(hanning),
            "none" => Some(none),
            "nuttall" => Some(nuttall),
            "sine" => Some(sine),
            "triangular" => Some(triangular),
            _ => None,
        }
    }
}

/// Builder for FourierAnalyzer
#[derive(Debug, Default)]
pub struct FourierBuilder {
    /// Length of the fourier transform
    ///
    /// Defaults to [`BAND`](constant.BAND.html).
    pub length: Option<usize>,

    /// Window Function
    ///
    /// A few window functions are defined in the [`window`](window/index.html) module.
    /// Defaults to [`window::none`](window/fn.none.html).
    pub window: Option<fn(usize) -> Vec<f32>>,
}

impl FourierBuilder {
    /// Create a new FourierBuilder
    pub fn new() -> FourierBuilder {
        Default::default()
    }

    /// Set the length of the transform buffer
    pub fn length(&mut self, length: usize) -> &mut FourierBuilder {
        self.length = Some(length);
        self
    }

    /// Set the window function
    pub fn window(&mut self, f: fn(usize) -> Vec<f32>) -> &mut FourierBuilder {
        self.window = Some(f);
        self
    }

    /// Plan the fourier transform and prepare buffers
    ///
    /// This is the only place where the analyzer allocates.
    pub fn plan(&mut self) -> FourierAnalyzer {
        let length = self.length.unwrap_or(BAND);
        let window = (self.window.unwrap_or(window::none))(length);

        FourierAnalyzer::new(length, window)
    }
}

/// Fourier Analyzer
///
/// Turns a window of samples into one signal strength in dB per bucket, using a
/// real-to-complex transform that is planned once and reused for every call.
///
/// # Example
/// ```
/// # use vis_core::analyzer::fourier::*;
/// let mut analyzer = FourierBuilder::new()
///     .length(512)
///     .window(window::nuttall)
///     .plan();
///
/// let samples = vec![0.5; 1024];
/// let mut levels = vec![0.0; analyzer.buckets()];
/// analyzer.analyze(&samples, 0, &mut levels);
/// # assert_eq!(levels.len(), 257);
/// ```
pub struct FourierAnalyzer {
    length: usize,
    buckets: usize,
    window: Vec<Sample>,

    fft: std::sync::Arc<dyn realfft::RealToComplex<Sample>>,

    input: Vec<Sample>,
    output: Vec<Complex<Sample>>,
    scratch: Vec<Complex<Sample>>,
    left: Vec<SignalStrength>,

    failures: u32,
}

impl std::fmt::Debug for FourierAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "FourierAnalyzer {{ length: {:?}, buckets: {:?}, failures: {:?} }}",
            self.length, self.buckets, self.failures,
        )
    }
}

impl FourierAnalyzer {
    fn new(length: usize, window: Vec<f32>) -> FourierAnalyzer {
        let fft = realfft::RealFftPlanner::<Sample>::new().plan_fft_forward(length);
        let buckets = length / 2 + 1;

        let fa = FourierAnalyzer {
            length,
            buckets,
            window,

            input: fft.make_input_vec(),
            output: fft.make_output_vec(),
            scratch: fft.make_scratch_vec(),
            left: vec![FLOOR_DB; buckets],

            fft,

            failures: 0,
        };

        log::debug!("FourierAnalyzer({:p}):", &fa);
        log::debug!("    Fourier Length      = {:8}", length);
        log::debug!("    Buckets             = {:8}", buckets);
        log::debug!("    Scratch Length      = {:8}", fa.scratch.len());

        fa
    }

    /// Return the length of the analysis window
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Return the number of buckets
    #[inline]
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Number of transforms that failed since planning
    #[inline]
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Return the bucket closest to a frequency for a track sampled at `rate`
    pub fn bin_for(&self, freq: f32, rate: usize) -> usize {
        (freq as f64 * self.length as f64 / rate as f64).round() as usize
    }

    /// Analyze one channel
    ///
    /// Transforms `channel[offset..offset + length]` and writes one dB value per bucket into
    /// `out`.  Samples past the end of `channel` count as silence.
    pub fn analyze(&mut self, channel: &[Sample], offset: usize, out: &mut [SignalStrength]) {
        debug_assert_eq!(out.len(), self.buckets, "Output has the wrong size!");

        let available = channel.get(offset..).unwrap_or(&[]);
        for (i, (x, w)) in self.input.iter_mut().zip(self.window.iter()).enumerate() {
            *x = available.get(i).map_or(0.0, |s| s * w);
        }

        match self
            .fft
            .process_with_scratch(&mut self.input, &mut self.output, &mut self.scratch)
        {
            Ok(()) => {
                for (o, c) in out.iter_mut().zip(self.output.iter()) {
                    *o = to_db(*c);
                }
            }
            // Only possible with mismatched buffers.  No logging, we might be on
            // the audio thread.
            Err(_) => {
                self.failures = self.failures.wrapping_add(1);
                for o in out.iter_mut() {
                    *o = FLOOR_DB;
                }
            }
        }
    }

    /// Analyze both channels and write the per-bucket average into `out`
    pub fn analyze_stereo(
        &mut self,
        left: &[Sample],
        right: &[Sample],
        offset: usize,
        out: &mut [SignalStrength],
    ) {
        // Taking the Vec out leaves an empty one behind, which does not allocate
        let mut left_db = std::mem::take(&mut self.left);

        self.analyze(left, offset, &mut left_db);
        self.analyze(right, offset, out);

        for (o, l) in out.iter_mut().zip(left_db.iter()) {
            *o = (*o + l) / 2.0;
        }

        self.left = left_db;
    }
}

/// Signal strength of one transform coefficient in dB
#[inline]
pub fn to_db(c: Complex<Sample>) -> SignalStrength {
    20.0 * c.norm().max(MIN_MAGNITUDE).log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, rate: usize, len: usize) -> Vec<Sample> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin())
            .collect()
    }

    fn peak(levels: &[SignalStrength]) -> usize {
        levels
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap()
            .0
    }

    #[test]
    fn test_init() {
        let analyzer = FourierBuilder::new()
            .length(512)
            .window(window::from_str("nuttall").unwrap())
            .plan();

        assert_eq!(analyzer.length(), 512);
        assert_eq!(analyzer.buckets(), 257);
    }

    #[test]
    fn test_default_length() {
        let analyzer = FourierBuilder::new().plan();

        assert_eq!(analyzer.length(), BAND);
        assert_eq!(analyzer.buckets(), SPECTRUM_LEN);
    }

    #[test]
    fn test_windows() {
        for name in [
            "blackman",
            "hamming",
            "hanning",
            "none",
            "nuttall",
            "sine",
            "triangular",
        ]
        .iter()
        {
            let w = window::from_str(name).unwrap()(64);
            assert_eq!(w.len(), 64, "{}", name);
            assert!(w.iter().all(|c| c.is_finite()), "{}", name);
        }
        assert!(window::from_str("kaiser").is_none());
    }

    #[test]
    fn test_tiny_windows() {
        assert_eq!(window::sine(1), vec![1.0]);
        assert!(window::sine(0).is_empty());
    }

    #[test]
    fn test_failed_transform() {
        let mut analyzer = FourierBuilder::new().length(64).plan();
        let mut out = vec![0.0; analyzer.buckets()];

        // Mismatched output buffer
        analyzer.output.pop();
        analyzer.analyze(&[1.0; 64], 0, &mut out);

        assert_eq!(analyzer.failures(), 1);
        assert!(out.iter().all(|v| *v == FLOOR_DB));
    }

    #[test]
    fn test_silence() {
        let mut analyzer = FourierBuilder::new().length(256).plan();
        let mut out = vec![0.0; analyzer.buckets()];

        analyzer.analyze(&[0.0; 256], 0, &mut out);

        assert!(out.iter().all(|v| *v == FLOOR_DB));
    }

    #[test]
    fn test_db_of_dc() {
        let mut analyzer = FourierBuilder::new().length(1024).plan();
        let mut out = vec![0.0; analyzer.buckets()];

        analyzer.analyze(&[1.0; 1024], 0, &mut out);

        // All energy ends up in bucket 0 with a magnitude of `length`
        assert!((out[0] - 20.0 * 1024f32.log10()).abs() < 1e-3, "{}", out[0]);
        assert_eq!(peak(&out), 0);
    }

    #[test]
    fn test_sine_peak() {
        let rate = 44100;
        let samples = sine(1000.0, rate, BAND * 2);

        let mut analyzer = FourierBuilder::new().plan();
        let mut out = vec![0.0; analyzer.buckets()];
        analyzer.analyze(&samples, 1234, &mut out);

        assert_eq!(analyzer.bin_for(1000.0, rate), 1000);
        assert_eq!(peak(&out), 1000);
    }

    #[test]
    fn test_sine_peak_other_rate() {
        let rate = 48000;
        let samples = sine(440.0, rate, BAND);

        let mut analyzer = FourierBuilder::new().plan();
        let mut out = vec![0.0; analyzer.buckets()];
        analyzer.analyze(&samples, 0, &mut out);

        let expected = analyzer.bin_for(440.0, rate);
        assert_eq!(expected, 404);
        assert!(
            (peak(&out) as isize - expected as isize).abs() <= 1,
            "{} != {}",
            peak(&out),
            expected
        );
    }

    #[test]
    fn test_stereo_average() {
        let rate = 8192;
        let left = sine(512.0, rate, 1024);
        let right = vec![0.0; 1024];

        let mut analyzer = FourierBuilder::new().length(1024).plan();
        let mut left_db = vec![0.0; analyzer.buckets()];
        let mut avg = vec![0.0; analyzer.buckets()];

        analyzer.analyze(&left, 0, &mut left_db);
        analyzer.analyze_stereo(&left, &right, 0, &mut avg);

        for (a, l) in avg.iter().zip(left_db.iter()) {
            assert!((a - (l + FLOOR_DB) / 2.0).abs() < 1e-3);
        }
        assert_eq!(peak(&avg), analyzer.bin_for(512.0, rate));
    }

    #[test]
    fn test_short_channel() {
        let mut analyzer = FourierBuilder::new().length(512).plan();
        let mut out = vec![0.0; analyzer.buckets()];

        // Partially past the end: padded with silence
        analyzer.analyze(&[1.0; 100], 50, &mut out);
        assert!(out[0] > FLOOR_DB);

        // Completely past the end
        analyzer.analyze(&[1.0; 100], 500, &mut out);
        assert!(out.iter().all(|v| *v == FLOOR_DB));
        assert_eq!(analyzer.failures(), 0);
    }
}
