//! Tunables of the visualizer
use crate::analyzer::{window, SPECTRUM_LEN};
use crate::{Error, Result};
use ezconf::toml;

/// A type that can be read from a `section.name` config key
pub trait ConfigValue: Sized {
    /// What the value should look like, for error messages
    const EXPECTED: &'static str;

    fn from_value(value: &toml::Value) -> Option<Self>;
}

impl ConfigValue for u32 {
    const EXPECTED: &'static str = "a non-negative integer";

    fn from_value(value: &toml::Value) -> Option<u32> {
        value.as_integer().and_then(|i| u32::try_from(i).ok())
    }
}

impl ConfigValue for usize {
    const EXPECTED: &'static str = "a non-negative integer";

    fn from_value(value: &toml::Value) -> Option<usize> {
        value.as_integer().and_then(|i| usize::try_from(i).ok())
    }
}

impl ConfigValue for f64 {
    const EXPECTED: &'static str = "a number";

    fn from_value(value: &toml::Value) -> Option<f64> {
        value
            .as_float()
            .or_else(|| value.as_integer().map(|i| i as f64))
    }
}

impl ConfigValue for f32 {
    const EXPECTED: &'static str = "a number";

    fn from_value(value: &toml::Value) -> Option<f32> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl ConfigValue for String {
    const EXPECTED: &'static str = "a string";

    fn from_value(value: &toml::Value) -> Option<String> {
        value.as_str().map(|s| s.to_string())
    }
}

/// Read `key` from [`CONFIG`](../static.CONFIG.html), or `default` if it is not set
///
/// Unlike `CONFIG.get_or` this never panics on a malformed value, a wrong type is returned
/// as a config error instead.
pub fn config_value<T: ConfigValue>(key: &'static str, default: T) -> Result<T> {
    let (section, name) = key
        .split_once('.')
        .ok_or_else(|| Error::config(key, "not a `section.name` key"))?;

    // Reading a whole section as a raw value can not fail
    let table = match crate::CONFIG.get::<toml::Value>(section) {
        None => return Ok(default),
        Some(toml::Value::Table(table)) => table,
        Some(_) => {
            return Err(Error::config(
                key,
                format!("`{}` is not a table", section),
            ))
        }
    };

    match table.get(name) {
        None => Ok(default),
        Some(value) => T::from_value(value).ok_or_else(|| {
            Error::config(key, format!("expected {}, found {}", T::EXPECTED, value))
        }),
    }
}

/// All recognized options
///
/// Every field can also be set from config, the key is noted on each field.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `"window.width"`
    pub screen_width: u32,
    /// `"window.height"`
    pub screen_height: u32,
    /// Frames requested from the callback per hardware buffer, `"audio.buffer"`
    pub frames_per_buffer: usize,
    /// Lowest displayed bin, `"bars.min_freq"`
    pub min_freq: f64,
    /// Highest displayed bin, `"bars.max_freq"`
    pub max_freq: f64,
    /// Requested number of bars, `"bars.count"`
    ///
    /// The actual number can be lower, see
    /// [`log_buckets`](../analyzer/buckets/fn.log_buckets.html).
    pub bar_count: usize,
    /// Exponential smoothing factor of the pulse, `"pulse.alpha"`
    pub smoothing_alpha: f32,
    /// Bar height per dB, `"bars.scale"`
    pub visual_scale: f32,
    /// Radius of the pulse at an amplitude of 1.0, `"pulse.radius"`
    pub pulse_radius: f32,
    /// Seconds cut off the end of the track, `"audio.margin"`
    pub safety_margin: f32,
    /// Window function name, `"audio.window"`
    pub window: String,
    /// Playback backend name, `"audio.backend"`
    pub backend: String,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            screen_width: 1920,
            screen_height: 1080,
            frames_per_buffer: 2048,
            min_freq: 20.0,
            max_freq: 20000.0,
            bar_count: 100,
            smoothing_alpha: 0.5,
            visual_scale: 5.0,
            pulse_radius: 300.0,
            safety_margin: 0.5,
            window: "none".to_string(),
            backend: "cpal".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from [`CONFIG`](../static.CONFIG.html) and validate them
    ///
    /// A value of the wrong type is reported like any other invalid setting.
    pub fn from_config() -> Result<Settings> {
        let def = Settings::default();

        let settings = Settings {
            screen_width: config_value("window.width", def.screen_width)?,
            screen_height: config_value("window.height", def.screen_height)?,
            frames_per_buffer: config_value("audio.buffer", def.frames_per_buffer)?,
            min_freq: config_value("bars.min_freq", def.min_freq)?,
            max_freq: config_value("bars.max_freq", def.max_freq)?,
            bar_count: config_value("bars.count", def.bar_count)?,
            smoothing_alpha: config_value("pulse.alpha", def.smoothing_alpha)?,
            visual_scale: config_value("bars.scale", def.visual_scale)?,
            pulse_radius: config_value("pulse.radius", def.pulse_radius)?,
            safety_margin: config_value("audio.margin", def.safety_margin)?,
            window: config_value("audio.window", def.window)?,
            backend: config_value("audio.backend", def.backend)?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Check that all values are usable
    pub fn validate(&self) -> Result<()> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(Error::config("window", "screen size must not be zero"));
        }
        if self.frames_per_buffer == 0 {
            return Err(Error::config("audio.buffer", "must not be zero"));
        }
        if !(self.min_freq >= 1.0) {
            return Err(Error::config("bars.min_freq", "must be at least 1"));
        }
        if !(self.max_freq > self.min_freq) {
            return Err(Error::config(
                "bars.max_freq",
                format!("{} is not above bars.min_freq ({})", self.max_freq, self.min_freq),
            ));
        }
        if self.max_freq >= SPECTRUM_LEN as f64 {
            return Err(Error::config(
                "bars.max_freq",
                format!("{} is outside the spectrum (< {})", self.max_freq, SPECTRUM_LEN),
            ));
        }
        if self.bar_count == 0 {
            return Err(Error::config("bars.count", "must not be zero"));
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(Error::config("pulse.alpha", "must be in (0, 1]"));
        }
        if !(self.safety_margin >= 0.0) {
            return Err(Error::config("audio.margin", "must not be negative"));
        }
        if window::from_str(&self.window).is_none() {
            return Err(Error::config(
                "audio.window",
                format!("unknown window function {:?}", self.window),
            ));
        }
        if !crate::playback::BACKENDS.contains(&self.backend.as_str()) {
            return Err(Error::config(
                "audio.backend",
                format!("unknown backend {:?}", self.backend),
            ));
        }

        Ok(())
    }
}
