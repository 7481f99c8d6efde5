//! A framework for playing a track while visualizing it in real time.
//!
//! The audio callback streams the decoded track to an output device and runs
//! a full-bandwidth fourier transform on every buffer.  Its results are
//! published through a triple buffer, so the render loop always sees the
//! latest complete [`Analysis`](playback/struct.Analysis.html) without ever
//! waiting on the audio thread.
//!
//! # Example
//! ```no_run
//! fn main() -> vis_core::Result<()> {
//!     // Initialize the logger.  Take a look at the sources if you want to customize
//!     // the logger.
//!     vis_core::default_log();
//!
//!     // Load the default config source.  More about config later on.
//!     vis_core::default_config()?;
//!
//!     let settings = vis_core::Settings::from_config()?;
//!     let track = vis_core::track::load("music/snow.wav")?;
//!
//!     // Start playback.  The frame iterator ends once the track is over.
//!     let mut frames = vis_core::Visualizer::new(track)
//!         .settings(settings)
//!         .play()?;
//!
//!     for frame in frames.iter() {
//!         // This is just a primitive example, your vis code belongs here
//!         frame.lock_info(|info| {
//!             for _ in 0..(info.amplitude * 100.0) as usize {
//!                 print!("#");
//!             }
//!             println!("");
//!         });
//!         std::thread::sleep(std::time::Duration::from_millis(30));
//!     }
//!
//!     frames.stop()
//! }
//! ```
pub mod analyzer;
pub mod display;
pub mod driver;
pub mod error;
pub mod frames;
pub mod helpers;
pub mod playback;
pub mod settings;
pub mod track;
pub mod visualizer;

#[doc(inline)]
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::frames::Frames;
#[doc(inline)]
pub use crate::settings::Settings;
#[doc(inline)]
pub use crate::track::Track;
#[doc(inline)]
pub use crate::visualizer::Visualizer;

/// `ezconf` configuration
///
/// Usually you will call [`default_config`](fn.default_config.html) in the beginning
/// which will populate this object, but you can also specify your own custom config
/// sources.
///
/// # Example
/// To make use of this config, use code similar to this:
///
/// ```rust
/// # vis_core::default_config().unwrap();
/// let some_configurable_value = vis_core::CONFIG.get_or(
///     // Toml path to value
///     "foo.bar",
///     // Default value.  Type gets inferred from this
///     123,
/// );
/// ```
pub static CONFIG: ezconf::Config = ezconf::INIT;

/// Initialize config from default sources
///
/// The default sources are:
/// * `./visualizer.toml`
/// * `./config/visualizer.toml`
/// * Defaults from code
///
/// The first file that exists is used.  A file that is not valid toml is a config error.
pub fn default_config() -> Result<()> {
    const SOURCES: [&str; 2] = ["visualizer.toml", "config/visualizer.toml"];

    let contents = SOURCES
        .iter()
        .find_map(|path| std::fs::read_to_string(path).ok().map(|s| (*path, s)));

    let res = match &contents {
        Some((path, contents)) => {
            check_toml(*path, contents)?;
            log::info!("Loading config from {:?}", path);
            CONFIG.init([ezconf::Source::Memory(contents.as_str())].iter())
        }
        None => CONFIG.init(std::iter::empty::<&ezconf::Source>()),
    };

    res.map(|_| ())
        .map_err(|()| Error::config("config", "already initialized"))
}

fn check_toml(path: &'static str, contents: &str) -> Result<()> {
    contents
        .parse::<ezconf::toml::Value>()
        .map(|_| ())
        .map_err(|e| Error::config(path, e))
}

/// Initialize logger
///
/// By default, enable debug output in debug-builds.
pub fn default_log() {
    #[cfg(not(debug_assertions))]
    env_logger::init();

    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    color_backtrace::install();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_config_file() {
        check_toml("visualizer.toml", "[bars]\ncount = 100\n").unwrap();

        match check_toml("visualizer.toml", "[bars\ncount = = 3") {
            Err(e @ Error::Config { key: "visualizer.toml", .. }) => assert_eq!(e.exit_code(), 5),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
