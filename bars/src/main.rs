use std::path::PathBuf;

mod canvas;

/// Play an audio file and show its spectrum as bars
#[derive(Debug, clap::Parser)]
#[command(version, about)]
struct Args {
    /// Audio file to play, defaults to `track.path` from config
    path: Option<PathBuf>,

    /// Playback backend, defaults to `audio.backend` from config
    #[arg(long, value_parser = ["cpal", "null"])]
    backend: Option<String>,
}

fn run(args: Args) -> vis_core::Result<vis_core::driver::Summary> {
    vis_core::default_config()?;

    let mut settings = vis_core::Settings::from_config()?;
    if let Some(backend) = args.backend {
        settings.backend = backend;
        settings.validate()?;
    }

    let path = match args.path {
        Some(path) => path,
        None => PathBuf::from(vis_core::settings::config_value(
            "track.path",
            "./music/snow.wav".to_string(),
        )?),
    };
    let track = vis_core::track::load(&path)?;

    let mut canvas = canvas::SfmlCanvas::new(settings.screen_width, settings.screen_height);

    vis_core::driver::run(vis_core::Visualizer::new(track), &settings, &mut canvas)
}

fn main() {
    let args = <Args as clap::Parser>::parse();

    vis_core::default_log();

    match run(args) {
        Ok(summary) => log::debug!("{:?}", summary),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}
