#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Sky Chaser or the Stellar Explorer toy.

mod config;
mod explorer;
mod platformer;

use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use sky_chaser_rendering::{Color, Presentation, RenderingBackend, Scene, Viewport};
use sky_chaser_rendering_macroquad::MacroquadBackend;

use self::{
    config::{Overrides, SessionConfig},
    explorer::ExplorerSession,
    platformer::PlatformerSession,
};

/// Which game to open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Game {
    /// Sky Chaser platformer.
    Platformer,
    /// Stellar Explorer free-flight toy.
    Explorer,
}

impl Game {
    const fn title(self) -> &'static str {
        match self {
            Self::Platformer => "Sky Chaser",
            Self::Explorer => "Stellar Explorer",
        }
    }
}

/// Command line arguments accepted by the binary.
#[derive(Debug, Parser)]
#[command(name = "sky-chaser", about = "Platformer with a grappling hook, plus a space toy")]
struct Args {
    /// Game to run.
    #[arg(long, value_enum, default_value_t = Game::Platformer)]
    game: Game,
    /// Optional TOML session configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for particle effects, the galaxy and the starfield.
    #[arg(long)]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: Option<bool>,
    /// Log frame timings once per second.
    #[arg(long)]
    show_fps: bool,
    /// Log filter directive, for example `debug` or `sky_chaser_world=trace`.
    #[arg(long)]
    log_level: Option<String>,
}

/// Entry point for the Sky Chaser command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let config = SessionConfig::load(args.config.as_deref())?.with_overrides(Overrides {
        seed: args.seed,
        vsync: args.vsync,
        show_fps: args.show_fps,
    });
    let seed = config.seed.unwrap_or_else(clock_seed);
    info!("starting {} with seed {seed}", args.game.title());

    let viewport = Viewport::new(config.window.width, config.window.height)
        .context("invalid window size in session config")?;
    let title = config
        .window
        .title
        .clone()
        .unwrap_or_else(|| args.game.title().to_owned());
    let scene = Scene::new(Color::new(0.0, 0.0, 0.0, 1.0));
    let presentation = Presentation::new(title, viewport, scene);
    let backend = MacroquadBackend::new()
        .with_vsync(config.vsync)
        .with_show_fps(config.show_fps);

    match args.game {
        Game::Platformer => {
            let mut session = PlatformerSession::new(seed, viewport);
            backend.run(presentation, move |_, input, scene| session.frame(&input, scene))
        }
        Game::Explorer => {
            let mut session = ExplorerSession::new(seed, config.explorer.planets);
            backend.run(presentation, move |_, input, scene| session.frame(&input, scene))
        }
    }
}

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        let _ = builder.parse_filters(filter);
    }
    builder.init();
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_open_the_platformer() {
        let args = Args::try_parse_from(["sky-chaser"]).expect("defaults parse");
        assert_eq!(args.game, Game::Platformer);
        assert_eq!(args.seed, None);
        assert!(!args.show_fps);
    }

    #[test]
    fn explorer_flags_parse() {
        let args = Args::try_parse_from([
            "sky-chaser",
            "--game",
            "explorer",
            "--seed",
            "7",
            "--vsync",
            "false",
            "--show-fps",
        ])
        .expect("flags parse");
        assert_eq!(args.game, Game::Explorer);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.vsync, Some(false));
        assert!(args.show_fps);
    }

    #[test]
    fn unknown_games_are_rejected() {
        assert!(Args::try_parse_from(["sky-chaser", "--game", "tetris"]).is_err());
    }
}
