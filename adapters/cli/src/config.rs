//! Session configuration loaded from an optional TOML file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use sky_chaser_core::tuning;
use stellar_explorer::tuning::DEFAULT_PLANET_COUNT;

/// Window settings shared by both games.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    /// Title override; each game supplies its own name when absent.
    pub(crate) title: Option<String>,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: tuning::VIEWPORT_WIDTH,
            height: tuning::VIEWPORT_HEIGHT,
        }
    }
}

/// Stellar Explorer settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ExplorerConfig {
    pub(crate) planets: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            planets: DEFAULT_PLANET_COUNT,
        }
    }
}

/// Everything the binary needs to open a window and start a session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    pub(crate) window: WindowConfig,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
    /// Seed for every random stream; drawn from the clock when absent.
    pub(crate) seed: Option<u64>,
    pub(crate) explorer: ExplorerConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            vsync: true,
            show_fps: false,
            seed: None,
            explorer: ExplorerConfig::default(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) vsync: Option<bool>,
    pub(crate) show_fps: bool,
}

impl SessionConfig {
    /// Reads the file at `path`, or returns the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies command-line overrides on top of the loaded values.
    #[must_use]
    pub(crate) fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(vsync) = overrides.vsync {
            self.vsync = vsync;
        }
        self.show_fps |= overrides.show_fps;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_defaults() {
        let config = SessionConfig::load(None).expect("defaults");
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.window.width, 800.0);
        assert_eq!(config.explorer.planets, 20);
        assert!(config.vsync);
    }

    #[test]
    fn partial_files_keep_remaining_defaults() {
        let config = SessionConfig::parse(
            r#"
            seed = 42

            [window]
            title = "Sky Chaser (debug)"

            [explorer]
            planets = 5
            "#,
        )
        .expect("valid config");

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.window.title.as_deref(), Some("Sky Chaser (debug)"));
        assert_eq!(config.window.height, 600.0);
        assert_eq!(config.explorer.planets, 5);
        assert!(!config.show_fps);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(SessionConfig::parse("gravity = 2.0").is_err());
    }

    #[test]
    fn command_line_wins_over_the_file() {
        let config = SessionConfig::parse("seed = 1\nvsync = true").expect("valid config");
        let config = config.with_overrides(Overrides {
            seed: Some(9),
            vsync: Some(false),
            show_fps: true,
        });

        assert_eq!(config.seed, Some(9));
        assert!(!config.vsync);
        assert!(config.show_fps);

        let untouched = SessionConfig::default().with_overrides(Overrides::default());
        assert_eq!(untouched, SessionConfig::default());
    }
}
