//! Arcade configuration stored in `termarcade.toml` next to the binaries.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ArcadeError, Result};

pub const CONFIG_FILE: &str = "termarcade.toml";
/// Overrides the location of the config file.
pub const CONFIG_ENV: &str = "TERMARCADE_CONFIG";

/// Top-level configuration. Missing fields fall back to the classic values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Length of one game loop tick in milliseconds.
    pub tick_ms: u64,
    pub launcher: LauncherConfig,
    pub avoid_blocks: AvoidBlocksConfig,
    pub snake: SnakeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherConfig {
    /// File name prefix that marks an executable as a game.
    pub prefix: String,
    /// Maximum number of games listed in the menu.
    pub max_games: usize,
    /// How often the supervisor checks for interruption while a game runs.
    pub wait_poll_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AvoidBlocksConfig {
    pub rows: usize,
    pub cols: usize,
    /// Ticks between two block steps.
    pub fall_delay: u32,
    /// Chance for an idle column to spawn a block on each step.
    pub spawn_chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SnakeConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            launcher: LauncherConfig::default(),
            avoid_blocks: AvoidBlocksConfig::default(),
            snake: SnakeConfig::default(),
        }
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            prefix: "game_".to_string(),
            max_games: 10,
            wait_poll_ms: 50,
        }
    }
}

impl Default for AvoidBlocksConfig {
    fn default() -> Self {
        Self {
            rows: 15,
            cols: 7,
            fall_delay: 5,
            spawn_chance: 0.1,
        }
    }
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self { rows: 15, cols: 15 }
    }
}

impl Config {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(ArcadeError::invalid("tick_ms", "must be > 0"));
        }
        if self.launcher.prefix.is_empty() {
            return Err(ArcadeError::invalid("launcher.prefix", "must not be empty"));
        }
        if self.launcher.max_games == 0 {
            return Err(ArcadeError::invalid("launcher.max_games", "must be > 0"));
        }
        if self.launcher.wait_poll_ms == 0 {
            return Err(ArcadeError::invalid("launcher.wait_poll_ms", "must be > 0"));
        }

        let blocks = &self.avoid_blocks;
        if blocks.rows < 2 {
            return Err(ArcadeError::invalid("avoid_blocks.rows", "must be >= 2"));
        }
        if blocks.cols == 0 {
            return Err(ArcadeError::invalid("avoid_blocks.cols", "must be > 0"));
        }
        if blocks.fall_delay == 0 {
            return Err(ArcadeError::invalid("avoid_blocks.fall_delay", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&blocks.spawn_chance) {
            return Err(ArcadeError::invalid(
                "avoid_blocks.spawn_chance",
                format!("must be within [0, 1], got {}", blocks.spawn_chance),
            ));
        }

        if self.snake.rows == 0 || self.snake.cols == 0 {
            return Err(ArcadeError::invalid("snake", "rows and cols must be > 0"));
        }
        if self.snake.rows * self.snake.cols < 2 {
            return Err(ArcadeError::invalid("snake", "grid needs room for the bait"));
        }
        Ok(())
    }
}

/// Resolve the config path: `$TERMARCADE_CONFIG` or `termarcade.toml` in the working directory.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `Config::default()`.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| ArcadeError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw)
}

pub fn parse_config(raw: &str) -> Result<Config> {
    let config: Config = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}
