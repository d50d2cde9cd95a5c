//! Command line configuration.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use tracing::Level;

use crate::{game::Settings, maze::MIN_SIDE};

/// Default hold latch for terminals without key-release events, in milliseconds.
const DEFAULT_HOLD_MS: u64 = 250;

/// Command line options of the game.
///
/// Every option has a default, so running the binary without arguments starts the standard
/// 61x61 maze with a 30 second clock.
#[derive(Clone, Debug, Parser)]
#[command(
    name = "labyrun",
    version,
    about = "Escape a procedurally generated maze against the clock."
)]
pub struct Config {
    /// Width and height of the maze in cells; must be odd and at least 5.
    #[arg(long, default_value_t = 61, value_parser = parse_size)]
    pub size: usize,

    /// Width of the maze in cells, overriding `--size`.
    #[arg(long, value_parser = parse_size)]
    pub width: Option<usize>,

    /// Height of the maze in cells, overriding `--size`.
    #[arg(long, value_parser = parse_size)]
    pub height: Option<usize>,

    /// Seconds on the clock at the start of every game.
    #[arg(long, default_value_t = 30., value_parser = parse_positive)]
    pub time: f64,

    /// Cells covered per frame while a direction is held.
    #[arg(long, default_value_t = 0.28, value_parser = parse_positive)]
    pub speed: f64,

    /// Seed of the maze generator; a random one is picked when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Milliseconds a key press counts as held on terminals that do not report key releases.
    #[arg(long, default_value_t = DEFAULT_HOLD_MS)]
    pub hold_ms: u64,

    /// File to write logs to; logging is disabled when omitted.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Most verbose level written to the log file.
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        let settings = Settings::default();

        Self {
            size: settings.width,
            width: None,
            height: None,
            time: settings.time_limit,
            speed: settings.speed,
            seed: None,
            hold_ms: DEFAULT_HOLD_MS,
            log_file: None,
            log_level: Level::INFO,
        }
    }
}

impl Config {
    /// Returns the game settings described by the options.
    pub(crate) fn settings(&self) -> Settings {
        Settings {
            width: self.width.unwrap_or(self.size),
            height: self.height.unwrap_or(self.size),
            time_limit: self.time,
            speed: self.speed,
        }
    }

    /// Returns the hold latch for terminals without key-release events.
    pub(crate) const fn hold_latch(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}

/// Parses a maze side, rejecting even values and values below [`MIN_SIDE`].
fn parse_size(value: &str) -> Result<usize, String> {
    let size: usize = value.parse().map_err(|err| format!("{err}"))?;

    if size < MIN_SIDE {
        Err(format!("the maze must be at least {MIN_SIDE} cells wide"))
    } else if size % 2 == 0 {
        Err("the maze size must be odd".to_owned())
    } else {
        Ok(size)
    }
}

/// Parses a finite, strictly positive number.
fn parse_positive(value: &str) -> Result<f64, String> {
    let number: f64 = value.parse().map_err(|err| format!("{err}"))?;

    if number.is_finite() && number > 0. {
        Ok(number)
    } else {
        Err("the value must be a positive number".to_owned())
    }
}
