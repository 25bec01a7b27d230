//! Command line configuration.

use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::{ensure, Result};

use crate::{
    game::GameSettings,
    generator::DEFAULT_MAX_ATTEMPTS,
    types::{Difficulty, GameMode},
};

/// Largest accepted width or height.
///
/// This keeps the maze inside a regular terminal window and inside the `u16` coordinates the
/// renderer works with.
pub const MAX_DIMENSION: u16 = 64;

/// Terminal maze game with always-solvable, randomly generated levels.
#[derive(Clone, Debug, PartialEq, Parser)]
#[command(version, about)]
pub struct Config {
    /// Number of columns of each maze.
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_DIMENSION)))]
    pub width: u16,
    /// Number of rows of each maze.
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u16).range(1..=i64::from(MAX_DIMENSION)))]
    pub height: u16,
    /// Difficulty tier, which picks the wall probability.
    #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
    pub difficulty: Difficulty,
    /// Rules to play under; time trial counts down from a limit picked by the difficulty.
    #[arg(long, value_enum, default_value_t = GameMode::Classic)]
    pub mode: GameMode,
    /// Wall probability in [0, 1], overriding the difficulty tier.
    #[arg(long, value_parser = parse_probability)]
    pub wall_probability: Option<f64>,
    /// Seed for reproducible mazes.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Random fills tried before falling back to a serpentine maze.
    #[arg(long, default_value_t = NonZeroUsize::new(DEFAULT_MAX_ATTEMPTS).unwrap_or(NonZeroUsize::MIN))]
    pub max_attempts: NonZeroUsize,
    /// File to write logs to; logging is disabled when absent.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 12,
            height: 12,
            difficulty: Difficulty::default(),
            mode: GameMode::default(),
            wall_probability: None,
            seed: None,
            max_attempts: NonZeroUsize::new(DEFAULT_MAX_ATTEMPTS).unwrap_or(NonZeroUsize::MIN),
            log_file: None,
        }
    }
}

impl Config {
    /// Checks the values that the parser cannot enforce on a hand-built configuration.
    ///
    /// # Errors
    ///
    /// This function returns an error if a dimension is outside `1..=MAX_DIMENSION` or if the wall
    /// probability override is outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_DIMENSION).contains(&self.width),
            "width {} is outside 1..={MAX_DIMENSION}",
            self.width
        );
        ensure!(
            (1..=MAX_DIMENSION).contains(&self.height),
            "height {} is outside 1..={MAX_DIMENSION}",
            self.height
        );
        if let Some(probability) = self.wall_probability {
            ensure!(
                (0.0..=1.0).contains(&probability),
                "wall probability {probability} is outside [0, 1]"
            );
        }

        Ok(())
    }

    /// Returns the wall probability in effect.
    #[must_use]
    pub fn wall_probability(&self) -> f64 {
        self.settings().wall_probability()
    }

    /// Builds the game settings described by this configuration.
    #[must_use]
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            width: usize::from(self.width),
            height: usize::from(self.height),
            difficulty: self.difficulty,
            wall_probability: self.wall_probability,
            mode: self.mode,
        }
    }
}

/// Parses a probability, accepting only finite values in `[0, 1]`.
fn parse_probability(input: &str) -> Result<f64, String> {
    let value: f64 = input
        .parse()
        .map_err(|err| format!("invalid probability {input:?}: {err}"))?;

    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("probability {value} is outside [0, 1]"))
    }
}
