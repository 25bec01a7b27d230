//! Type definitions and enums shared by the game logic and the terminal front-end.

use std::{fmt, time::Duration};

use clap::ValueEnum;

/// Enumeration of the states the in-game screen can be in.
///
/// This enumeration holds information about what the player is currently looking at. It is used to
/// determine which overlay to render and which keys are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Maze being played.
    ///
    /// This variant represents the screen where the player walks the maze towards the goal.
    InGame,
    /// Level finished, waiting for the player to continue.
    ///
    /// This variant represents the popup shown over the maze once the goal has been reached.
    LevelComplete,
    /// Session over, waiting for a restart.
    ///
    /// This variant represents the popup shown once the time-trial countdown has run out.
    GameOver,
}

/// Difficulty tiers for maze generation.
///
/// Each tier maps to a default wall probability. The probability is only a default: the command
/// line can override it independently of the tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    /// Sparse walls, one in five cells.
    Easy,
    /// Three in ten cells are walls.
    #[default]
    Medium,
    /// Four in ten cells are walls.
    Hard,
    /// Half of the cells are walls.
    Expert,
}

impl Difficulty {
    /// Returns the default wall probability for this tier.
    #[must_use]
    pub const fn wall_probability(self) -> f64 {
        match self {
            Self::Easy => 0.2,
            Self::Medium => 0.3,
            Self::Hard => 0.4,
            Self::Expert => 0.5,
        }
    }

    /// Returns the following tier, wrapping from the hardest back to the easiest.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Expert,
            Self::Expert => Self::Easy,
        }
    }

    /// Returns the countdown a time-trial session starts with at this tier.
    #[must_use]
    pub const fn time_limit(self) -> Duration {
        match self {
            Self::Easy => Duration::from_secs(120),
            Self::Medium => Duration::from_secs(90),
            Self::Hard => Duration::from_secs(60),
            Self::Expert => Duration::from_secs(30),
        }
    }

    /// Returns the display name of the tier.
    ///
    /// This function provides the label used in the status bar of the in-game screen.
    #[must_use]
    pub const fn repr(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Expert => "Expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.repr())
    }
}

/// Rules a session is played under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum GameMode {
    /// Untimed levels, one after the other.
    #[default]
    Classic,
    /// Levels against a single countdown picked by the difficulty tier.
    TimeTrial,
}

impl GameMode {
    /// Returns the display name of the mode.
    #[must_use]
    pub const fn repr(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::TimeTrial => "Time trial",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.repr())
    }
}

/// Single-step movement direction on the grid.
///
/// The y axis grows downwards, so [`Direction::Down`] increases the row index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards row zero.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column zero.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Returns the `(dx, dy)` delta of this direction.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Result of asking the game to move the player one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The target was out of bounds or a wall; nothing changed except the combo counters.
    Blocked,
    /// The player moved onto a non-goal cell.
    Moved,
    /// The player moved onto the goal and the level is now complete.
    ReachedGoal,
    /// The level is complete or the session is over, so the move was not attempted.
    Ignored,
}

/// Lifecycle of a single maze instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelState {
    /// The maze is playable and the goal has not been reached yet.
    Ready,
    /// The goal has been reached; the next level has not been generated yet.
    Complete,
    /// The time-trial countdown ran out; only a reset starts playing again.
    GameOver,
}
