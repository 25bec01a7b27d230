//! Level progression and scoring on top of the maze generator.
//!
//! This module contains [`Game`], the single owner of the current [`Maze`]. It regenerates the
//! maze when a level completes, when the player asks for a new one, and when the dimensions or the
//! difficulty change, and it keeps the score, combo and streak counters. In time-trial mode it also
//! runs the session countdown.

use std::time::Duration;

use color_eyre::eyre::Result;
use log::info;

use crate::{
    generator::MazeGenerator,
    grid::Grid,
    maze::Maze,
    random::RandomSource,
    types::{Difficulty, Direction, GameMode, LevelState, MoveOutcome},
};

/// Points awarded for every successful step.
const STEP_POINTS: u64 = 10;
/// Extra points per step of the current combo.
const COMBO_STEP_POINTS: u64 = 5;
/// Extra points per step of the current streak.
const STREAK_STEP_POINTS: u64 = 2;
/// Points per level number awarded on completion.
const LEVEL_POINTS: u64 = 100;
/// Points per combo step awarded on completion.
const COMBO_LEVEL_POINTS: u64 = 50;
/// Time bonus for a level finished instantly.
const TIME_BONUS_POINTS: u64 = 1000;
/// Time bonus lost per second spent on a level.
const TIME_BONUS_DECAY: u64 = 10;

/// Maze parameters chosen by the player.
#[derive(Clone, Copy, Debug, PartialEq)]
#[expect(
    clippy::module_name_repetitions,
    reason = "The settings are re-exported at the crate root, where the prefix is needed."
)]
pub struct GameSettings {
    /// Number of columns of each maze.
    pub width: usize,
    /// Number of rows of each maze.
    pub height: usize,
    /// Difficulty tier, which picks the default wall probability and the time-trial countdown.
    pub difficulty: Difficulty,
    /// Explicit wall probability overriding the tier default.
    pub wall_probability: Option<f64>,
    /// Rules the session is played under.
    pub mode: GameMode,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            width: 12,
            height: 12,
            difficulty: Difficulty::default(),
            wall_probability: None,
            mode: GameMode::default(),
        }
    }
}

impl GameSettings {
    /// Returns the wall probability in effect: the override if any, else the tier default.
    #[must_use]
    pub fn wall_probability(&self) -> f64 {
        self.wall_probability
            .unwrap_or_else(|| self.difficulty.wall_probability())
    }

    /// Returns the countdown a new session starts with, or `None` for untimed modes.
    #[must_use]
    pub const fn time_limit(&self) -> Option<Duration> {
        match self.mode {
            GameMode::Classic => None,
            GameMode::TimeTrial => Some(self.difficulty.time_limit()),
        }
    }
}

/// Counters accumulated while playing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    /// Total points.
    pub points: u64,
    /// Consecutive successful steps in the current level.
    pub combo: u64,
    /// Consecutive successful steps across levels.
    pub streak: u64,
    /// Successful steps in the current level.
    pub moves: u64,
    /// Levels finished since the last reset.
    pub levels_completed: u64,
}

/// Counters kept across resets for the lifetime of the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Sessions started, including the first one.
    pub games_played: u64,
    /// Successful steps over every session.
    pub total_moves: u64,
}

/// Game session: current maze, level number, state and score.
pub struct Game<R> {
    /// Generator used for every new maze.
    generator: MazeGenerator<R>,
    /// Parameters of the mazes being generated.
    settings: GameSettings,
    /// Maze currently being played.
    maze: Maze,
    /// One-based level number.
    level: u64,
    /// Whether the current maze is being played, solved, or the session is over.
    state: LevelState,
    /// Accumulated counters.
    score: Score,
    /// Lifetime counters.
    stats: Stats,
    /// Time spent playing the current maze.
    level_elapsed: Duration,
    /// Time left in a time-trial session.
    remaining: Option<Duration>,
}

impl<R: RandomSource> Game<R> {
    /// Starts a session at level one with a freshly generated maze.
    ///
    /// A maze whose start is already the goal counts as completed straight away.
    ///
    /// # Errors
    ///
    /// This function returns an error if the settings describe an invalid maze.
    pub fn new(mut generator: MazeGenerator<R>, settings: GameSettings) -> Result<Self> {
        let grid = generator.generate(
            settings.width,
            settings.height,
            settings.wall_probability(),
        )?;

        let mut game = Self {
            generator,
            settings,
            maze: Maze::new(grid),
            level: 1,
            state: LevelState::Ready,
            score: Score::default(),
            stats: Stats {
                games_played: 1,
                total_moves: 0,
            },
            level_elapsed: Duration::ZERO,
            remaining: settings.time_limit(),
        };
        game.settle();

        Ok(game)
    }

    /// Returns the maze being played.
    pub const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Returns the current settings.
    pub const fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Returns the one-based level number.
    pub const fn level(&self) -> u64 {
        self.level
    }

    /// Returns whether the current level is being played, solved, or the session is over.
    pub const fn state(&self) -> LevelState {
        self.state
    }

    /// Returns the accumulated counters.
    pub const fn score(&self) -> &Score {
        &self.score
    }

    /// Returns the counters kept across resets.
    pub const fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Returns the time left in a time-trial session, or `None` for untimed modes.
    pub const fn remaining_time(&self) -> Option<Duration> {
        self.remaining
    }

    /// Returns whether the last maze had to use the serpentine fallback.
    pub const fn used_fallback(&self) -> bool {
        self.generator.last_fallback()
    }

    /// Moves the player one step and updates the score.
    ///
    /// A successful step earns points based on the combo and streak so far and extends both. A
    /// blocked step resets them. Landing on the goal completes the level and awards the level
    /// bonus. Moves are ignored unless the level is being played.
    pub fn move_player(&mut self, direction: Direction) -> MoveOutcome {
        if self.state != LevelState::Ready {
            return MoveOutcome::Ignored;
        }

        let (dx, dy) = direction.delta();
        if !self.maze.move_player(dx, dy) {
            self.score.combo = 0;
            self.score.streak = 0;
            return MoveOutcome::Blocked;
        }

        self.score.moves += 1;
        self.stats.total_moves += 1;
        self.score.points += STEP_POINTS
            + self.score.combo * COMBO_STEP_POINTS
            + self.score.streak * STREAK_STEP_POINTS;
        self.score.combo += 1;
        self.score.streak += 1;

        if self.maze.is_at_goal() {
            self.complete_level();
            MoveOutcome::ReachedGoal
        } else {
            MoveOutcome::Moved
        }
    }

    /// Advances the clocks by `elapsed`.
    ///
    /// Time only runs while a level is being played. In time-trial mode the countdown shrinks and
    /// the session is over once it reaches zero.
    pub fn tick(&mut self, elapsed: Duration) {
        if self.state != LevelState::Ready {
            return;
        }

        self.level_elapsed = self.level_elapsed.saturating_add(elapsed);

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(elapsed);
            if remaining.is_zero() {
                self.state = LevelState::GameOver;
                info!(
                    "time is up on level {}, score {}",
                    self.level, self.score.points
                );
            }
        }
    }

    /// Returns the bonus for finishing the current level now.
    const fn time_bonus(&self) -> u64 {
        let decay = self.level_elapsed.as_secs().saturating_mul(TIME_BONUS_DECAY);

        TIME_BONUS_POINTS.saturating_sub(decay)
    }

    /// Marks the level complete and awards the completion bonus.
    fn complete_level(&mut self) {
        self.state = LevelState::Complete;
        self.score.points += self.level * LEVEL_POINTS
            + self.score.combo * COMBO_LEVEL_POINTS
            + self.time_bonus();
        self.score.levels_completed += 1;

        info!(
            "level {} complete in {} moves, score {}",
            self.level, self.score.moves, self.score.points
        );
    }

    /// Completes a freshly built maze whose start is already the goal.
    fn settle(&mut self) {
        if self.state == LevelState::Ready && self.maze.is_at_goal() {
            self.complete_level();
        }
    }

    /// Generates a grid for the current settings.
    fn generate(&mut self) -> Result<Grid> {
        self.generator.generate(
            self.settings.width,
            self.settings.height,
            self.settings.wall_probability(),
        )
    }

    /// Installs `grid` as the maze being played.
    ///
    /// The player goes back to the start and the per-level counters are reset. The wall-pass
    /// modifier carries over, and a session that is over stays over.
    fn install(&mut self, grid: Grid) {
        let wall_pass = self.maze.wall_pass();

        self.maze = Maze::new(grid);
        self.maze.set_wall_pass(wall_pass);
        self.score.combo = 0;
        self.score.moves = 0;
        self.level_elapsed = Duration::ZERO;

        if self.state != LevelState::GameOver {
            self.state = LevelState::Ready;
            self.settle();
        }
    }

    /// Advances to the next level with a new maze.
    ///
    /// Does nothing unless the current level is complete.
    ///
    /// # Errors
    ///
    /// This function returns an error if the maze cannot be regenerated; the level is left as is.
    pub fn next_level(&mut self) -> Result<()> {
        if self.state != LevelState::Complete {
            return Ok(());
        }

        let grid = self.generate()?;
        self.level += 1;
        info!("starting level {}", self.level);
        self.install(grid);

        Ok(())
    }

    /// Replaces the current maze with a new one for the same level.
    ///
    /// The player goes back to the start and the per-level counters are reset. The wall-pass
    /// modifier carries over.
    ///
    /// # Errors
    ///
    /// This function returns an error if the maze cannot be regenerated.
    pub fn regenerate(&mut self) -> Result<()> {
        let grid = self.generate()?;
        self.install(grid);

        Ok(())
    }

    /// Changes the maze dimensions and regenerates.
    ///
    /// # Errors
    ///
    /// This function returns an error if a dimension is zero; the previous maze is kept.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        let previous = self.settings;
        self.settings.width = width;
        self.settings.height = height;

        if let Err(err) = self.regenerate() {
            self.settings = previous;
            return Err(err);
        }
        info!("resized maze to {width}x{height}");

        Ok(())
    }

    /// Changes the difficulty tier and regenerates.
    ///
    /// An explicit wall probability, if one was configured, keeps taking precedence. A running
    /// countdown keeps its time; the new tier's limit applies from the next reset.
    ///
    /// # Errors
    ///
    /// This function returns an error if the maze cannot be regenerated.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        self.settings.difficulty = difficulty;
        info!("difficulty set to {difficulty}");

        self.regenerate()
    }

    /// Flips the wall-pass modifier and returns its new state.
    pub fn toggle_wall_pass(&mut self) -> bool {
        let enabled = !self.maze.wall_pass();
        self.maze.set_wall_pass(enabled);

        enabled
    }

    /// Starts a new session from level one with a zeroed score and a full countdown.
    ///
    /// # Errors
    ///
    /// This function returns an error if the maze cannot be regenerated.
    pub fn reset(&mut self) -> Result<()> {
        let grid = self.generate()?;

        self.level = 1;
        self.score = Score::default();
        self.stats.games_played += 1;
        self.remaining = self.settings.time_limit();
        self.state = LevelState::Ready;
        self.maze.set_wall_pass(false);
        self.install(grid);
        info!("starting {} game {}", self.settings.mode, self.stats.games_played);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid::Position, random::testing::ScriptedSource};

    /// Builds a game whose every maze is fully open.
    fn open_game(width: usize, height: usize) -> Game<ScriptedSource> {
        timed_game(width, height, GameMode::Classic)
    }

    /// Builds an open-maze game at the hardest tier under the given rules.
    fn timed_game(width: usize, height: usize, mode: GameMode) -> Game<ScriptedSource> {
        let settings = GameSettings {
            width,
            height,
            difficulty: Difficulty::Expert,
            wall_probability: None,
            mode,
        };

        Game::new(MazeGenerator::new(ScriptedSource::constant(0.99)), settings)
            .expect("Failed to start game")
    }

    /// Walks an open 2x2 maze from the start to the goal.
    fn finish_two_by_two(game: &mut Game<ScriptedSource>) {
        assert_eq!(game.move_player(Direction::Right), MoveOutcome::Moved);
        assert_eq!(game.move_player(Direction::Down), MoveOutcome::ReachedGoal);
    }

    #[test]
    fn test_settings_wall_probability() {
        let mut settings = GameSettings {
            difficulty: Difficulty::Hard,
            ..GameSettings::default()
        };
        assert!((settings.wall_probability() - 0.4).abs() < f64::EPSILON);

        settings.wall_probability = Some(0.15);
        assert!((settings.wall_probability() - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_game_starts_ready() {
        let game = open_game(4, 4);

        assert_eq!(game.level(), 1);
        assert_eq!(game.state(), LevelState::Ready);
        assert_eq!(*game.score(), Score::default());
        assert_eq!(game.maze().player(), Position::new(0, 0));
        assert_eq!(game.maze().goal(), Position::new(3, 3));
        assert!(!game.used_fallback());
    }

    #[test]
    fn test_new_game_rejects_invalid_settings() {
        let settings = GameSettings {
            width: 0,
            ..GameSettings::default()
        };

        assert!(Game::new(MazeGenerator::new(ScriptedSource::constant(0.99)), settings).is_err());
    }

    #[test]
    fn test_step_scoring() {
        let mut game = open_game(5, 5);

        assert_eq!(game.move_player(Direction::Right), MoveOutcome::Moved);
        assert_eq!(game.score().points, 10);
        assert_eq!(game.move_player(Direction::Right), MoveOutcome::Moved);
        assert_eq!(game.score().points, 10 + 17);
        assert_eq!(game.score().combo, 2);
        assert_eq!(game.score().streak, 2);
        assert_eq!(game.score().moves, 2);
    }

    #[test]
    fn test_blocked_move_resets_combo_and_streak() {
        let mut game = open_game(3, 3);

        assert_eq!(game.move_player(Direction::Right), MoveOutcome::Moved);
        assert_eq!(game.move_player(Direction::Up), MoveOutcome::Blocked);

        assert_eq!(game.maze().player(), Position::new(1, 0));
        assert_eq!(game.score().combo, 0);
        assert_eq!(game.score().streak, 0);
        assert_eq!(game.score().moves, 1);
        assert_eq!(game.score().points, 10);
    }

    #[test]
    fn test_reaching_goal_completes_level() {
        let mut game = open_game(2, 2);

        assert_eq!(game.move_player(Direction::Right), MoveOutcome::Moved);
        assert_eq!(game.move_player(Direction::Down), MoveOutcome::ReachedGoal);

        assert_eq!(game.state(), LevelState::Complete);
        assert!(game.maze().is_at_goal());
        // 10 + 17 for the steps, 100 for level one, 2 * 50 for the combo, 1000 as time bonus
        assert_eq!(game.score().points, 1227);
        assert_eq!(game.score().levels_completed, 1);
        assert_eq!(game.move_player(Direction::Left), MoveOutcome::Ignored);
    }

    #[test]
    fn test_next_level_regenerates() {
        let mut game = open_game(2, 2);
        let _ = game.move_player(Direction::Right);
        let _ = game.move_player(Direction::Down);

        game.next_level().expect("Failed to advance level");

        assert_eq!(game.level(), 2);
        assert_eq!(game.state(), LevelState::Ready);
        assert_eq!(game.maze().player(), Position::new(0, 0));
        assert_eq!(game.score().combo, 0);
        assert_eq!(game.score().moves, 0);
        assert_eq!(game.score().streak, 2);
    }

    #[test]
    fn test_next_level_requires_completion() {
        let mut game = open_game(3, 3);

        game.next_level().expect("Advancing early should be a no-op");

        assert_eq!(game.level(), 1);
    }

    #[test]
    fn test_resize_regenerates_with_new_dimensions() {
        let mut game = open_game(3, 3);
        let _ = game.move_player(Direction::Down);

        game.resize(6, 4).expect("Failed to resize");

        assert_eq!(game.maze().width(), 6);
        assert_eq!(game.maze().height(), 4);
        assert_eq!(game.maze().goal(), Position::new(5, 3));
        assert_eq!(game.maze().player(), Position::new(0, 0));
    }

    #[test]
    fn test_resize_rejects_zero_and_keeps_maze() {
        let mut game = open_game(3, 3);

        assert!(game.resize(0, 3).is_err());

        assert_eq!(game.settings().width, 3);
        assert_eq!(game.maze().width(), 3);
    }

    #[test]
    fn test_set_difficulty_updates_probability() {
        let mut game = open_game(3, 3);

        game.set_difficulty(Difficulty::Expert)
            .expect("Failed to set difficulty");

        assert_eq!(game.settings().difficulty, Difficulty::Expert);
        assert!((game.settings().wall_probability() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_toggle_wall_pass_moves_through_walls() {
        let picture = "
            .#.
            ###
            ..#
        ";
        let settings = GameSettings {
            width: 3,
            height: 3,
            ..GameSettings::default()
        };
        // Sealed first attempt, then the same picture falls back to the serpentine layout
        let generator = MazeGenerator::new(ScriptedSource::from_picture(picture)).with_max_attempts(1);
        let mut game = Game::new(generator, settings).expect("Failed to start game");
        assert!(game.used_fallback());
        assert_eq!(game.maze().grid().to_string(), "P..\n##.\n..G");

        assert_eq!(game.move_player(Direction::Down), MoveOutcome::Blocked);
        assert!(game.toggle_wall_pass());
        assert_eq!(game.move_player(Direction::Down), MoveOutcome::Moved);
        assert_eq!(game.maze().player(), Position::new(0, 1));
        assert!(!game.toggle_wall_pass());
    }

    #[test]
    fn test_reset_starts_over() {
        let mut game = open_game(2, 2);
        let _ = game.move_player(Direction::Right);
        let _ = game.move_player(Direction::Down);
        game.next_level().expect("Failed to advance level");
        let _ = game.toggle_wall_pass();

        game.reset().expect("Failed to reset");

        assert_eq!(game.level(), 1);
        assert_eq!(*game.score(), Score::default());
        assert!(!game.maze().wall_pass());
        assert_eq!(game.state(), LevelState::Ready);
    }

    #[test]
    fn test_single_cell_level_completes_immediately() {
        let mut game = open_game(1, 1);

        assert!(game.maze().is_at_goal());
        assert_eq!(game.state(), LevelState::Complete);
        assert_eq!(game.score().levels_completed, 1);
        assert_eq!(game.score().points, 100 + 1000);
        assert_eq!(game.move_player(Direction::Right), MoveOutcome::Ignored);

        game.next_level().expect("Failed to advance level");

        assert_eq!(game.level(), 2);
        assert_eq!(game.state(), LevelState::Complete);
        assert_eq!(game.score().levels_completed, 2);
    }

    #[test]
    fn test_resize_to_single_cell_completes_level() {
        let mut game = open_game(3, 3);

        game.resize(1, 1).expect("Failed to resize");

        assert_eq!(game.state(), LevelState::Complete);
        game.next_level().expect("Failed to advance level");
        assert_eq!(game.level(), 2);
    }

    #[test]
    fn test_next_level_failure_keeps_level() {
        let mut game = open_game(2, 2);
        finish_two_by_two(&mut game);
        game.settings.width = 0;

        assert!(game.next_level().is_err());

        assert_eq!(game.level(), 1);
        assert_eq!(game.state(), LevelState::Complete);
    }

    #[test]
    fn test_classic_mode_has_no_countdown() {
        let mut game = open_game(3, 3);

        game.tick(Duration::from_secs(3600));

        assert_eq!(game.remaining_time(), None);
        assert_eq!(game.state(), LevelState::Ready);
    }

    #[test]
    fn test_time_trial_countdown_expires() {
        let mut game = timed_game(3, 3, GameMode::TimeTrial);
        assert_eq!(game.remaining_time(), Some(Duration::from_secs(30)));

        game.tick(Duration::from_secs(10));
        assert_eq!(game.remaining_time(), Some(Duration::from_secs(20)));
        assert_eq!(game.state(), LevelState::Ready);

        game.tick(Duration::from_secs(25));
        assert_eq!(game.remaining_time(), Some(Duration::ZERO));
        assert_eq!(game.state(), LevelState::GameOver);
        assert_eq!(game.move_player(Direction::Right), MoveOutcome::Ignored);

        game.next_level().expect("Advancing after game over should be a no-op");
        game.regenerate().expect("Failed to regenerate");
        assert_eq!(game.level(), 1);
        assert_eq!(game.state(), LevelState::GameOver);
    }

    #[test]
    fn test_reset_after_game_over_restarts_countdown() {
        let mut game = timed_game(3, 3, GameMode::TimeTrial);
        let _ = game.move_player(Direction::Right);
        game.tick(Duration::from_secs(30));

        game.reset().expect("Failed to reset");

        assert_eq!(game.state(), LevelState::Ready);
        assert_eq!(game.remaining_time(), Some(Duration::from_secs(30)));
        assert_eq!(game.stats().games_played, 2);
        assert_eq!(game.stats().total_moves, 1);
    }

    #[test]
    fn test_countdown_pauses_after_completion() {
        let mut game = timed_game(2, 2, GameMode::TimeTrial);
        finish_two_by_two(&mut game);

        game.tick(Duration::from_secs(60));

        assert_eq!(game.state(), LevelState::Complete);
        assert_eq!(game.remaining_time(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_time_bonus_decays_with_level_time() {
        let mut game = open_game(2, 2);

        game.tick(Duration::from_secs(30));
        finish_two_by_two(&mut game);

        // 27 for the steps, 100 for level one, 100 for the combo, 1000 - 30 * 10
        assert_eq!(game.score().points, 27 + 100 + 100 + 700);
    }

    #[test]
    fn test_stats_survive_reset() {
        let mut game = open_game(2, 2);
        finish_two_by_two(&mut game);
        game.next_level().expect("Failed to advance level");
        let _ = game.move_player(Direction::Down);

        game.reset().expect("Failed to reset");

        assert_eq!(game.stats().games_played, 2);
        assert_eq!(game.stats().total_moves, 3);
        assert_eq!(game.score().moves, 0);
    }
}
