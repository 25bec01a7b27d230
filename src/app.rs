//! Core application state and logic for the maze game.

use std::time::Instant;

use color_eyre::eyre::Result;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;

use crate::{
    config::Config,
    events,
    game::Game,
    generator::MazeGenerator,
    pathfinding::{self, AnimationManager},
    random,
    types::{LevelState, Screen},
    ui,
};

/// Application state container for the maze game.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the game and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit the game but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    ///
    /// This field holds whether the maze is being played or the level-complete popup is shown.
    pub(crate) screen: Screen,
    /// Game session being played.
    ///
    /// This field holds the maze, the level number and the score. It is the only owner of the
    /// grid; the interface reads it between input events.
    pub(crate) game: Game<StdRng>,
    /// Animation manager for the route hint.
    ///
    /// This field manages the hint animation including timing and the route from the player to
    /// the goal that is being revealed.
    pub(crate) animation_manager: AnimationManager,
    /// Instant the game clocks were last advanced.
    pub(crate) last_tick: Instant,
}

impl App {
    /// Creates a new instance of the App structure from the command line configuration.
    ///
    /// # Errors
    ///
    /// This function returns an error if the configuration is invalid.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let generator = MazeGenerator::new(random::standard_source(config.seed))
            .with_max_attempts(config.max_attempts.get());

        let mut app = Self {
            exit: false,
            screen: Screen::InGame,
            game: Game::new(generator, config.settings())?,
            animation_manager: AnimationManager::new(),
            last_tick: Instant::now(),
        };
        app.sync_screen();

        Ok(app)
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame)
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))
            })?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Shows the screen matching the state of the game.
    ///
    /// The hint is dropped once the level is no longer being played.
    pub(crate) fn sync_screen(&mut self) {
        self.screen = match self.game.state() {
            LevelState::Ready => Screen::InGame,
            LevelState::Complete => Screen::LevelComplete,
            LevelState::GameOver => Screen::GameOver,
        };

        if self.screen != Screen::InGame {
            self.animation_manager.clear();
        }
    }

    /// Recomputes the hint route from the player's current position.
    ///
    /// Does nothing unless a hint is being shown.
    pub(crate) fn refresh_hint(&mut self) {
        if !self.animation_manager.is_active() {
            return;
        }

        self.show_hint();
    }

    /// Starts revealing the shortest route from the player to the goal.
    pub(crate) fn show_hint(&mut self) {
        let maze = self.game.maze();
        match pathfinding::shortest_path(maze.grid(), maze.player(), maze.goal()) {
            Some(route) => self.animation_manager.start(route),
            None => self.animation_manager.clear(),
        }
    }
}
