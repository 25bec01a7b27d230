//! Event handling functions for user input and application state updates.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use log::debug;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{
    config::MAX_DIMENSION,
    types::{Direction, MoveOutcome, Screen},
    App,
};

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to [`handle_key`]. It uses a
/// timeout to avoid blocking the UI so the hint animation and the game clocks keep running.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code)?;
            }
        }
    }

    let now = Instant::now();
    handle_tick(app, now.duration_since(app.last_tick));
    app.last_tick = now;
    app.animation_manager.update();

    Ok(())
}

/// Advances the game clocks and shows the game-over popup once time runs out.
pub(crate) fn handle_tick(app: &mut App, elapsed: Duration) {
    app.game.tick(elapsed);
    app.sync_screen();
}

/// Dispatches a single key press.
///
/// Movement uses `h`/`j`/`k`/`l` or the arrow keys. The remaining keys are `n` for the next
/// level, `r` for a new maze (a new game once time is up), `d` to cycle the difficulty, `+`/`-`
/// to resize, `w` to toggle wall-pass, `?` to toggle the route hint and `q` to quit.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Char('q') => app.exit = true,
        KeyCode::Char('h') | KeyCode::Left => handle_move(app, Direction::Left),
        KeyCode::Char('j') | KeyCode::Down => handle_move(app, Direction::Down),
        KeyCode::Char('k') | KeyCode::Up => handle_move(app, Direction::Up),
        KeyCode::Char('l') | KeyCode::Right => handle_move(app, Direction::Right),
        KeyCode::Char('n') => handle_next_level(app)?,
        KeyCode::Char('r') => {
            if app.screen == Screen::GameOver {
                app.game.reset()?;
            } else {
                app.game.regenerate()?;
            }
            app.sync_screen();
            app.refresh_hint();
        }
        KeyCode::Char('d') => {
            let difficulty = app.game.settings().difficulty.next();
            app.game.set_difficulty(difficulty)?;
            app.sync_screen();
            app.refresh_hint();
        }
        KeyCode::Char('+') => handle_resize(app, 1)?,
        KeyCode::Char('-') => handle_resize(app, -1)?,
        KeyCode::Char('w') => {
            let enabled = app.game.toggle_wall_pass();
            debug!("wall-pass {}", if enabled { "enabled" } else { "disabled" });
        }
        KeyCode::Char('?') => {
            if app.animation_manager.is_active() {
                app.animation_manager.clear();
            } else {
                app.show_hint();
            }
        }
        _ => {}
    }

    Ok(())
}

/// Moves the player and switches to the level-complete popup when the goal is reached.
fn handle_move(app: &mut App, direction: Direction) {
    if app.game.move_player(direction) == MoveOutcome::Moved {
        app.refresh_hint();
    }

    app.sync_screen();
}

/// Advances to the next level from the level-complete popup.
fn handle_next_level(app: &mut App) -> Result<()> {
    if app.screen == Screen::LevelComplete {
        app.game.next_level()?;
        app.sync_screen();
    }

    Ok(())
}

/// Grows or shrinks both maze dimensions by `step`, staying within `1..=MAX_DIMENSION`.
fn handle_resize(app: &mut App, step: isize) -> Result<()> {
    let settings = app.game.settings();
    let clamp = |value: usize| {
        value
            .checked_add_signed(step)
            .unwrap_or(1)
            .clamp(1, usize::from(MAX_DIMENSION))
    };
    let (width, height) = (clamp(settings.width), clamp(settings.height));

    if (width, height) != (settings.width, settings.height) {
        app.game.resize(width, height)?;
        app.sync_screen();
        app.refresh_hint();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        grid::Position,
        types::{Difficulty, GameMode, LevelState},
    };

    /// Builds an app whose mazes have no walls.
    fn open_app(size: u16) -> App {
        let config = Config {
            width: size,
            height: size,
            wall_probability: Some(0.0),
            seed: Some(3),
            ..Config::default()
        };

        App::new(&config).expect("Failed to create app")
    }

    #[test]
    fn test_quit_key() {
        let mut app = open_app(3);

        handle_key(&mut app, KeyCode::Char('q')).expect("Failed to handle key");

        assert!(app.exit);
    }

    #[test]
    fn test_movement_keys() {
        let mut app = open_app(3);

        handle_key(&mut app, KeyCode::Char('l')).expect("Failed to handle key");
        handle_key(&mut app, KeyCode::Down).expect("Failed to handle key");
        assert_eq!(app.game.maze().player(), Position::new(1, 1));

        handle_key(&mut app, KeyCode::Char('h')).expect("Failed to handle key");
        handle_key(&mut app, KeyCode::Char('k')).expect("Failed to handle key");
        assert_eq!(app.game.maze().player(), Position::new(0, 0));

        handle_key(&mut app, KeyCode::Left).expect("Failed to handle key");
        assert_eq!(app.game.maze().player(), Position::new(0, 0));
    }

    #[test]
    fn test_reaching_goal_shows_popup_and_next_level() {
        let mut app = open_app(2);

        handle_key(&mut app, KeyCode::Char('n')).expect("Failed to handle key");
        assert_eq!(app.game.level(), 1);

        handle_key(&mut app, KeyCode::Right).expect("Failed to handle key");
        handle_key(&mut app, KeyCode::Down).expect("Failed to handle key");
        assert_eq!(app.screen, Screen::LevelComplete);
        assert_eq!(app.game.state(), LevelState::Complete);

        handle_key(&mut app, KeyCode::Char('n')).expect("Failed to handle key");
        assert_eq!(app.screen, Screen::InGame);
        assert_eq!(app.game.level(), 2);
        assert_eq!(app.game.maze().player(), Position::new(0, 0));
    }

    #[test]
    fn test_hint_toggle_and_refresh() {
        let mut app = open_app(4);

        handle_key(&mut app, KeyCode::Char('?')).expect("Failed to handle key");
        assert_eq!(app.animation_manager.route.len(), 7);

        handle_key(&mut app, KeyCode::Right).expect("Failed to handle key");
        assert_eq!(app.animation_manager.route.first(), Some(&Position::new(1, 0)));
        assert_eq!(app.animation_manager.route.len(), 6);

        handle_key(&mut app, KeyCode::Char('?')).expect("Failed to handle key");
        assert!(!app.animation_manager.is_active());
    }

    #[test]
    fn test_difficulty_key_cycles() {
        let mut app = open_app(3);

        handle_key(&mut app, KeyCode::Char('d')).expect("Failed to handle key");

        assert_eq!(app.game.settings().difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_resize_keys_clamp() {
        let mut app = open_app(1);

        handle_key(&mut app, KeyCode::Char('-')).expect("Failed to handle key");
        assert_eq!(app.game.maze().width(), 1);

        handle_key(&mut app, KeyCode::Char('+')).expect("Failed to handle key");
        assert_eq!(app.game.maze().width(), 2);
        assert_eq!(app.game.maze().height(), 2);

        let mut app = open_app(MAX_DIMENSION);
        handle_key(&mut app, KeyCode::Char('+')).expect("Failed to handle key");
        assert_eq!(app.game.maze().width(), usize::from(MAX_DIMENSION));
    }

    #[test]
    fn test_wall_pass_key() {
        let mut app = open_app(3);

        handle_key(&mut app, KeyCode::Char('w')).expect("Failed to handle key");
        assert!(app.game.maze().wall_pass());

        handle_key(&mut app, KeyCode::Char('w')).expect("Failed to handle key");
        assert!(!app.game.maze().wall_pass());
    }

    #[test]
    fn test_regenerate_key_resets_player() {
        let mut app = open_app(3);
        handle_key(&mut app, KeyCode::Right).expect("Failed to handle key");

        handle_key(&mut app, KeyCode::Char('r')).expect("Failed to handle key");

        assert_eq!(app.game.maze().player(), Position::new(0, 0));
        assert_eq!(app.game.score().moves, 0);
    }

    #[test]
    fn test_shrinking_to_single_cell_completes_level() {
        let mut app = open_app(2);

        handle_key(&mut app, KeyCode::Char('-')).expect("Failed to handle key");
        assert_eq!(app.screen, Screen::LevelComplete);
        assert_eq!(app.game.score().levels_completed, 1);

        handle_key(&mut app, KeyCode::Char('n')).expect("Failed to handle key");
        assert_eq!(app.game.level(), 2);
        assert_eq!(app.screen, Screen::LevelComplete);
    }

    #[test]
    fn test_time_up_shows_game_over_and_restarts() {
        let config = Config {
            width: 4,
            height: 4,
            mode: GameMode::TimeTrial,
            wall_probability: Some(0.0),
            seed: Some(3),
            ..Config::default()
        };
        let mut app = App::new(&config).expect("Failed to create app");
        handle_key(&mut app, KeyCode::Char('?')).expect("Failed to handle key");

        handle_tick(&mut app, Duration::from_secs(89));
        assert_eq!(app.screen, Screen::InGame);

        handle_tick(&mut app, Duration::from_secs(1));
        assert_eq!(app.screen, Screen::GameOver);
        assert!(!app.animation_manager.is_active());

        handle_key(&mut app, KeyCode::Right).expect("Failed to handle key");
        handle_key(&mut app, KeyCode::Char('n')).expect("Failed to handle key");
        assert_eq!(app.game.maze().player(), Position::new(0, 0));
        assert_eq!(app.screen, Screen::GameOver);

        handle_key(&mut app, KeyCode::Char('r')).expect("Failed to handle key");
        assert_eq!(app.screen, Screen::InGame);
        assert_eq!(app.game.remaining_time(), Some(Duration::from_secs(90)));
        assert_eq!(app.game.stats().games_played, 2);
    }
}
