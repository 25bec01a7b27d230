//! User interface rendering functions for the in-game screen.

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Clear,
    },
    Frame,
};

use crate::{grid::Position, types::Screen, App};

/// Key help shown under the status line.
const KEY_HELP: &str = "(hjkl) move / (?) hint / (r) new / (d) difficulty / (+-) size / (q) quit";

/// Updates the application UI based on the persistent state.
///
/// This function renders the maze and the status bar, then the level-complete popup on top when
/// the goal has been reached or the game-over popup once time is up.
///
/// # Errors
///
/// This function may return errors from drawing operations or data conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    in_game(app, frame)?;

    match app.screen {
        Screen::InGame => {}
        Screen::LevelComplete => level_complete(app, frame),
        Screen::GameOver => game_over(app, frame),
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Returns a rectangle of the given size centered inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);

    area
}

/// Transforms maze coordinates to screen coordinates for canvas rendering.
///
/// This function converts maze coordinates (col, row) to canvas coordinates (x, y) using the
/// standard transformation formulas: coordinate[i] = (n - 1) / 2 - i for rows (ascending order) and
/// coordinate[i] = i - (n - 1) / 2 for columns (descending order).
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations.
pub(crate) fn transform_maze_to_screen_coords(
    maze_coords: &[Position],
    columns: usize,
    rows: usize,
) -> Result<Vec<(f64, f64)>> {
    let rows_n = f64::from(u16::try_from(rows)?);
    let cols_n = f64::from(u16::try_from(columns)?);

    maze_coords
        .iter()
        .map(|pos| {
            // Row transformation: coordinate[i] = (n - 1) / 2 - i
            let screen_y = (rows_n - 1.) / 2. - f64::from(u16::try_from(pos.y)?);

            // Column transformation: coordinate[i] = i - (n - 1) / 2
            let screen_x = f64::from(u16::try_from(pos.x)?) - (cols_n - 1.) / 2.;

            Ok((screen_x, screen_y))
        })
        .collect()
}

/// Renders the in-game screen with the maze, the hint and the status bar.
///
/// This function draws the walls, the revealed part of the hint route, the goal and the player on
/// a [`Canvas`] centered in the frame, with a bordered status bar below it.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations or layout lookups.
pub(crate) fn in_game(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let maze = app.game.maze();
    let maze_columns = u16::try_from(maze.width())?;
    let maze_rows = u16::try_from(maze.height())?;

    // Create overall layout: maze area + status bar at bottom
    let overall_layout = Layout::vertical([
        Constraint::Min(1),    // Maze and padding area
        Constraint::Length(4), // Status block
    ])
    .split(frame.area());

    let maze_content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get maze content area from layout")?;
    let status_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    let space = centered(maze_content_area, maze_columns, maze_rows);

    let wall_coords = transform_maze_to_screen_coords(
        &maze.grid().walls(),
        maze.width(),
        maze.height(),
    )?;
    let hint_coords = transform_maze_to_screen_coords(
        app.animation_manager.visible(),
        maze.width(),
        maze.height(),
    )?;
    let goal_coords =
        transform_maze_to_screen_coords(&[maze.goal()], maze.width(), maze.height())?;
    let player_coords =
        transform_maze_to_screen_coords(&[maze.player()], maze.width(), maze.height())?;
    let player_color = if maze.wall_pass() {
        Color::Magenta
    } else {
        Color::White
    };

    let canvas = Canvas::default()
        .x_bounds([
            (-rounded_div::i32(space.width.into(), 2)).into(),
            (rounded_div::i32(space.width.into(), 2)).into(),
        ])
        .y_bounds([
            (-rounded_div::i32(space.height.into(), 2)).into(),
            (rounded_div::i32(space.height.into(), 2)).into(),
        ])
        .marker(Marker::Block)
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &wall_coords,
                color: Color::Green,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &hint_coords,
                color: Color::Yellow,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &goal_coords,
                color: Color::Red,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &player_coords,
                color: player_color,
            });
        });

    frame.render_widget(canvas, space);

    status_bar(app, frame, status_area);

    Ok(())
}

/// Renders the bordered status bar with the score counters and the key help.
fn status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let score = app.game.score();
    let settings = app.game.settings();

    let block = Block::bordered()
        .title(format!("Level {}", app.game.level()))
        .title_bottom(KEY_HELP)
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [counters, modifiers] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

    let counters_line = Line::raw(format!(
        "Score {}  Combo {}  Streak {}  Moves {}",
        score.points, score.combo, score.streak, score.moves
    ))
    .centered();
    let clock = app
        .game
        .remaining_time()
        .map_or_else(String::new, |remaining| {
            format!("  Time {}s", remaining.as_secs())
        });
    let modifiers_line = Line::raw(format!(
        "{}  {} {}x{}  wall-pass {}{}{clock}",
        settings.mode,
        settings.difficulty,
        settings.width,
        settings.height,
        if app.game.maze().wall_pass() { "on" } else { "off" },
        if app.game.used_fallback() { "  (fallback maze)" } else { "" },
    ))
    .centered();

    frame.render_widget(counters_line, counters);
    frame.render_widget(modifiers_line, modifiers);
}

/// Renders the popup shown once the goal has been reached.
fn level_complete(app: &App, frame: &mut Frame) {
    popup(
        app,
        frame,
        format!("Level {} complete", app.game.level()),
        "(n) next level / (q) quit",
        Color::Green,
    );
}

/// Renders the popup shown once the time-trial countdown has run out.
fn game_over(app: &App, frame: &mut Frame) {
    popup(
        app,
        frame,
        format!("Time is up on level {}", app.game.level()),
        "(r) new game / (q) quit",
        Color::Red,
    );
}

/// Renders a centered popup with the score summary.
fn popup(app: &App, frame: &mut Frame, title: String, keys: &'static str, background: Color) {
    let area = centered(frame.area(), 36, 5);

    let block = Block::bordered()
        .title(title)
        .title_bottom(keys)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::White).bg(background))
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let [line_area] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(inner);
    let line = Line::raw(format!(
        "Score {}  Levels {}",
        app.game.score().points,
        app.game.score().levels_completed
    ))
    .centered();

    frame.render_widget(line, line_area);
}
