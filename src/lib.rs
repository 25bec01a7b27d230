//! Terminal maze game with procedurally generated, always-solvable levels.
//!
//! The library holds the whole game: [`grid`] models the cells, [`generator`] fills a grid with
//! random walls until its corners are connected, [`maze`] tracks the player and validates moves,
//! and [`game`] layers levels and scoring on top. The terminal front-end used by the binary is
//! exposed through [`App`].

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
pub mod config;
mod events;
pub mod game;
pub mod generator;
pub mod grid;
pub mod logging;
pub mod maze;
pub mod pathfinding;
pub mod random;
pub mod types;
mod ui;

pub use app::App;
pub use config::Config;
pub use game::{Game, GameSettings, Score, Stats};
pub use generator::MazeGenerator;
pub use grid::{Cell, Grid, Position};
pub use maze::Maze;
pub use random::RandomSource;
