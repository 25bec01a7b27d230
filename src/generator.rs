//! Procedural maze generation module.
//!
//! This module contains [`MazeGenerator`], which fills a grid with randomly placed walls and
//! retries until the top-left and bottom-right corners are connected, falling back to a
//! serpentine layout if the attempts run out.

use color_eyre::eyre::{ensure, Result};
use log::{debug, warn};

use crate::{
    grid::{Cell, Grid, Position},
    pathfinding,
    random::RandomSource,
};

/// Default number of random fills tried before falling back to the serpentine layout.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Random maze generator with a connectivity guarantee.
///
/// Every grid returned by [`generate`](MazeGenerator::generate) has its corners open and joined by
/// a 4-connected route of open cells.
#[expect(
    clippy::module_name_repetitions,
    reason = "The generator is referred to by its full name outside this module."
)]
pub struct MazeGenerator<R> {
    /// Source of the per-cell draws.
    source: R,
    /// Upper bound of random fills per call.
    max_attempts: usize,
    /// Attempts used by the last call.
    last_attempts: usize,
    /// Whether the last call returned the fallback layout.
    last_fallback: bool,
}

impl<R: RandomSource> MazeGenerator<R> {
    /// Builds a generator drawing from the given source with the default attempt limit.
    pub const fn new(source: R) -> Self {
        Self {
            source,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            last_attempts: 0,
            last_fallback: false,
        }
    }

    /// Sets the number of random fills tried before falling back, clamped to at least one.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Returns the configured attempt limit.
    pub const fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns how many random fills the last call to [`generate`](MazeGenerator::generate) made.
    pub const fn last_attempts(&self) -> usize {
        self.last_attempts
    }

    /// Returns whether the last call to [`generate`](MazeGenerator::generate) fell back to the
    /// serpentine layout.
    pub const fn last_fallback(&self) -> bool {
        self.last_fallback
    }

    /// Generates a connected maze.
    ///
    /// Each attempt draws one value per cell in row-major order and turns the cell into a wall when
    /// the value is below `wall_probability`. The corners are then forced open and the attempt is
    /// kept only if they are connected. When every attempt fails the serpentine layout is
    /// returned instead. The returned grid carries the Player and Goal markers on its corners.
    ///
    /// # Errors
    ///
    /// This function returns an error if a dimension is zero or if `wall_probability` is not within
    /// `[0, 1]`.
    pub fn generate(&mut self, width: usize, height: usize, wall_probability: f64) -> Result<Grid> {
        ensure!(
            (0.0..=1.0).contains(&wall_probability),
            "wall probability {wall_probability} is outside [0, 1]"
        );
        let mut grid = Grid::new(width, height)?;
        let (start, end) = (grid.start(), grid.end());

        self.last_fallback = false;
        for attempt in 1..=self.max_attempts {
            self.fill(&mut grid, wall_probability)?;
            grid.set(start, Cell::Open)?;
            grid.set(end, Cell::Open)?;

            if pathfinding::has_path(&grid, start, end) {
                debug!("generated {width}x{height} maze in {attempt} attempt(s)");
                self.last_attempts = attempt;
                grid.refresh_overlay(start, end);
                return Ok(grid);
            }
        }

        warn!(
            "no connected {width}x{height} maze after {} attempts at wall probability \
             {wall_probability}, using serpentine layout",
            self.max_attempts
        );
        self.last_attempts = self.max_attempts;
        self.last_fallback = true;

        let mut grid = serpentine(width, height)?;
        grid.refresh_overlay(start, end);

        Ok(grid)
    }

    /// Resamples every cell of the grid.
    fn fill(&mut self, grid: &mut Grid, wall_probability: f64) -> Result<()> {
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let cell = if self.source.next_unit() < wall_probability {
                    Cell::Wall
                } else {
                    Cell::Open
                };
                grid.set(Position::new(x, y), cell)?;
            }
        }

        Ok(())
    }
}

/// Builds the guaranteed-connected serpentine layout.
///
/// Even rows are fully open. Odd rows are walls except for a single gap, alternating between the
/// right end (rows 1, 5, 9, ...) and the left end (rows 3, 7, 11, ...), so the only route snakes
/// back and forth from the top-left to the bottom row. The bottom-right corner is always open.
///
/// # Errors
///
/// This function returns an error if a dimension is zero.
pub fn serpentine(width: usize, height: usize) -> Result<Grid> {
    let mut grid = Grid::new(width, height)?;

    for y in (1..height).step_by(2) {
        let gap = if (y / 2) % 2 == 0 { width - 1 } else { 0 };
        for x in 0..width {
            if x != gap {
                grid.set(Position::new(x, y), Cell::Wall)?;
            }
        }
    }
    grid.set(grid.end(), Cell::Open)?;

    Ok(grid)
}
