//! Grid data and cell management module.
//!
//! This module contains the [`Grid`] struct and the [`Cell`] and [`Position`] types it is built
//! from, including bounds checks, the Player/Goal overlay and the plain-text form of a grid.

use std::{fmt, str::FromStr};

use color_eyre::eyre::{bail, ensure, eyre, OptionExt as _, Report, Result};

/// State of a single grid position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cell {
    /// Walkable floor.
    #[default]
    Open,
    /// Blocked cell.
    Wall,
    /// Marker for the player's current position.
    Player,
    /// Marker for the goal position.
    Goal,
}

impl Cell {
    /// Returns the character used for this cell in the text form of a grid.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Open => '.',
            Self::Wall => '#',
            Self::Player => 'P',
            Self::Goal => 'G',
        }
    }

    /// Parses a cell from its text-form character.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Self::Open),
            '#' => Some(Self::Wall),
            'P' => Some(Self::Player),
            'G' => Some(Self::Goal),
            _ => None,
        }
    }

    /// Returns whether the cell can be walked on without wall-pass.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Wall)
    }
}

/// Zero-indexed `(x, y)` coordinate on a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Column index.
    pub x: usize,
    /// Row index.
    pub y: usize,
}

impl Position {
    /// Builds a position from a column and a row.
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Applies a signed delta, returning [`None`] if either coordinate would become negative.
    ///
    /// The upper bound is not checked here; that is the grid's job.
    #[must_use]
    pub const fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        let Some(x) = self.x.checked_add_signed(dx) else {
            return None;
        };
        let Some(y) = self.y.checked_add_signed(dy) else {
            return None;
        };

        Some(Self { x, y })
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed-size, row-major array of cells.
///
/// A grid always has at least one row and one column. It is regenerated wholesale rather than
/// patched; the only in-place change after generation is the Player/Goal overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Cells stored row after row.
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds an all-open grid of the given dimensions.
    ///
    /// # Errors
    ///
    /// This function returns an error if either dimension is zero or if the cell count overflows.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        ensure!(width > 0, "grid width must be at least 1");
        ensure!(height > 0, "grid height must be at least 1");
        let len = width
            .checked_mul(height)
            .ok_or_eyre("grid dimensions overflow the cell count")?;

        Ok(Self {
            width,
            height,
            cells: vec![Cell::Open; len],
        })
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the top-left position, where the player starts.
    #[must_use]
    pub const fn start(&self) -> Position {
        Position::new(0, 0)
    }

    /// Returns the bottom-right position, where the goal sits.
    #[must_use]
    pub const fn end(&self) -> Position {
        Position::new(self.width - 1, self.height - 1)
    }

    /// Returns whether the position lies inside the grid.
    #[must_use]
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Maps an in-bounds position to its index in the cell vector.
    const fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y * self.width + pos.x)
        } else {
            None
        }
    }

    /// Returns the cell at the position, or [`None`] if it is out of bounds.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos)
            .and_then(|idx| self.cells.get(idx))
            .copied()
    }

    /// Overwrites the cell at the position.
    ///
    /// # Errors
    ///
    /// This function returns an error if the position is out of bounds.
    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<()> {
        let slot = self
            .index(pos)
            .and_then(|idx| self.cells.get_mut(idx))
            .ok_or_else(|| eyre!("position {pos} is outside the grid"))?;
        *slot = cell;

        Ok(())
    }

    /// Returns whether the position is in bounds and holds a wall.
    #[must_use]
    pub fn is_wall(&self, pos: Position) -> bool {
        self.get(pos) == Some(Cell::Wall)
    }

    /// Returns whether the position is in bounds and not a wall.
    #[must_use]
    pub fn is_traversable(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(Cell::is_traversable)
    }

    /// Returns the in-bounds 4-neighbours of a position.
    ///
    /// Neighbours are yielded in the order down, right, up, left. The order only affects which
    /// route a depth-first search explores first.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        [(0, 1), (1, 0), (0, -1), (-1, 0)]
            .into_iter()
            .filter_map(move |(dx, dy)| pos.offset(dx, dy))
            .filter(|next| self.contains(*next))
    }

    /// Iterates over every position and its cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (Position::new(idx % self.width, idx / self.width), *cell))
    }

    /// Returns the positions of all wall cells.
    #[must_use]
    pub fn walls(&self) -> Vec<Position> {
        self.cells()
            .filter_map(|(pos, cell)| (cell == Cell::Wall).then_some(pos))
            .collect()
    }

    /// Recomputes the Player/Goal overlay.
    ///
    /// Every non-wall cell is reset to [`Cell::Open`], then the player and goal markers are placed
    /// on their cells unless those cells are walls. Walls are never overwritten, so a player
    /// standing inside a wall with wall-pass leaves no marker.
    pub fn refresh_overlay(&mut self, player: Position, goal: Position) {
        for cell in &mut self.cells {
            if *cell != Cell::Wall {
                *cell = Cell::Open;
            }
        }

        for (pos, marker) in [(player, Cell::Player), (goal, Cell::Goal)] {
            if let Some(slot) = self.index(pos).and_then(|idx| self.cells.get_mut(idx)) {
                if *slot != Cell::Wall {
                    *slot = marker;
                }
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.cells.chunks(self.width).enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }

        Ok(())
    }
}

impl FromStr for Grid {
    type Err = Report;

    /// Parses the text form produced by [`Display`](fmt::Display).
    ///
    /// Surrounding whitespace on each line is ignored. Rows must be non-empty, equally long and
    /// made only of `.`, `#`, `P` and `G`.
    fn from_str(input: &str) -> Result<Self> {
        let lines: Vec<&str> = input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let width = lines
            .first()
            .ok_or_eyre("grid text contains no rows")?
            .chars()
            .count();
        let mut grid = Self::new(width, lines.len())?;

        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() != width {
                bail!("row {y} has a different length than the first row");
            }
            for (x, symbol) in line.chars().enumerate() {
                let cell = Cell::from_symbol(symbol)
                    .ok_or_else(|| eyre!("invalid cell character {symbol:?} at ({x}, {y})"))?;
                grid.set(Position::new(x, y), cell)?;
            }
        }

        Ok(grid)
    }
}
