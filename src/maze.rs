//! Playable maze state: the grid together with the player and goal positions.

use crate::grid::{Cell, Grid, Position};

/// Grid plus the player's position, the goal and the wall-pass modifier.
///
/// The player starts in the top-left corner and the goal sits in the bottom-right corner. The
/// Player/Goal overlay of the grid is recomputed after every committed move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    /// Cells of the maze, including the overlay markers.
    grid: Grid,
    /// Current player position.
    player: Position,
    /// Fixed goal position.
    goal: Position,
    /// Whether walls are ignored by move validation.
    wall_pass: bool,
}

impl Maze {
    /// Wraps a generated grid, placing the player at its start and the goal at its end.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        let player = grid.start();
        let goal = grid.end();
        let mut maze = Self {
            grid,
            player,
            goal,
            wall_pass: false,
        };
        maze.grid.refresh_overlay(player, goal);

        maze
    }

    /// Returns the grid for rendering.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.grid.width()
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.grid.height()
    }

    /// Returns the player's position.
    #[must_use]
    pub const fn player(&self) -> Position {
        self.player
    }

    /// Returns the goal position.
    #[must_use]
    pub const fn goal(&self) -> Position {
        self.goal
    }

    /// Returns the cell at the given position.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.grid.get(pos)
    }

    /// Returns whether the wall-pass modifier is active.
    #[must_use]
    pub const fn wall_pass(&self) -> bool {
        self.wall_pass
    }

    /// Turns the wall-pass modifier on or off.
    pub fn set_wall_pass(&mut self, enabled: bool) {
        self.wall_pass = enabled;
    }

    /// Converts signed coordinates into an in-bounds position.
    fn resolve(&self, x: isize, y: isize) -> Option<Position> {
        let pos = Position::new(usize::try_from(x).ok()?, usize::try_from(y).ok()?);

        self.grid.contains(pos).then_some(pos)
    }

    /// Checks whether the player may stand on `(x, y)`.
    ///
    /// The position must be inside the grid and, unless wall-pass is active, must not be a wall.
    /// Negative coordinates are accepted and always rejected.
    #[must_use]
    pub fn is_valid_move(&self, x: isize, y: isize) -> bool {
        self.resolve(x, y)
            .is_some_and(|pos| self.wall_pass || !self.grid.is_wall(pos))
    }

    /// Moves the player by `(dx, dy)`.
    ///
    /// Returns `true` and refreshes the overlay if the target is a valid move. Otherwise returns
    /// `false` and leaves the maze untouched.
    pub fn move_player(&mut self, dx: isize, dy: isize) -> bool {
        let Some(target) = self.player.offset(dx, dy) else {
            return false;
        };
        let (Ok(x), Ok(y)) = (isize::try_from(target.x), isize::try_from(target.y)) else {
            return false;
        };
        if !self.is_valid_move(x, y) {
            return false;
        }

        self.player = target;
        self.grid.refresh_overlay(self.player, self.goal);

        true
    }

    /// Returns whether the player stands on the goal.
    #[must_use]
    pub fn is_at_goal(&self) -> bool {
        self.player == self.goal
    }
}
