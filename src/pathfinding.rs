//! Reachability, route finding and hint animation module.
//!
//! This module contains the reachability check used to validate generated mazes, the
//! shortest-route search behind the in-game hint, and the animation manager that reveals that
//! route one cell at a time.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use crate::grid::{Grid, Position};

/// Animation frame delay in milliseconds.
///
/// This constant controls the timing between hint frames. A lower value reveals the route faster,
/// while a higher value makes it easier to follow.
pub(crate) const ANIMATION_FRAME_DELAY_MS: u64 = 120;

/// Boolean matrix of already-explored cells, kept apart from the grid itself.
struct Visited {
    /// Row length of the matrix.
    width: usize,
    /// One flag per cell, row-major.
    flags: Vec<bool>,
}

impl Visited {
    /// Builds an all-unvisited matrix shaped like the grid.
    fn new(grid: &Grid) -> Self {
        Self {
            width: grid.width(),
            flags: vec![false; grid.width() * grid.height()],
        }
    }

    /// Marks the position as visited, returning `true` if it was not visited before.
    fn mark(&mut self, pos: Position) -> bool {
        match self.flags.get_mut(pos.y * self.width + pos.x) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }
}

/// Checks whether a 4-connected path of non-wall cells joins two positions.
///
/// This function runs an iterative depth-first search with an explicit stack, exploring
/// neighbours in the order down, right, up, left. It returns `true` right away when both positions
/// are the same, and otherwise `false` when either end is out of bounds or a wall.
#[must_use]
pub fn has_path(grid: &Grid, start: Position, end: Position) -> bool {
    if start == end {
        return true;
    }
    if !grid.is_traversable(start) || !grid.is_traversable(end) {
        return false;
    }

    let mut visited = Visited::new(grid);
    let mut stack = vec![start];
    let _ = visited.mark(start);

    while let Some(current) = stack.pop() {
        // Pushed in reverse so the first neighbour is the first one popped
        let mut next: Vec<Position> = grid
            .neighbors(current)
            .filter(|pos| grid.is_traversable(*pos))
            .collect();
        next.reverse();

        for pos in next {
            if pos == end {
                return true;
            }
            if visited.mark(pos) {
                stack.push(pos);
            }
        }
    }

    false
}

/// Finds a shortest 4-connected route of non-wall cells between two positions.
///
/// This function runs a breadth-first search and returns the route including both ends, or
/// [`None`] when the positions are not connected.
#[must_use]
pub fn shortest_path(grid: &Grid, start: Position, end: Position) -> Option<Vec<Position>> {
    if !grid.is_traversable(start) || !grid.is_traversable(end) {
        return None;
    }

    let mut parents: Vec<Option<Position>> = vec![None; grid.width() * grid.height()];
    let mut visited = Visited::new(grid);
    let mut queue = VecDeque::from([start]);
    let _ = visited.mark(start);

    while let Some(current) = queue.pop_front() {
        if current == end {
            let mut route = vec![current];
            let mut cursor = current;
            while let Some(parent) = parents
                .get(cursor.y * grid.width() + cursor.x)
                .copied()
                .flatten()
            {
                route.push(parent);
                cursor = parent;
            }
            route.reverse();

            return Some(route);
        }

        for pos in grid.neighbors(current) {
            if grid.is_traversable(pos) && visited.mark(pos) {
                if let Some(slot) = parents.get_mut(pos.y * grid.width() + pos.x) {
                    *slot = Some(current);
                }
                queue.push_back(pos);
            }
        }
    }

    None
}

/// Animation state manager for the route hint.
///
/// This structure manages the hint animation including timing, the full route to reveal and the
/// prefix of it that is currently visible.
pub(crate) struct AnimationManager {
    /// Route recorded for the current hint.
    ///
    /// This field stores the positions from the player to the goal. It is empty while no hint is
    /// being shown.
    pub(crate) route: Vec<Position>,
    /// Number of route cells currently revealed.
    ///
    /// This field tracks how far into [`route`](AnimationManager::route) the animation has
    /// progressed.
    pub(crate) revealed: usize,
    /// Timestamp of the last animation frame update.
    ///
    /// This field stores the time when the animation last advanced, used to pace the frames.
    pub(crate) last_update_time: Instant,
}

impl Default for AnimationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationManager {
    /// Creates a new animation manager with no route.
    pub(crate) fn new() -> Self {
        Self {
            route: Vec::new(),
            revealed: 0,
            last_update_time: Instant::now(),
        }
    }

    /// Returns whether a hint is currently being shown.
    pub(crate) fn is_active(&self) -> bool {
        !self.route.is_empty()
    }

    /// Starts revealing a new route from its first cell.
    pub(crate) fn start(&mut self, route: Vec<Position>) {
        self.route = route;
        self.reset();
    }

    /// Resets the animation state to the beginning of the route.
    pub(crate) fn reset(&mut self) {
        self.revealed = 0;
        self.last_update_time = Instant::now();
    }

    /// Clears the route and resets state.
    pub(crate) fn clear(&mut self) {
        self.route.clear();
        self.reset();
    }

    /// Returns the currently revealed part of the route.
    pub(crate) fn visible(&self) -> &[Position] {
        self.route
            .get(..self.revealed)
            .unwrap_or(self.route.as_slice())
    }

    /// Updates the animation state based on timing and current progress.
    ///
    /// This method reveals one more cell of the route when enough time has passed, and starts over
    /// once the whole route has been shown.
    pub(crate) fn update(&mut self) {
        if !self.is_active() {
            return;
        }

        if self.last_update_time.elapsed() >= Duration::from_millis(ANIMATION_FRAME_DELAY_MS) {
            self.last_update_time = Instant::now();

            if self.revealed < self.route.len() {
                self.revealed += 1;
            } else {
                self.revealed = 0;
            }
        }
    }
}
