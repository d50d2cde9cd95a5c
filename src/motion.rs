//! Continuous player motion against the discrete wall grid.

use crate::{
    maze::Maze,
    types::{Direction, Position},
};

/// Distance to the exit below which the player counts as having escaped.
pub(crate) const EXIT_RADIUS: f64 = 0.5;

/// Outcome of resolving one frame of movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Step {
    /// Position after every accepted move of the frame.
    pub position: Position,
    /// Whether at least one move was accepted.
    pub moved: bool,
}

/// Advances a position by one frame of held input.
///
/// Every held direction is tried in [`Direction::ORDER`], each offsetting the position by `speed`
/// along a single axis. A candidate is accepted when the tile nearest to it is open, and accepted
/// moves apply immediately so later directions are checked against the updated position. Rejected
/// moves are dropped without any sliding.
pub(crate) fn step(maze: &Maze, position: Position, speed: f64, held: &[Direction]) -> Step {
    let mut step = Step {
        position,
        moved: false,
    };

    for direction in Direction::ORDER.into_iter().filter(|dir| held.contains(dir)) {
        let (dx, dy) = direction.delta();
        let candidate = Position::new(
            f64::from(dx).mul_add(speed, step.position.x),
            f64::from(dy).mul_add(speed, step.position.y),
        );

        if is_walkable(maze, candidate) {
            step.position = candidate;
            step.moved = true;
        }
    }

    step
}

/// Returns whether the tile nearest to the position is open.
///
/// Positions that round outside the grid count as walls.
pub(crate) fn is_walkable(maze: &Maze, position: Position) -> bool {
    position
        .nearest_cell()
        .is_some_and(|(col, row)| maze.is_open(col, row))
}

/// Returns whether the position is close enough to the exit to win.
pub(crate) fn reached_exit(position: Position, exit: Position) -> bool {
    position.distance(exit) < EXIT_RADIUS
}
