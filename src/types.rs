//! Type definitions shared by the maze, the motion resolver and the game loop.

/// Occupancy of a single maze cell.
///
/// This enumeration holds the two states a cell of the maze grid can be in. Generation starts from
/// a grid of walls and carves open cells out of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Tile {
    /// Solid cell the player cannot enter.
    Wall,
    /// Carved cell the player can walk through.
    Open,
}

/// Logical movement direction.
///
/// This enumeration holds the four directions the player can hold at once. Diagonal motion is the
/// result of holding one vertical and one horizontal direction in the same frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    /// Towards row zero.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column zero.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Order in which held directions are resolved every frame.
    ///
    /// Vertical movement is evaluated before horizontal movement, up before down and left before
    /// right.
    pub(crate) const ORDER: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the unit offset of the direction as a `(dx, dy)` pair.
    pub(crate) const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Lifecycle state of a game session.
///
/// This enumeration governs whether input, timer and motion updates run in a given frame. Only
/// the [`Active`](GameState::Active) state advances the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GameState {
    /// Before the first start command; the pre-generated maze is shown statically.
    Idle,
    /// The timer runs and the player can move.
    Active,
    /// The player reached the exit before the timer ran out.
    Won,
    /// The timer ran out.
    Lost,
}

impl GameState {
    /// Returns whether the session reached one of the terminal display states.
    pub(crate) const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Continuous position on the maze grid.
///
/// Coordinates are measured in cells; the integer values are cell centres. Positions are only
/// rounded when looking up the tile underneath them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Position {
    /// Column coordinate.
    pub x: f64,
    /// Row coordinate.
    pub y: f64,
}

impl Position {
    /// Builds a new position from its coordinates.
    pub(crate) const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the position at the centre of the given cell.
    pub(crate) fn from_cell((col, row): (usize, usize)) -> Self {
        Self::new(cell_coord(col), cell_coord(row))
    }

    /// Returns the Euclidean distance to another position.
    pub(crate) fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns the cell nearest to this position, or [`None`] when it lies left of or above the
    /// grid origin.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "The value is rounded, finite and non-negative before the conversion."
    )]
    pub(crate) fn nearest_cell(self) -> Option<(usize, usize)> {
        let col = self.x.round();
        let row = self.y.round();

        (col.is_finite() && row.is_finite() && col >= 0. && row >= 0.)
            .then(|| (col as usize, row as usize))
    }
}

/// Converts a cell index into a continuous coordinate.
///
/// Indices above 2^53 round to the nearest representable value; grids that large cannot be
/// allocated in the first place.
fn cell_coord(index: usize) -> f64 {
    index as f64
}
