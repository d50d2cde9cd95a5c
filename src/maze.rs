//! Maze grid and generation module.
//!
//! This module contains the `Maze` struct holding the wall/open occupancy grid of a session, along
//! with the randomized depth-first carving that produces it.

use color_eyre::eyre::{ensure, Result};
use rand::{seq::SliceRandom as _, Rng};
use tracing::debug;

use crate::types::{Direction, Tile};

/// Smallest accepted maze side, in cells.
pub(crate) const MIN_SIDE: usize = 5;

/// Cell the walk starts from and the player spawns on.
pub(crate) const START: (usize, usize) = (1, 1);

/// Perfect maze over an odd-sized grid.
///
/// This structure stores the occupancy of every cell in row-major order. Open cells form a
/// spanning tree: every open cell is reachable from [`START`] and there is exactly one path between
/// any two of them. The outer border is always solid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Maze {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Cell occupancy in row-major order.
    tiles: Vec<Tile>,
}

/// Pending work for one carved cell in the depth-first walk.
///
/// Holding the shuffled moves and the index of the next one to try makes the explicit stack visit
/// cells in the same order the recursive formulation would.
struct Branch {
    /// Cell this branch carves from.
    cell: (usize, usize),
    /// Moves in the order they will be tried.
    moves: [Direction; 4],
    /// Index of the next untried move.
    next: usize,
}

impl Maze {
    /// Generates a new maze with the given dimensions.
    ///
    /// The walk starts at [`START`], opens the current cell and tries the four two-step moves in an
    /// order shuffled independently for every cell. A move is taken when its target lies strictly
    /// inside the border and is still a wall; the cell in between is carved as well. Once the walk
    /// is exhausted the exit cell is forced open.
    ///
    /// # Errors
    ///
    /// This function returns an error if either dimension is even or smaller than [`MIN_SIDE`].
    pub(crate) fn generate<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<Self> {
        ensure!(
            width >= MIN_SIDE && height >= MIN_SIDE,
            "maze dimensions must be at least {MIN_SIDE}x{MIN_SIDE}, got {width}x{height}"
        );
        ensure!(
            width % 2 == 1 && height % 2 == 1,
            "maze dimensions must be odd, got {width}x{height}"
        );

        let mut maze = Self {
            width,
            height,
            tiles: vec![Tile::Wall; width * height],
        };

        maze.open(START);
        let mut stack = vec![Branch::new(START, rng)];

        while let Some(branch) = stack.last_mut() {
            let Some(&direction) = branch.moves.get(branch.next) else {
                let _ = stack.pop();
                continue;
            };
            branch.next += 1;

            let (col, row) = branch.cell;
            let (dx, dy) = direction.delta();
            let Some(target) = maze.interior_offset(col, row, 2 * dx, 2 * dy) else {
                continue;
            };

            if maze.tile(target.0, target.1) == Some(Tile::Wall) {
                if let Some(between) = maze.interior_offset(col, row, dx, dy) {
                    maze.open(between);
                }
                maze.open(target);
                stack.push(Branch::new(target, rng));
            }
        }

        maze.open(maze.exit());

        debug!(
            width,
            height,
            open_cells = maze.open_cells().count(),
            "generated maze"
        );

        Ok(maze)
    }

    /// Returns the number of columns.
    pub(crate) const fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    pub(crate) const fn height(&self) -> usize {
        self.height
    }

    /// Returns the exit cell, next to the corner opposite the start.
    pub(crate) const fn exit(&self) -> (usize, usize) {
        (self.width - 2, self.height - 2)
    }

    /// Returns the tile at the given cell, or [`None`] when the cell lies outside the grid.
    pub(crate) fn tile(&self, col: usize, row: usize) -> Option<Tile> {
        if col >= self.width || row >= self.height {
            return None;
        }

        self.tiles.get(row * self.width + col).copied()
    }

    /// Returns whether the given cell exists and is open.
    pub(crate) fn is_open(&self, col: usize, row: usize) -> bool {
        self.tile(col, row) == Some(Tile::Open)
    }

    /// Returns an iterator over the coordinates of every open cell, row by row.
    pub(crate) fn open_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells(Tile::Open)
    }

    /// Returns an iterator over the coordinates of every wall cell, row by row.
    pub(crate) fn walls(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells(Tile::Wall)
    }

    /// Returns an iterator over the coordinates of every cell holding the given tile.
    fn cells(&self, wanted: Tile) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;

        self.tiles
            .iter()
            .enumerate()
            .filter(move |&(_, tile)| *tile == wanted)
            .map(move |(idx, _)| (idx % width, idx / width))
    }

    /// Carves the given cell open.
    fn open(&mut self, (col, row): (usize, usize)) {
        if col < self.width {
            if let Some(tile) = self.tiles.get_mut(row * self.width + col) {
                *tile = Tile::Open;
            }
        }
    }

    /// Offsets a cell and returns the result if it lies strictly inside the border.
    fn interior_offset(&self, col: usize, row: usize, dx: i8, dy: i8) -> Option<(usize, usize)> {
        let col = col.checked_add_signed(dx.into())?;
        let row = row.checked_add_signed(dy.into())?;

        (col > 0 && col < self.width - 1 && row > 0 && row < self.height - 1).then_some((col, row))
    }
}

impl Branch {
    /// Creates the branch for a freshly carved cell with a newly shuffled move order.
    fn new<R: Rng + ?Sized>(cell: (usize, usize), rng: &mut R) -> Self {
        let mut moves = Direction::ORDER;
        moves.shuffle(rng);

        Self {
            cell,
            moves,
            next: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    /// Generates a maze from a fixed seed.
    fn seeded_maze(width: usize, height: usize, seed: u64) -> Maze {
        let mut rng = Pcg32::seed_from_u64(seed);
        Maze::generate(width, height, &mut rng).expect("dimensions should be valid")
    }

    /// Returns the open neighbours of an open cell.
    fn open_neighbours(maze: &Maze, (col, row): (usize, usize)) -> Vec<(usize, usize)> {
        Direction::ORDER
            .iter()
            .filter_map(|direction| {
                let (dx, dy) = direction.delta();
                let col = col.checked_add_signed(dx.into())?;
                let row = row.checked_add_signed(dy.into())?;
                maze.is_open(col, row).then_some((col, row))
            })
            .collect()
    }

    /// Collects every open cell reachable from the start through open cells.
    fn reachable(maze: &Maze) -> HashSet<(usize, usize)> {
        let mut seen = HashSet::from([START]);
        let mut queue = VecDeque::from([START]);

        while let Some(cell) = queue.pop_front() {
            for neighbour in open_neighbours(maze, cell) {
                if seen.insert(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }

        seen
    }

    /// Counts undirected unit edges between open cells.
    fn open_edges(maze: &Maze) -> usize {
        maze.open_cells()
            .map(|(col, row)| {
                usize::from(maze.is_open(col + 1, row)) + usize::from(maze.is_open(col, row + 1))
            })
            .sum()
    }

    #[test]
    fn test_generate_is_connected() {
        for seed in 0..20 {
            let maze = seeded_maze(21, 15, seed);
            let open: HashSet<_> = maze.open_cells().collect();

            assert_eq!(reachable(&maze), open, "seed {seed} left unreachable cells");
        }
    }

    #[test]
    fn test_generate_is_acyclic() {
        for seed in 0..20 {
            let maze = seeded_maze(31, 31, seed);
            let open = maze.open_cells().count();

            assert_eq!(open_edges(&maze), open - 1, "seed {seed} produced a cycle");
        }
    }

    #[test]
    fn test_generate_border_is_solid() {
        let maze = seeded_maze(11, 9, 7);

        for col in 0..maze.width() {
            assert_eq!(maze.tile(col, 0), Some(Tile::Wall), "top border at {col}");
            assert_eq!(
                maze.tile(col, maze.height() - 1),
                Some(Tile::Wall),
                "bottom border at {col}"
            );
        }
        for row in 0..maze.height() {
            assert_eq!(maze.tile(0, row), Some(Tile::Wall), "left border at {row}");
            assert_eq!(
                maze.tile(maze.width() - 1, row),
                Some(Tile::Wall),
                "right border at {row}"
            );
        }
    }

    #[test]
    fn test_generate_start_and_exit_open() {
        for seed in 0..10 {
            let maze = seeded_maze(61, 61, seed);

            assert!(maze.is_open(1, 1), "start closed for seed {seed}");
            assert_eq!(maze.exit(), (59, 59));
            assert!(maze.is_open(59, 59), "exit closed for seed {seed}");
        }
    }

    #[test]
    fn test_generate_carves_every_odd_cell() {
        let maze = seeded_maze(15, 11, 3);

        for row in (1..maze.height()).step_by(2) {
            for col in (1..maze.width()).step_by(2) {
                assert!(maze.is_open(col, row), "odd cell ({col}, {row}) left closed");
            }
        }
        for row in (2..maze.height()).step_by(2) {
            for col in (2..maze.width()).step_by(2) {
                assert!(!maze.is_open(col, row), "even cell ({col}, {row}) carved");
            }
        }
    }

    #[test]
    fn test_small_maze_connects_start_to_exit() {
        for seed in 0..10 {
            let maze = seeded_maze(5, 5, seed);

            assert_eq!(maze.exit(), (3, 3));
            assert!(
                reachable(&maze).contains(&(3, 3)),
                "no path from start to exit for seed {seed}"
            );
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        assert_eq!(seeded_maze(25, 25, 42), seeded_maze(25, 25, 42));
    }

    #[test]
    fn test_different_seeds_differ() {
        let mazes: HashSet<_> = (0..8)
            .map(|seed| seeded_maze(25, 25, seed).tiles)
            .collect();

        assert!(mazes.len() > 1, "every seed produced the same maze");
    }

    #[test]
    fn test_generate_large_maze_without_recursion() {
        let maze = seeded_maze(401, 401, 1);

        assert_eq!(maze.open_cells().count(), 2 * 200 * 200 - 1);
    }

    #[test]
    fn test_generate_rejects_even_dimensions() {
        let mut rng = Pcg32::seed_from_u64(0);

        assert!(Maze::generate(10, 11, &mut rng).is_err());
        assert!(Maze::generate(11, 10, &mut rng).is_err());
    }

    #[test]
    fn test_generate_rejects_small_dimensions() {
        let mut rng = Pcg32::seed_from_u64(0);

        assert!(Maze::generate(3, 5, &mut rng).is_err());
        assert!(Maze::generate(5, 1, &mut rng).is_err());
    }

    #[test]
    fn test_tile_out_of_bounds() {
        let maze = seeded_maze(5, 5, 0);

        assert_eq!(maze.tile(5, 0), None);
        assert_eq!(maze.tile(0, 5), None);
        assert!(!maze.is_open(100, 100));
    }

    #[test]
    fn test_walls_and_open_cells_partition_grid() {
        let maze = seeded_maze(9, 7, 11);

        assert_eq!(maze.walls().count() + maze.open_cells().count(), 9 * 7);
    }
}
