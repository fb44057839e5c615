pub mod cell;
mod kruskal;
mod union_find;

use rand::rngs::StdRng;

pub use cell::{Cell, CellState, Direction};

/// An unordered pair of adjacent cells with its random weight. Selected edges
/// are passages, rejected ones are walls.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub a: Cell,
    pub b: Cell,
    pub weight: u32,
}

impl Edge {
    /// The endpoint opposite `cell`, or None if the edge does not touch it.
    pub fn other(&self, cell: Cell) -> Option<Cell> {
        if self.a == cell {
            Some(self.b)
        } else if self.b == cell {
            Some(self.a)
        } else {
            None
        }
    }

    /// Whether this edge joins `from` and `to`, in either orientation.
    pub fn connects(&self, from: Cell, to: Cell) -> bool {
        (self.a == from && self.b == to) || (self.a == to && self.b == from)
    }
}

/// Rejected construction parameters: a maze needs at least one cell in each
/// dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeError {
    pub width: u8,
    pub height: u8,
}

impl std::fmt::Display for SizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "maze dimensions must be at least 1x1, got {}x{}",
            self.width, self.height
        )
    }
}

impl std::error::Error for SizeError {}

/// A generated maze: the cell grid with per-cell display state, and the
/// passage/wall partition of the grid's adjacency edges.
///
/// The topology is fixed after generation; only the display states mutate.
pub struct Maze {
    width: u8,
    height: u8,
    states: Box<[CellState]>,
    passages: Vec<Edge>,
    walls: Vec<Edge>,
    start: Cell,
    goal: Cell,
}

impl Maze {
    /// Generates a fresh maze by carving a random spanning tree over the
    /// grid. The start is the first cell created (top left) and the goal the
    /// last (bottom right).
    ///
    /// Rejects zero-sized grids before any structure is built.
    pub fn generate(width: u8, height: u8, rng: &mut StdRng) -> Result<Self, SizeError> {
        if width == 0 || height == 0 {
            return Err(SizeError { width, height });
        }

        let (passages, walls) = kruskal::carve(width, height, rng);
        debug_assert_eq!(passages.len(), width as usize * height as usize - 1);

        let states =
            vec![CellState::Unvisited; width as usize * height as usize].into_boxed_slice();
        let start = Cell::new(0, 0);
        let goal = Cell::new(width - 1, height - 1);

        let mut maze = Maze {
            width,
            height,
            states,
            passages,
            walls,
            start,
            goal,
        };
        maze.set_state(start, CellState::Start);
        maze.set_state(goal, CellState::Goal);
        Ok(maze)
    }

    /// Returns the width of the maze in cells.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Returns the height of the maze in cells.
    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Checks if the given cell is within the bounds of the maze.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    fn ravel_index(&self, cell: Cell) -> usize {
        cell.y as usize * self.width as usize + cell.x as usize
    }

    pub fn state(&self, cell: Cell) -> CellState {
        self.states[self.ravel_index(cell)]
    }

    pub fn set_state(&mut self, cell: Cell, state: CellState) {
        let idx = self.ravel_index(cell);
        self.states[idx] = state;
    }

    /// The walkable connections of the spanning tree.
    pub fn passages(&self) -> &[Edge] {
        &self.passages
    }

    /// The rejected edges, rendered as barriers between adjacent cells.
    pub fn walls(&self) -> &[Edge] {
        &self.walls
    }

    /// Whether a passage joins `from` and `to`, in either orientation.
    pub fn passage_between(&self, from: Cell, to: Cell) -> bool {
        self.passages.iter().any(|edge| edge.connects(from, to))
    }

    /// The neighbor one step in `direction` from `cell`, or None when the
    /// step leaves the grid.
    pub fn step_from(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let target = match direction {
            Direction::Up => Cell::new(cell.x, cell.y.checked_sub(1)?),
            Direction::Down => Cell::new(cell.x, cell.y.checked_add(1)?),
            Direction::Left => Cell::new(cell.x.checked_sub(1)?, cell.y),
            Direction::Right => Cell::new(cell.x.checked_add(1)?, cell.y),
        };
        self.contains(target).then_some(target)
    }
}
