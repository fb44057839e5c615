use std::collections::{HashMap, VecDeque};

use crate::maze::{Cell, CellState, Edge, Maze};

/// The worklist discipline driving a search: FIFO explores breadth-first,
/// LIFO depth-first. Fixed for the lifetime of one search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    Breadth,
    Depth,
}

impl std::fmt::Display for Discipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Discipline::Breadth => write!(f, "Breadth-First Search (BFS)"),
            Discipline::Depth => write!(f, "Depth-First Search (DFS)"),
        }
    }
}

/// The search frontier. One deque; the discipline only decides which end
/// gets popped.
struct Worklist {
    items: VecDeque<Cell>,
    discipline: Discipline,
}

impl Worklist {
    fn new(discipline: Discipline) -> Self {
        Worklist {
            items: VecDeque::new(),
            discipline,
        }
    }

    fn push(&mut self, cell: Cell) {
        self.items.push_back(cell);
    }

    fn pop(&mut self) -> Option<Cell> {
        match self.discipline {
            Discipline::Breadth => self.items.pop_front(),
            Discipline::Depth => self.items.pop_back(),
        }
    }
}

/// Result of consuming one worklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The worklist was empty; nothing changed.
    Exhausted,
    /// A non-goal cell was dequeued and its neighbors offered.
    Visited(Cell),
    /// The goal cell was dequeued; the search is over.
    ReachedGoal,
}

/// A single-stepped exploration of the passage graph.
///
/// Holds a working copy of the passage list; an edge is removed the moment
/// it is traversed, in either direction. On a tree that removal doubles as
/// the visited marker: the one edge that could re-offer a cell is already
/// gone when the cell is first discovered, so no cell enters the worklist
/// twice and no parent entry is ever overwritten within a run.
pub struct Traversal {
    worklist: Worklist,
    pending: Vec<Edge>,
    paint: CellState,
}

impl Traversal {
    /// A visible search: dequeued cells are painted with the discipline's
    /// frontier color.
    pub fn new(start: Cell, passages: &[Edge], discipline: Discipline) -> Self {
        let paint = match discipline {
            Discipline::Breadth => CellState::BreadthVisited,
            Discipline::Depth => CellState::DepthVisited,
        };
        Traversal::with_paint(start, passages, discipline, paint)
    }

    /// The replay run after a manual win: rebuilds the parent map from the
    /// start while repainting visited cells back to the background, so only
    /// the traced route remains visible afterwards.
    pub fn replay(start: Cell, passages: &[Edge]) -> Self {
        Traversal::with_paint(start, passages, Discipline::Breadth, CellState::Unvisited)
    }

    fn with_paint(
        start: Cell,
        passages: &[Edge],
        discipline: Discipline,
        paint: CellState,
    ) -> Self {
        let mut worklist = Worklist::new(discipline);
        worklist.push(start);
        Traversal {
            worklist,
            pending: passages.to_vec(),
            paint,
        }
    }

    pub fn discipline(&self) -> Discipline {
        self.worklist.discipline
    }

    /// Consumes exactly one worklist item, per tick-driven execution.
    ///
    /// Pops a cell, paints it, and stops if it is the goal. Otherwise every
    /// remaining working passage touching the cell is consumed, its far
    /// endpoint pushed and that endpoint's parent recorded.
    pub fn step(&mut self, maze: &mut Maze, parents: &mut HashMap<Cell, Cell>) -> StepOutcome {
        let Some(cell) = self.worklist.pop() else {
            return StepOutcome::Exhausted;
        };

        maze.set_state(cell, self.paint);
        if cell == maze.goal() {
            return StepOutcome::ReachedGoal;
        }

        let mut i = 0;
        while i < self.pending.len() {
            match self.pending[i].other(cell) {
                Some(neighbor) => {
                    self.pending.swap_remove(i);
                    self.worklist.push(neighbor);
                    parents.insert(neighbor, cell);
                }
                None => i += 1,
            }
        }
        StepOutcome::Visited(cell)
    }
}
