mod traversal;

use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng};

use crate::maze::{Cell, CellState, Direction, Maze, SizeError};

pub use traversal::Discipline;
use traversal::{StepOutcome, Traversal};

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// What the session is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Freshly generated or reset; accepts search and directional input.
    Idle,
    /// An automated search consumes one worklist item per tick.
    Searching,
    /// The occupant is walked by directional input.
    Manual,
    /// The goal was reached; only reset is accepted while the solution
    /// trace animates.
    Solved,
}

/// One live maze exploration: the maze, the mode state machine, and the
/// handlers the host driver calls on ticks and key events.
///
/// All mutation happens synchronously inside the handlers; the session never
/// spawns work of its own.
pub struct Session {
    maze: Maze,
    rng: StdRng,
    mode: Mode,
    /// Present only while searching.
    traversal: Option<Traversal>,
    /// Which cell each discovered cell was reached from.
    parents: HashMap<Cell, Cell>,
    /// The occupant moved by manual navigation.
    current: Cell,
    /// Where the solution trace has gotten to, while solved.
    trace: Option<Cell>,
    /// Set when the goal was reached by hand.
    banner: bool,
}

impl Session {
    /// Generates a fresh maze and starts the session in `Idle`.
    /// Rejects zero-sized grids.
    pub fn generate(width: u8, height: u8, seed: Option<u64>) -> Result<Self, SizeError> {
        let mut rng = get_rng(seed);
        let maze = Maze::generate(width, height, &mut rng)?;
        let current = maze.start();
        tracing::info!("[session] Generated {}x{} maze", width, height);
        Ok(Session {
            maze,
            rng,
            mode: Mode::Idle,
            traversal: None,
            parents: HashMap::new(),
            current,
            trace: None,
            banner: false,
        })
    }

    /// One step of whatever is in progress: the active search advances by
    /// one dequeue, or the solution trace advances by one parent link.
    pub fn on_tick(&mut self) {
        match self.mode {
            Mode::Searching => {
                let Some(traversal) = self.traversal.as_mut() else {
                    return;
                };
                match traversal.step(&mut self.maze, &mut self.parents) {
                    StepOutcome::Visited(_) => {}
                    StepOutcome::ReachedGoal => {
                        tracing::info!("[session] Search reached the goal");
                        self.solve();
                    }
                    StepOutcome::Exhausted => {
                        unreachable!("passages form a spanning tree; the goal is always reachable")
                    }
                }
            }
            Mode::Solved => self.trace_step(),
            Mode::Idle | Mode::Manual => {}
        }
    }

    /// Begins an automated search. Only effective from `Idle`; the
    /// discipline is fixed for the whole run.
    pub fn on_search_mode(&mut self, discipline: Discipline) {
        if self.mode != Mode::Idle {
            tracing::debug!(
                "[session] Ignoring {:?} search request while {:?}",
                discipline,
                self.mode
            );
            return;
        }
        self.traversal = Some(Traversal::new(
            self.maze.start(),
            self.maze.passages(),
            discipline,
        ));
        self.mode = Mode::Searching;
        tracing::info!("[session] Starting {}", discipline);
    }

    /// A manual move attempt. The first directional input from `Idle`
    /// enters manual mode; input while searching or solved is ignored.
    pub fn on_direction(&mut self, direction: Direction) {
        match self.mode {
            Mode::Idle => {
                self.mode = Mode::Manual;
                self.try_move(direction);
            }
            Mode::Manual => self.try_move(direction),
            Mode::Searching | Mode::Solved => {
                tracing::debug!(
                    "[session] Ignoring {:?} input while {:?}",
                    direction,
                    self.mode
                );
            }
        }
    }

    /// Discards everything and regenerates the maze at the same dimensions
    /// with fresh random weights.
    pub fn on_reset(&mut self) {
        let (width, height) = (self.maze.width(), self.maze.height());
        self.maze = Maze::generate(width, height, &mut self.rng)
            .expect("dimensions were validated at construction");
        self.parents = HashMap::new();
        self.traversal = None;
        self.trace = None;
        self.current = self.maze.start();
        self.mode = Mode::Idle;
        self.banner = false;
        tracing::info!("[session] Reset with a fresh {}x{} maze", width, height);
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The discipline of the active search, if one is running.
    pub fn searching(&self) -> Option<Discipline> {
        self.traversal.as_ref().map(Traversal::discipline)
    }

    /// The cell the manual occupant is on.
    pub fn current(&self) -> Cell {
        self.current
    }

    /// Whether the win banner should display (goal reached by hand).
    pub fn win_banner(&self) -> bool {
        self.banner
    }

    /// Applies a single manual step. Off-grid targets and targets without a
    /// connecting passage leave everything unchanged.
    fn try_move(&mut self, direction: Direction) {
        let Some(target) = self.maze.step_from(self.current, direction) else {
            tracing::debug!("[session] {:?} from {} leaves the grid", direction, self.current);
            return;
        };
        if !self.maze.passage_between(self.current, target) {
            tracing::debug!("[session] No passage from {} to {}", self.current, target);
            return;
        }

        self.maze.set_state(self.current, CellState::Trail);
        self.parents.insert(target, self.current);
        self.current = target;
        self.maze.set_state(target, CellState::Current);

        if target == self.maze.goal() {
            self.replay_and_solve();
        }
    }

    /// The goal was reached by hand: rebuild the parent map with a silent
    /// search from the start (the manual map may describe a wandering walk),
    /// then enter the solved state with the banner up.
    fn replay_and_solve(&mut self) {
        self.parents.clear();
        let mut replay = Traversal::replay(self.maze.start(), self.maze.passages());
        loop {
            match replay.step(&mut self.maze, &mut self.parents) {
                StepOutcome::Visited(_) => {}
                StepOutcome::ReachedGoal => break,
                StepOutcome::Exhausted => {
                    unreachable!("passages form a spanning tree; the goal is always reachable")
                }
            }
        }
        self.banner = true;
        self.solve();
    }

    /// Common tail of both solve paths: drop the search, mark the goal, and
    /// point the trace cursor at it.
    fn solve(&mut self) {
        self.traversal = None;
        let goal = self.maze.goal();
        self.maze.set_state(goal, CellState::Solution);
        self.trace = Some(goal);
        self.mode = Mode::Solved;
    }

    /// Advances the solution trace by one parent link; a cell without a
    /// parent (the start) ends the trace. Safe to call after the trace is
    /// done.
    fn trace_step(&mut self) {
        let Some(cell) = self.trace else {
            return;
        };
        match self.parents.get(&cell).copied() {
            Some(parent) => {
                self.maze.set_state(parent, CellState::Solution);
                self.trace = Some(parent);
            }
            None => self.trace = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn session(width: u8, height: u8, seed: u64) -> Session {
        Session::generate(width, height, Some(seed)).unwrap()
    }

    /// Drive a solved session until the trace stops moving, then return the
    /// set of solution-marked cells.
    fn run_trace(session: &mut Session) -> HashSet<Cell> {
        let cell_count = session.maze().width() as usize * session.maze().height() as usize;
        for _ in 0..=cell_count {
            session.on_tick();
        }
        assert!(session.trace.is_none(), "trace not finished");
        let maze = session.maze();
        (0..maze.height())
            .flat_map(|y| (0..maze.width()).map(move |x| Cell::new(x, y)))
            .filter(|&cell| maze.state(cell) == CellState::Solution)
            .collect()
    }

    /// The unique tree path from goal back to start, via the parent map.
    fn tree_path(session: &Session) -> HashSet<Cell> {
        let mut path = HashSet::from([session.maze().goal()]);
        let mut walk = session.maze().goal();
        while let Some(&parent) = session.parents.get(&walk) {
            path.insert(parent);
            walk = parent;
        }
        assert_eq!(walk, session.maze().start());
        path
    }

    #[test]
    fn test_generate_rejects_zero_dimensions() {
        assert!(Session::generate(0, 3, Some(0)).is_err());
        assert!(Session::generate(3, 0, Some(0)).is_err());
    }

    #[test]
    fn test_fresh_session_is_idle() {
        let session = session(4, 4, 1);
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.current(), session.maze().start());
        assert!(session.searching().is_none());
        assert!(!session.win_banner());
    }

    #[test]
    fn test_tick_in_idle_is_a_no_op() {
        let mut session = session(4, 4, 2);
        session.on_tick();
        assert_eq!(session.mode(), Mode::Idle);
        assert!(session.parents.is_empty());
    }

    #[test]
    fn test_search_runs_to_solved() {
        for discipline in [Discipline::Breadth, Discipline::Depth] {
            let mut session = session(5, 5, 3);
            session.on_search_mode(discipline);
            assert_eq!(session.mode(), Mode::Searching);
            assert_eq!(session.searching(), Some(discipline));

            // Each tick dequeues one cell; 25 cells bound the search
            for _ in 0..25 {
                if session.mode() == Mode::Solved {
                    break;
                }
                session.on_tick();
            }
            assert_eq!(session.mode(), Mode::Solved);
            assert!(session.searching().is_none());
            assert!(!session.win_banner());
            assert_eq!(
                session.maze().state(session.maze().goal()),
                CellState::Solution
            );
        }
    }

    #[test]
    fn test_search_request_is_only_honored_from_idle() {
        {
            let mut session = session(5, 5, 4);
            session.on_search_mode(Discipline::Breadth);
            // A second request mid-run does not restart or flip the discipline
            session.on_search_mode(Discipline::Depth);
            assert_eq!(session.searching(), Some(Discipline::Breadth));
        }

        // Nor is a search honored from manual mode
        let mut session = session(5, 5, 4);
        session.on_direction(Direction::Right);
        assert_eq!(session.mode(), Mode::Manual);
        session.on_search_mode(Discipline::Depth);
        assert_eq!(session.mode(), Mode::Manual);
        assert!(session.searching().is_none());
    }

    #[test]
    fn test_directional_input_is_ignored_while_searching() {
        let mut session = session(5, 5, 5);
        session.on_search_mode(Discipline::Depth);
        let before = session.current();
        session.on_direction(Direction::Down);
        assert_eq!(session.mode(), Mode::Searching);
        assert_eq!(session.current(), before);
    }

    #[test]
    fn test_up_from_the_start_never_moves() {
        // No passage exists above the top row
        for seed in 0..10 {
            let mut session = session(6, 4, seed);
            session.on_direction(Direction::Up);
            assert_eq!(session.current(), session.maze().start());
            assert!(session.parents.is_empty());
            // The attempt still switches the session into manual mode
            assert_eq!(session.mode(), Mode::Manual);
        }
    }

    #[test]
    fn test_blocked_move_changes_nothing() {
        let mut session = session(5, 5, 6);
        // Whichever of right/down lacks a passage from the start is blocked;
        // a 5x5 spanning tree cannot connect the start to both and to
        // nothing, so probe both directions
        for direction in [Direction::Right, Direction::Down] {
            let before = session.current();
            let parents_before = session.parents.len();
            let target = session.maze().step_from(before, direction).unwrap();
            let legal = session.maze().passage_between(before, target);
            session.on_direction(direction);
            if legal {
                assert_eq!(session.current(), target);
                assert_eq!(session.parents.len(), parents_before + 1);
                assert_eq!(session.parents[&target], before);
            } else {
                assert_eq!(session.current(), before);
                assert_eq!(session.parents.len(), parents_before);
            }
        }
    }

    #[test]
    fn test_legal_move_marks_trail_and_current() {
        let mut session = session(2, 1, 0);
        // A 2x1 maze always has the single passage (0,0)-(1,0)
        let start = session.maze().start();
        session.on_direction(Direction::Right);
        assert_eq!(session.current(), Cell::new(1, 0));
        assert_eq!(session.maze().state(start), CellState::Trail);
        assert_eq!(session.parents[&Cell::new(1, 0)], start);
    }

    #[test]
    fn test_manual_walk_to_goal_raises_the_banner() {
        let mut session = session(2, 1, 7);
        session.on_direction(Direction::Right);
        assert_eq!(session.mode(), Mode::Solved);
        assert!(session.win_banner());
        // The traced ticks mark the whole route
        let solution = run_trace(&mut session);
        assert_eq!(
            solution,
            HashSet::from([Cell::new(0, 0), Cell::new(1, 0)])
        );
    }

    #[test]
    fn test_solved_ignores_everything_but_reset() {
        let mut session = session(2, 1, 8);
        session.on_direction(Direction::Right);
        assert_eq!(session.mode(), Mode::Solved);
        session.on_direction(Direction::Left);
        assert_eq!(session.mode(), Mode::Solved);
        assert_eq!(session.current(), session.maze().goal());
        session.on_search_mode(Discipline::Breadth);
        assert!(session.searching().is_none());

        session.on_reset();
        assert_eq!(session.mode(), Mode::Idle);
        assert!(!session.win_banner());
        assert_eq!(session.current(), session.maze().start());
    }

    #[test]
    fn test_trace_marks_exactly_the_tree_path_and_is_idempotent() {
        let mut session = session(5, 5, 9);
        session.on_search_mode(Discipline::Breadth);
        for _ in 0..25 {
            if session.mode() == Mode::Solved {
                break;
            }
            session.on_tick();
        }
        assert_eq!(session.mode(), Mode::Solved);

        let expected = tree_path(&session);
        let first = run_trace(&mut session);
        assert_eq!(first, expected);
        // Extra ticks after the trace finished change nothing
        let second = run_trace(&mut session);
        assert_eq!(second, expected);
    }

    #[test]
    fn test_reset_regenerates_the_maze() {
        let mut session = session(8, 8, 10);
        let edge_key = |session: &Session| -> Vec<(Cell, Cell)> {
            let mut key: Vec<(Cell, Cell)> = session
                .maze()
                .passages()
                .iter()
                .map(|e| (e.a, e.b))
                .collect();
            key.sort_by_key(|&(a, b)| (a.x, a.y, b.x, b.y));
            key
        };
        let before = edge_key(&session);

        session.on_search_mode(Discipline::Depth);
        session.on_tick();
        session.on_reset();

        assert_eq!(session.mode(), Mode::Idle);
        assert!(session.parents.is_empty());
        assert!(session.searching().is_none());
        // Same dimensions, fresh weights: the passage set is recomputed
        assert_eq!(session.maze().passages().len(), 8 * 8 - 1);
        assert_ne!(edge_key(&session), before);
        // And the regenerated maze satisfies the same invariants
        let maze = session.maze();
        assert_eq!(maze.state(maze.start()), CellState::Start);
        assert_eq!(maze.state(maze.goal()), CellState::Goal);
    }
}
