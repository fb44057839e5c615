use crossterm::style::{Color, Stylize};

use std::fmt;

/// A grid position. Two cells are the same cell iff their coordinates match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    pub fn new(x: u8, y: u8) -> Self {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A cardinal step request from manual navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Display state of a cell. Written by the session as exploration progresses,
/// read only by the renderer.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Not yet touched by any search or walk.
    #[default]
    Unvisited,
    /// The fixed entry cell.
    Start,
    /// The fixed exit cell.
    Goal,
    /// Dequeued by a breadth-first search.
    BreadthVisited,
    /// Popped by a depth-first search.
    DepthVisited,
    /// The manually controlled occupant.
    Current,
    /// A cell the occupant has walked through.
    Trail,
    /// Part of the reconstructed route from start to goal.
    Solution,
}

impl CellState {
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            CellState::Unvisited => "  ".with(Color::Reset),
            CellState::Start => "🟩".with(Color::Green),
            CellState::Goal => "🟥".with(Color::Red),
            CellState::BreadthVisited => "* ".with(Color::Cyan),
            CellState::DepthVisited => "* ".with(Color::Magenta),
            CellState::Current => "🟡".with(Color::Yellow),
            CellState::Trail => ". ".with(Color::DarkGrey),
            CellState::Solution => "🟧".with(Color::Yellow),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                CellState::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_equality() {
        assert_eq!(Cell::new(3, 7), Cell::new(3, 7));
        assert_ne!(Cell::new(3, 7), Cell::new(7, 3));
    }

    #[test]
    fn test_cell_states_render_two_columns_wide() {
        // The Display impl asserts the width itself in debug builds
        for state in [
            CellState::Unvisited,
            CellState::Start,
            CellState::Goal,
            CellState::BreadthVisited,
            CellState::DepthVisited,
            CellState::Current,
            CellState::Trail,
            CellState::Solution,
        ] {
            let _ = state.to_string();
        }
    }
}
