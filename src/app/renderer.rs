use std::collections::HashSet;
use std::io::{Stdout, Write};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::maze::Cell;
use crate::session::{Mode, Session};

/// Draws the session as a doubled character grid: cells sit at odd
/// coordinates, the positions between them are open corridor or wall, and
/// the border and junction positions are always wall.
pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
}

/// Grid position of the barrier between the two endpoints of a wall edge.
fn wall_midpoint(a: Cell, b: Cell) -> (u16, u16) {
    (
        a.x as u16 + b.x as u16 + 1,
        a.y as u16 + b.y as u16 + 1,
    )
}

impl Renderer {
    /// Rows reserved below the grid for the status line.
    pub const NUM_LOG_ROWS: u16 = 1;

    pub fn new() -> Self {
        Renderer {
            stdout: std::io::stdout(),
        }
    }

    /// Redraws the whole frame: the doubled grid and the status line.
    pub fn draw(&mut self, session: &Session) -> std::io::Result<()> {
        let maze = session.maze();
        let grid_width = maze.width() as u16 * 2 + 1;
        let grid_height = maze.height() as u16 * 2 + 1;
        let blocked: HashSet<(u16, u16)> = maze
            .walls()
            .iter()
            .map(|edge| wall_midpoint(edge.a, edge.b))
            .collect();

        queue!(self.stdout, cursor::MoveTo(0, 0))?;
        for gy in 0..grid_height {
            for gx in 0..grid_width {
                if gx % 2 == 1 && gy % 2 == 1 {
                    let cell = Cell::new((gx / 2) as u8, (gy / 2) as u8);
                    queue!(self.stdout, style::Print(maze.state(cell)))?;
                } else if gx % 2 == 0 && gy % 2 == 0 {
                    // Junction between four cells
                    queue!(self.stdout, style::PrintStyledContent("⬜".with(Color::White)))?;
                } else if gx == 0
                    || gy == 0
                    || gx == grid_width - 1
                    || gy == grid_height - 1
                    || blocked.contains(&(gx, gy))
                {
                    queue!(self.stdout, style::PrintStyledContent("⬜".with(Color::White)))?;
                } else {
                    queue!(self.stdout, style::Print("  "))?;
                }
            }
            queue!(self.stdout, style::Print("\r\n"))?;
        }
        self.status(grid_height, status_line(session))?;
        self.stdout.flush()
    }

    /// Prints a message on the row below the grid, truncated to the terminal
    /// width. None clears the row.
    fn status(&mut self, row: u16, msg: Option<StyledContent<String>>) -> std::io::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        if let Some(msg) = msg {
            let (term_width, _) = terminal::size()?;
            let (truncated, _) = msg.content().unicode_truncate(term_width as usize);
            queue!(
                self.stdout,
                style::PrintStyledContent(StyledContent::new(*msg.style(), truncated.to_string()))
            )?;
        }
        Ok(())
    }
}

/// The status line matching the session's mode.
fn status_line(session: &Session) -> Option<StyledContent<String>> {
    if session.win_banner() {
        return Some(
            "Congratulations! You reached the goal. Press r for a new maze, or Esc to exit."
                .to_string()
                .with(Color::Green)
                .attribute(Attribute::Bold),
        );
    }
    match session.mode() {
        Mode::Idle => Some(
            "b/d: breadth/depth-first search  arrows: walk  r: new maze  Esc: exit"
                .to_string()
                .with(Color::Cyan),
        ),
        Mode::Searching => session
            .searching()
            .map(|discipline| format!("Searching with {}...", discipline).with(Color::Yellow)),
        Mode::Solved => Some(
            "Goal found! Tracing the route... Press r for a new maze."
                .to_string()
                .with(Color::Yellow),
        ),
        Mode::Manual => Some(
            "Walk to the red goal with the arrow keys."
                .to_string()
                .with(Color::Cyan),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Cell;

    #[test]
    fn test_wall_midpoint_sits_between_the_cells() {
        // Cells (x, y) map to grid (2x+1, 2y+1); the barrier is the shared
        // in-between position
        assert_eq!(wall_midpoint(Cell::new(0, 0), Cell::new(1, 0)), (2, 1));
        assert_eq!(wall_midpoint(Cell::new(0, 0), Cell::new(0, 1)), (1, 2));
        assert_eq!(wall_midpoint(Cell::new(3, 2), Cell::new(3, 3)), (7, 6));
    }
}
