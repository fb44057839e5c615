mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, RecvTimeoutError, Sender},
    },
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    queue,
    terminal::{self, ClearType},
};

use crate::maze::{CellState, Direction};
use crate::session::{Discipline, Session};
use renderer::Renderer;

enum UserInputEvent {
    KeyPress(event::KeyEvent),
    Resize,
}

/// The terminal host: owns the fixed tick cadence and delivers ticks and
/// key events to the session one at a time.
pub struct App {
    /// Time between session ticks while no input arrives
    tick_interval: Duration,
    /// Timeout for polling input events in the input thread, a.k.a.
    /// how often to check the stop flag
    input_poll_timeout: Duration,
}

impl Default for App {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(25),
            input_poll_timeout: Duration::from_millis(100),
        }
    }
}

impl App {
    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate
    /// screen even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Widest maze whose doubled grid fits in `term_width` columns.
    pub fn max_maze_width(term_width: u16) -> u8 {
        let grid_columns = term_width / CellState::CELL_WIDTH;
        (grid_columns.saturating_sub(1) / 2).min(u8::MAX as u16) as u8
    }

    /// Tallest maze whose doubled grid plus the status line fits in
    /// `term_height` rows.
    pub fn max_maze_height(term_height: u16) -> u8 {
        let grid_rows = term_height.saturating_sub(Renderer::NUM_LOG_ROWS);
        (grid_rows.saturating_sub(1) / 2).min(u8::MAX as u16) as u8
    }

    /// Runs one session until the user exits with Esc.
    pub fn run(&self, width: u8, height: u8) -> std::io::Result<()> {
        let mut session =
            Session::generate(width, height, None).map_err(std::io::Error::other)?;
        let mut renderer = Renderer::new();
        renderer.draw(&session)?;

        // Flag to let the input thread stop. Enabled by the main loop only.
        let should_stop = Arc::new(AtomicBool::new(false));
        let (input_tx, input_rx) = std::sync::mpsc::channel::<UserInputEvent>();
        let should_stop_for_input = should_stop.clone();
        let poll_timeout = self.input_poll_timeout;
        let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
            App::listen_to_user_input(input_tx, poll_timeout, &should_stop_for_input)
        });

        let result = self.event_loop(&mut session, &mut renderer, input_rx);

        should_stop.store(true, Ordering::Release);
        input_thread_handle.join().expect("Input thread panicked")?;
        result
    }

    /// Main loop: a tick per interval, a session handler call per key event,
    /// a redraw after either.
    fn event_loop(
        &self,
        session: &mut Session,
        renderer: &mut Renderer,
        input_rx: Receiver<UserInputEvent>,
    ) -> std::io::Result<()> {
        tracing::info!("[app] Entering event loop");
        loop {
            match input_rx.recv_timeout(self.tick_interval) {
                Err(RecvTimeoutError::Timeout) => {
                    session.on_tick();
                    renderer.draw(session)?;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    // Input thread has exited, nothing more can arrive
                    tracing::info!("[app] Input channel closed, exiting event loop");
                    return Ok(());
                }
                Ok(UserInputEvent::KeyPress(key_event)) => {
                    match key_event.code {
                        KeyCode::Esc => {
                            tracing::info!("[app] Esc pressed, exiting event loop");
                            return Ok(());
                        }
                        KeyCode::Char('b') => session.on_search_mode(Discipline::Breadth),
                        KeyCode::Char('d') => session.on_search_mode(Discipline::Depth),
                        KeyCode::Char('r') => session.on_reset(),
                        KeyCode::Up => session.on_direction(Direction::Up),
                        KeyCode::Down => session.on_direction(Direction::Down),
                        KeyCode::Left => session.on_direction(Direction::Left),
                        KeyCode::Right => session.on_direction(Direction::Right),
                        _ => {} // Ignore other keys
                    }
                    renderer.draw(session)?;
                }
                Ok(UserInputEvent::Resize) => {
                    renderer.draw(session)?;
                }
            }
        }
    }

    /// Listen for user input events (key presses and resize)
    /// This function runs in a separate thread, and is the only place where
    /// user input is read
    fn listen_to_user_input(
        input_tx: Sender<UserInputEvent>,
        event_poll_timeout: Duration,
        should_stop: &AtomicBool,
    ) -> std::io::Result<()> {
        loop {
            if should_stop.load(Ordering::Acquire) {
                return Ok(());
            }

            // Poll for events with a timeout so the stop flag is checked
            // between arrivals
            if !event::poll(event_poll_timeout)? {
                continue;
            }

            let input_event = match event::read()? {
                event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                    UserInputEvent::KeyPress(key_event)
                }
                event::Event::Resize(_, _) => UserInputEvent::Resize,
                _ => continue, // Ignore other events
            };

            // Should exit input thread on Esc key
            let should_exit = matches!(
                input_event,
                UserInputEvent::KeyPress(event::KeyEvent {
                    code: KeyCode::Esc,
                    ..
                })
            );

            if input_tx.send(input_event).is_err() {
                // Receiver has been dropped, exit the thread
                return Ok(());
            }

            if should_exit {
                tracing::debug!("[input loop] Esc key pressed, exiting");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_maze_size_from_terminal_size() {
        // 80 columns fit 40 doubled-grid columns, so 19 cells across
        assert_eq!(App::max_maze_width(80), 19);
        // 24 rows minus the status line fit an 11-cell-tall maze
        assert_eq!(App::max_maze_height(24), 11);
        // Degenerate terminals fit nothing
        assert_eq!(App::max_maze_width(0), 0);
        assert_eq!(App::max_maze_height(1), 0);
    }
}
