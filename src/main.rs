mod app;
mod maze;
mod session;

use app::App;
use crossterm::terminal;

/// Log to a file; the terminal belongs to the renderer while the app runs.
/// The returned guard must live until the process exits so buffered lines
/// are flushed.
fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::never(std::env::temp_dir(), "mazeway.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}

fn main() -> std::io::Result<()> {
    let _guard = init_tracing();

    let mut input = String::new();
    println!("Enter maze dimensions (width height). Maximum size is 255x255:");
    std::io::stdin().read_line(&mut input)?;

    // Parse the input dimensions
    let dims = input
        .split_whitespace()
        .take(2)
        .filter_map(|s| s.parse::<u8>().ok())
        .collect::<Vec<_>>();

    if dims.len() != 2 {
        eprintln!("Please enter two valid numbers for width and height.");
        return Ok(());
    }

    let (width, height) = (dims[0], dims[1]);
    if width < 1 || height < 1 {
        eprintln!("Width and height must be at least 1.");
        return Ok(());
    }

    // The doubled grid plus the status line has to fit the terminal
    if let Ok((term_width, term_height)) = terminal::size() {
        let (max_width, max_height) = (
            App::max_maze_width(term_width),
            App::max_maze_height(term_height),
        );
        if width > max_width || height > max_height {
            eprintln!(
                "A {}x{} maze does not fit this terminal; the largest that fits is {}x{}.",
                width, height, max_width, max_height
            );
            return Ok(());
        }
    }

    tracing::info!("[main] Starting with a {}x{} maze", width, height);

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::default().run(width, height);
    App::restore_terminal(&mut stdout)?;
    result
}
