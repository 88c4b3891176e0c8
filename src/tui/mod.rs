//! Terminal User Interface
//!
//! Ratatui front-end: five screens driven by one event loop.

pub mod app;
pub mod events;
pub mod render;
pub mod screens;

pub use app::App;
pub use events::{EventHandler, TuiEvent};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

/// Take over the terminal and run the app until it quits. The terminal is
/// restored even when the loop fails.
pub async fn run(mut app: App) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste, Hide)
        .context("Failed to enter alternate screen")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;

    let result = run_loop(&mut terminal, &mut app).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        Show,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )
    .context("Failed to leave alternate screen")?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    EventHandler::start_terminal_listener(app.event_sender());

    loop {
        terminal
            .draw(|f| render::render(f, app))
            .context("Failed to draw frame")?;

        let Some(event) = app.next_event().await else {
            tracing::warn!("Event channel closed");
            break;
        };
        app.handle_event(event).await?;

        if app.should_quit {
            tracing::info!("Quitting");
            break;
        }
    }
    Ok(())
}
