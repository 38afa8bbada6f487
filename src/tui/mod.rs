//! Terminal User Interface (TUI) for pomodesk.
//!
//! Shows the running session and maps key presses to intents. Built with
//! ratatui and crossterm. Every loop iteration is one frame: wait for a key
//! (at most one frame period), then run the controller frame, then draw.

mod app;
mod event;
mod ui;

pub use app::App;

use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::controller::Controller;
use crate::core::ClockSource;
use crate::error::PomodeskError;
use crate::features::audio::AudioOutput;

/// Run the TUI application until the user quits.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run<A: AudioOutput, C: ClockSource>(
    controller: Controller<A, C>,
    frame_period: Duration,
) -> Result<(), PomodeskError> {
    // Setup terminal
    enable_raw_mode()
        .map_err(|e| PomodeskError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| PomodeskError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| PomodeskError::Terminal(format!("Failed to create terminal: {e}")))?;

    let mut app = App::new(controller);
    let result = run_app(&mut terminal, &mut app, frame_period);

    // Audio stops even if the loop failed.
    if !app.should_quit {
        app.quit();
    }

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend, A: AudioOutput, C: ClockSource>(
    terminal: &mut Terminal<B>,
    app: &mut App<A, C>,
    frame_period: Duration,
) -> Result<(), PomodeskError> {
    tracing::info!(frame_ms = frame_period.as_millis(), "tui started");

    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| PomodeskError::Terminal(format!("Failed to draw: {e}")))?;

        match event::handle_events(app, frame_period)? {
            Some(event::Action::Quit) => {
                app.quit();
                break;
            }
            Some(event::Action::Help) => app.toggle_help(),
            Some(event::Action::Submit(intent)) => app.submit(intent),
            None => {}
        }

        app.tick();
    }

    tracing::info!(
        phase = %app.controller.current_phase(),
        completed_cycles = app.controller.completed_cycles(),
        "tui stopped"
    );
    Ok(())
}
