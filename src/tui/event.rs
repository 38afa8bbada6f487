//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::controller::Intent;
use crate::core::ClockSource;
use crate::error::PomodeskError;
use crate::features::audio::AudioOutput;
use crate::tui::app::App;

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Queue an intent for the next frame.
    Submit(Intent),
    /// Show or hide the key help.
    Help,
}

/// Wait up to `timeout` for a key press.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events<A: AudioOutput, C: ClockSource>(
    app: &App<A, C>,
    timeout: Duration,
) -> Result<Option<Action>, PomodeskError> {
    if !event::poll(timeout)
        .map_err(|e| PomodeskError::Terminal(format!("Event poll failed: {e}")))?
    {
        return Ok(None);
    }

    match event::read().map_err(|e| PomodeskError::Terminal(format!("Event read failed: {e}")))? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key(key, app)),
        _ => Ok(None),
    }
}

/// Translate a key press into an action.
pub fn map_key<A: AudioOutput, C: ClockSource>(key: KeyEvent, app: &App<A, C>) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('?') => Action::Help,

        // Session
        KeyCode::Char('s') => Action::Submit(Intent::Start),
        KeyCode::Char('p' | ' ') => Action::Submit(app.toggle_pause_intent()),
        KeyCode::Char('x') => Action::Submit(Intent::Stop),
        KeyCode::Char('r') => Action::Submit(Intent::Reset),

        // Audio
        KeyCode::Char('m') => Action::Submit(app.toggle_mute_intent()),
        KeyCode::Char('+' | '=') | KeyCode::Up => Action::Submit(app.volume_up_intent()),
        KeyCode::Char('-') | KeyCode::Down => Action::Submit(app.volume_down_intent()),
        KeyCode::Char(c @ '1'..='9') => {
            let index = c.to_digit(10)? as usize;
            Action::Submit(App::<A, C>::preset_intent(index)?)
        }

        _ => return None,
    };

    Some(action)
}
