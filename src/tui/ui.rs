//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::core::{format_mmss, ClockSource};
use crate::features::audio::AudioOutput;
use crate::features::focus::Phase;
use crate::tui::app::{App, HELP_TEXT};

const fn phase_color(phase: Phase) -> Color {
    if phase.is_break() {
        return Color::Green;
    }
    match phase {
        Phase::Working => Color::Red,
        Phase::Paused => Color::Yellow,
        Phase::Finished => Color::Cyan,
        _ => Color::DarkGray,
    }
}

/// Render the application UI.
pub fn render<A: AudioOutput, C: ClockSource>(frame: &mut Frame<'_>, app: &App<A, C>) {
    // Create layout: header, timer, progress, details, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Timer
            Constraint::Length(3), // Progress
            Constraint::Min(0),    // Details
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_timer(frame, app, chunks[1]);
    render_progress(frame, app, chunks[2]);
    render_details(frame, app, chunks[3]);
    render_status_bar(frame, app, chunks[4]);
}

/// The phase the countdown belongs to; paused sessions show the frozen one.
fn shown_phase<A: AudioOutput, C: ClockSource>(app: &App<A, C>) -> Phase {
    let machine = app.controller.machine();
    machine.state().pre_pause_phase.unwrap_or_else(|| machine.phase())
}

fn render_header<A: AudioOutput, C: ClockSource>(frame: &mut Frame<'_>, app: &App<A, C>, area: Rect) {
    let phase = app.controller.current_phase();
    let mut title = format!(" pomodesk  {phase}");
    if let Some(paused) = app.controller.machine().state().pre_pause_phase {
        title.push_str(&format!(" ({paused})"));
    }

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(phase_color(phase))
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(phase_color(phase))),
        );

    frame.render_widget(header, area);
}

fn render_timer<A: AudioOutput, C: ClockSource>(frame: &mut Frame<'_>, app: &App<A, C>, area: Rect) {
    let remaining = format_mmss(app.controller.remaining_time());
    let timer = Paragraph::new(Line::from(Span::styled(
        remaining,
        Style::default()
            .fg(phase_color(shown_phase(app)))
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" Remaining "));

    frame.render_widget(timer, area);
}

fn render_progress<A: AudioOutput, C: ClockSource>(frame: &mut Frame<'_>, app: &App<A, C>, area: Rect) {
    let progress = app.controller.progress().clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(phase_color(shown_phase(app))))
        .ratio(progress)
        .label(format!("{:.0}%", progress * 100.0));

    frame.render_widget(gauge, area);
}

fn render_details<A: AudioOutput, C: ClockSource>(frame: &mut Frame<'_>, app: &App<A, C>, area: Rect) {
    let controller = &app.controller;
    let settings = controller.settings();
    let label = Style::default().fg(Color::DarkGray);

    let ends = app
        .phase_end()
        .map_or_else(|| "-".to_string(), |t| t.format("%H:%M").to_string());

    let volume = if settings.muted {
        Span::styled("muted", Style::default().fg(Color::Yellow))
    } else {
        Span::raw(format!("{}%", settings.volume))
    };

    let ambience_state = match controller.cues().ambience() {
        Some(active) if active.paused => "paused",
        Some(_) => "playing",
        None => "off",
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Cycles    ", label),
            Span::raw(controller.completed_cycles().to_string()),
            Span::styled(
                format!(
                    "  (long break every {})",
                    controller.machine().config().cycles_before_long_break()
                ),
                label,
            ),
        ]),
        Line::from(vec![Span::styled("Ends at   ", label), Span::raw(ends)]),
        Line::from(vec![Span::styled("Volume    ", label), volume]),
        Line::from(vec![
            Span::styled("Ambience  ", label),
            Span::raw(format!("{} ({ambience_state})", settings.ambience_preset)),
        ]),
    ];

    let details = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(details, area);
}

fn render_status_bar<A: AudioOutput, C: ClockSource>(frame: &mut Frame<'_>, app: &App<A, C>, area: Rect) {
    let status_text = if app.show_help {
        HELP_TEXT
    } else {
        app.status.as_deref().unwrap_or(HELP_TEXT)
    };

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use ratatui::{backend::TestBackend, Terminal};

    use crate::controller::{Controller, Intent};
    use crate::core::FixedStepClock;
    use crate::features::audio::{AudioSettings, CueLevels, RecordingOutput};
    use crate::features::focus::SessionConfig;

    fn screen(app: &App<RecordingOutput, FixedStepClock>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_phase_colors() {
        assert_eq!(phase_color(Phase::ShortBreak), Color::Green);
        assert_eq!(phase_color(Phase::LongBreak), Color::Green);
        assert_eq!(phase_color(Phase::Working), Color::Red);
        assert_eq!(phase_color(Phase::Idle), Color::DarkGray);
    }

    #[test]
    fn test_render_idle_and_working() {
        let mut app = App::new(Controller::new(
            SessionConfig::default(),
            AudioSettings::default(),
            CueLevels::default(),
            RecordingOutput::new(),
            FixedStepClock::new(Duration::from_secs(60)),
        ));

        let idle = screen(&app);
        assert!(idle.contains("Idle"));
        assert!(idle.contains("25:00"));
        assert!(idle.contains("rain (off)"));

        app.submit(Intent::Start);
        app.tick();
        app.tick();

        let working = screen(&app);
        assert!(working.contains("Working"));
        assert!(working.contains("24:00"));
        assert!(working.contains("rain (playing)"));
    }
}
