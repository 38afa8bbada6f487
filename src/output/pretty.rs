use std::time::Duration;

use colored::{ColoredString, Colorize};

use crate::cli::commands::SimulationReport;
use crate::controller::StatusSnapshot;
use crate::core::{format_duration, format_mmss, render_progress_bar};
use crate::features::focus::{Phase, TransitionKind};

/// Phase name colored by phase kind
pub fn phase_label(phase: Phase) -> ColoredString {
    let name = phase.display_name();
    if phase.is_break() {
        return name.green().bold();
    }
    match phase {
        Phase::Working => name.red().bold(),
        Phase::Paused => name.yellow().bold(),
        Phase::Finished => name.cyan().bold(),
        _ => name.dimmed(),
    }
}

/// Format a status snapshot as pretty output
pub fn format_status_pretty(status: &StatusSnapshot) -> String {
    let mut output = format!("{}", phase_label(status.phase));
    if let Some(paused) = status.paused_phase {
        output.push_str(&format!(" ({})", paused.display_name().dimmed()));
    }
    output.push_str(&format!(
        "  {} remaining\n",
        format_mmss(Duration::from_secs(status.remaining_secs)).bold()
    ));

    let total = status.elapsed_secs + status.remaining_secs;
    if total > 0 && (status.phase.is_running() || status.paused_phase.is_some()) {
        #[allow(clippy::cast_precision_loss)]
        let progress = status.elapsed_secs as f64 / total as f64;
        output.push_str(&format!("  {}\n", render_progress_bar(progress, 30)));
    }
    output.push_str(&format!(
        "  {}: {}\n",
        "Cycles".dimmed(),
        status.completed_cycles
    ));

    let sound = if status.muted {
        format!("{} ({}%)", "muted".yellow(), status.volume)
    } else {
        format!("{}%", status.effective_volume)
    };
    let ambience = if status.ambience_playing {
        format!("{} (playing)", status.ambience)
    } else {
        status.ambience.to_string()
    };
    output.push_str(&format!("  {}: {}\n", "Volume".dimmed(), sound));
    output.push_str(&format!("  {}: {}", "Ambience".dimmed(), ambience));
    output
}

/// Format a simulation report as a frame-by-frame log
pub fn format_simulation_pretty(report: &SimulationReport) -> String {
    let secs = Duration::from_secs;
    let mut output = format!(
        "{} {} frames of {} ({})\n",
        "Simulation".bold(),
        report.frames,
        format_duration(secs(report.step_secs)),
        format_duration(crate::cli::commands::simulated_span(report)),
    );
    output.push_str(&format!(
        "  work {}, short break {}, long break {} every {} cycles",
        format_mmss(secs(report.work_secs)),
        format_mmss(secs(report.short_break_secs)),
        format_mmss(secs(report.long_break_secs)),
        report.cycles_before_long_break,
    ));
    if let Some(rounds) = report.rounds {
        output.push_str(&format!(", {rounds} rounds"));
    }
    output.push('\n');
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for event in &report.events {
        output.push_str(&format!(
            "{} {}",
            format_mmss(secs(event.at_secs)).bold(),
            format!("frame {}", event.frame).dimmed()
        ));
        for intent in &event.intents {
            output.push_str(&format!("  > {}", intent.to_string().cyan()));
        }
        output.push('\n');

        for transition in &event.transitions {
            let kind = match transition.kind {
                TransitionKind::Completed => "completed".green(),
                TransitionKind::Started => "started".normal(),
                TransitionKind::Paused => "paused".yellow(),
                TransitionKind::Resumed => "resumed".normal(),
                TransitionKind::Stopped => "stopped".red(),
                TransitionKind::Reset => "reset".red(),
            };
            output.push_str(&format!(
                "    {} -> {}  {}\n",
                phase_label(transition.from),
                phase_label(transition.to),
                kind
            ));
        }
        for command in &event.commands {
            output.push_str(&format!("    {} {}\n", "♪".blue(), command.to_string().dimmed()));
        }
        for error in &event.errors {
            output.push_str(&format!("    {} {}\n", "!".red().bold(), error));
        }
    }

    output.push_str(&"─".repeat(60));
    output.push('\n');
    output.push_str(&format_status_pretty(&report.final_state));
    output
}
