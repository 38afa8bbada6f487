//! Headless simulation.
//!
//! Runs the same controller the TUI uses, with a fixed-step clock and the
//! recording audio output, and reports what happened frame by frame.

use std::time::Duration;

use serde::Serialize;

use crate::cli::args::{OutputFormat, SimulateArgs};
use crate::config::Config;
use crate::controller::{Controller, Intent, StatusSnapshot};
use crate::core::FixedStepClock;
use crate::error::PomodeskError;
use crate::features::audio::{AudioCommand, RecordingOutput};
use crate::features::focus::Transition;
use crate::output::format_simulation;

/// An intent submitted before a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledIntent {
    pub frame: u32,
    pub intent: Intent,
}

/// Everything observable during one frame. Quiet frames are not recorded.
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub frame: u32,
    /// Simulated time at the start of the frame
    pub at_secs: u64,
    pub intents: Vec<Intent>,
    pub transitions: Vec<Transition>,
    pub commands: Vec<AudioCommand>,
    pub errors: Vec<String>,
}

/// Result of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub frames: u32,
    pub step_secs: u64,
    pub work_secs: u64,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
    pub cycles_before_long_break: u32,
    pub rounds: Option<u32>,
    /// Commands issued while setting up the output
    pub setup: Vec<AudioCommand>,
    pub events: Vec<FrameRecord>,
    /// Commands issued while shutting down
    pub teardown: Vec<AudioCommand>,
    #[serde(rename = "final")]
    pub final_state: StatusSnapshot,
}

/// Parse `name@frame` entries separated by commas. A missing `@frame`
/// means frame 0.
///
/// # Errors
///
/// Returns `PomodeskError::Configuration` for unknown intents or frames.
pub fn parse_schedule(input: &str) -> Result<Vec<ScheduledIntent>, PomodeskError> {
    let mut schedule = Vec::new();

    for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, frame) = match entry.rsplit_once('@') {
            Some((name, frame)) => {
                let frame = frame.trim().parse::<u32>().map_err(|_| {
                    PomodeskError::Configuration(format!("Invalid frame in '{entry}'"))
                })?;
                (name, frame)
            }
            None => (entry, 0),
        };

        let intent = Intent::parse(name).ok_or_else(|| {
            PomodeskError::Configuration(format!(
                "Unknown intent '{name}'. Use start, pause, resume, stop, reset, mute, unmute, volume=N or preset=NAME."
            ))
        })?;

        schedule.push(ScheduledIntent { frame, intent });
    }

    // Stable: intents for the same frame keep their order.
    schedule.sort_by_key(|s| s.frame);
    Ok(schedule)
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error for an invalid timer configuration or schedule, or if
/// output formatting fails.
pub fn simulate(config: &Config, args: &SimulateArgs, format: OutputFormat) -> Result<String, PomodeskError> {
    let report = run_simulation(config, args)?;
    format_simulation(&report, format)
}

fn run_simulation(config: &Config, args: &SimulateArgs) -> Result<SimulationReport, PomodeskError> {
    let session = config.session_config_with(&args.timer.overrides())?;
    let schedule = parse_schedule(&args.intents)?;
    let settings = super::audio_settings(config, &args.audio);

    let mut output = RecordingOutput::new();
    output.set_unavailable(args.no_audio);

    let mut controller = Controller::new(
        session,
        settings,
        config.cue_levels(),
        output,
        FixedStepClock::new(args.step),
    );
    let setup = controller.cues_mut().output_mut().take_commands();

    tracing::info!(
        frames = args.frames,
        step_secs = args.step.as_secs(),
        intents = schedule.len(),
        "starting simulation"
    );

    let mut events = Vec::new();
    let mut queued = schedule.iter().peekable();

    for frame in 0..args.frames {
        let mut intents = Vec::new();
        while let Some(scheduled) = queued.next_if(|s| s.frame == frame) {
            controller.submit(scheduled.intent);
            intents.push(scheduled.intent);
        }

        let report = controller.frame();
        let commands = controller.cues_mut().output_mut().take_commands();

        if intents.is_empty()
            && report.transitions.is_empty()
            && commands.is_empty()
            && report.errors.is_empty()
        {
            continue;
        }

        events.push(FrameRecord {
            frame,
            at_secs: args.step.saturating_mul(frame).as_secs(),
            intents,
            transitions: report.transitions,
            commands,
            errors: report.errors.iter().map(ToString::to_string).collect(),
        });
    }

    if let Some(skipped) = queued.next() {
        tracing::warn!(frame = skipped.frame, intent = %skipped.intent, "intent scheduled past the last frame");
    }

    let final_state = controller.snapshot();
    controller.shutdown();
    let teardown = controller.cues_mut().output_mut().take_commands();

    Ok(SimulationReport {
        frames: args.frames,
        step_secs: args.step.as_secs(),
        work_secs: session.work_duration().as_secs(),
        short_break_secs: session.break_duration().as_secs(),
        long_break_secs: session.long_break_duration().as_secs(),
        cycles_before_long_break: session.cycles_before_long_break(),
        rounds: session.rounds(),
        setup,
        events,
        teardown,
        final_state,
    })
}

/// Simulated time covered by a run.
#[must_use]
pub fn simulated_span(report: &SimulationReport) -> Duration {
    Duration::from_secs(report.step_secs.saturating_mul(u64::from(report.frames)))
}
