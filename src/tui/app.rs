//! Application state for the TUI.

use chrono::{DateTime, Local};

use crate::controller::{Controller, Intent};
use crate::core::ClockSource;
use crate::features::audio::{AmbiencePreset, AudioOutput, MAX_VOLUME};
use crate::features::focus::TransitionKind;

/// Volume change per key press.
pub const VOLUME_STEP: u8 = 5;

pub const HELP_TEXT: &str =
    "s:start | p:pause/resume | x:stop | r:reset | m:mute | +/-:volume | 1/2/3:rain/wave/wind | q:quit";

/// Application state.
pub struct App<A: AudioOutput, C: ClockSource> {
    /// The session and its audio cues.
    pub controller: Controller<A, C>,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the key help replaces the status line.
    pub show_help: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<A: AudioOutput, C: ClockSource> App<A, C> {
    /// Create a new app instance.
    pub fn new(controller: Controller<A, C>) -> Self {
        Self {
            controller,
            status: Some("Press s to start, ? for help".to_string()),
            show_help: false,
            should_quit: false,
        }
    }

    /// Queue an intent for the next frame.
    pub fn submit(&mut self, intent: Intent) {
        self.controller.submit(intent);
    }

    /// Run one controller frame and update the status line from it.
    pub fn tick(&mut self) {
        let report = self.controller.frame();

        for transition in &report.transitions {
            let message = match transition.kind {
                TransitionKind::Completed => {
                    format!("{} done, {} started", transition.from, transition.to)
                }
                TransitionKind::Started => "Session started".to_string(),
                TransitionKind::Paused => "Paused".to_string(),
                TransitionKind::Resumed => format!("Resumed {}", transition.to),
                TransitionKind::Stopped => "Stopped".to_string(),
                TransitionKind::Reset => "Reset".to_string(),
            };
            self.status = Some(message);
        }

        for error in &report.errors {
            if error.is_fatal() {
                tracing::error!(error = %error, "frame error");
            }
        }

        // Errors win over transition messages; the last one is shown.
        if let Some(error) = report.errors.last() {
            self.status = Some(error.to_string());
        }
    }

    /// Intent for the pause key: pause, resume or start.
    pub fn toggle_pause_intent(&self) -> Intent {
        self.controller.toggle_intent()
    }

    pub fn toggle_mute_intent(&self) -> Intent {
        Intent::SetMuted(!self.controller.settings().muted)
    }

    pub fn volume_up_intent(&self) -> Intent {
        let volume = self.controller.settings().volume;
        Intent::SetVolume(volume.saturating_add(VOLUME_STEP).min(MAX_VOLUME))
    }

    pub fn volume_down_intent(&self) -> Intent {
        let volume = self.controller.settings().volume;
        Intent::SetVolume(volume.saturating_sub(VOLUME_STEP))
    }

    /// Preset bound to a number key (1-based).
    pub fn preset_intent(index: usize) -> Option<Intent> {
        index
            .checked_sub(1)
            .and_then(|i| AmbiencePreset::ALL.get(i).copied())
            .map(Intent::SetAmbiencePreset)
    }

    /// Wall-clock time the current phase ends, if it is counting down.
    pub fn phase_end(&self) -> Option<DateTime<Local>> {
        if !self.controller.current_phase().is_running() {
            return None;
        }
        let remaining = chrono::Duration::from_std(self.controller.remaining_time()).ok()?;
        Local::now().checked_add_signed(remaining)
    }

    /// Show or hide the key help.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Stop audio before leaving.
    pub fn quit(&mut self) {
        self.controller.shutdown();
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::core::FixedStepClock;
    use crate::features::audio::{AudioSettings, CueLevels, RecordingOutput};
    use crate::features::focus::{Phase, SessionConfig};

    fn app() -> App<RecordingOutput, FixedStepClock> {
        let config = SessionConfig::new(
            Duration::from_secs(120),
            Duration::from_secs(60),
            Duration::from_secs(180),
            4,
        )
        .unwrap();
        let controller = Controller::new(
            config,
            AudioSettings::default(),
            CueLevels::default(),
            RecordingOutput::new(),
            FixedStepClock::new(Duration::from_secs(60)),
        );
        App::new(controller)
    }

    #[test]
    fn test_tick_applies_submitted_intents() {
        let mut app = app();
        app.submit(app.toggle_pause_intent());
        app.tick();

        assert_eq!(app.controller.current_phase(), Phase::Working);
        assert_eq!(app.status.as_deref(), Some("Session started"));
        assert_eq!(app.toggle_pause_intent(), Intent::Pause);
    }

    #[test]
    fn test_tick_reports_phase_completion() {
        let mut app = app();
        app.submit(Intent::Start);
        app.tick();
        app.tick();
        app.tick();

        assert_eq!(app.controller.current_phase(), Phase::ShortBreak);
        assert_eq!(
            app.status.as_deref(),
            Some("Working done, Short Break started")
        );
    }

    #[test]
    fn test_tick_shows_rejected_intent() {
        let mut app = app();
        app.submit(Intent::Pause);
        app.tick();

        assert_eq!(app.status.as_deref(), Some("Cannot pause while Idle"));
    }

    #[test]
    fn test_volume_intents_clamp() {
        let mut app = app();
        assert_eq!(app.volume_up_intent(), Intent::SetVolume(100));
        assert_eq!(app.volume_down_intent(), Intent::SetVolume(95));

        app.submit(Intent::SetVolume(3));
        app.tick();
        assert_eq!(app.volume_down_intent(), Intent::SetVolume(0));
    }

    #[test]
    fn test_mute_intent_toggles() {
        let mut app = app();
        assert_eq!(app.toggle_mute_intent(), Intent::SetMuted(true));
        app.submit(Intent::SetMuted(true));
        app.tick();
        assert_eq!(app.toggle_mute_intent(), Intent::SetMuted(false));
    }

    #[test]
    fn test_preset_keys() {
        assert_eq!(
            App::<RecordingOutput, FixedStepClock>::preset_intent(2),
            Some(Intent::SetAmbiencePreset(AmbiencePreset::Wave))
        );
        assert_eq!(App::<RecordingOutput, FixedStepClock>::preset_intent(0), None);
        assert_eq!(App::<RecordingOutput, FixedStepClock>::preset_intent(4), None);
    }

    #[test]
    fn test_phase_end_only_while_running() {
        let mut app = app();
        assert!(app.phase_end().is_none());

        app.submit(Intent::Start);
        app.tick();
        let end = app.phase_end().unwrap();
        assert!(end > Local::now());
    }

    #[test]
    fn test_quit_stops_audio() {
        let mut app = app();
        app.submit(Intent::Start);
        app.tick();
        assert_eq!(app.controller.cues().output().live_loops(), 1);

        app.quit();
        assert!(app.should_quit);
        assert_eq!(app.controller.cues().output().live_loops(), 0);
    }
}
