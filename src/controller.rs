//! Control surface adapter.
//!
//! The [`Controller`] is the single owner of session state, audio settings
//! and the cue coordinator. User interfaces talk to it through [`Intent`]s
//! and read it through queries; each frame follows the same order:
//!
//! 1. sample the clock once and tick the state machine
//! 2. drain the intents queued since the last frame
//! 3. let the cue coordinator react to every resulting transition
//!
//! so all audio commands for a frame are issued before it is rendered.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

use crate::core::ClockSource;
use crate::error::PomodeskError;
use crate::features::audio::{
    AmbiencePreset, AudioOutput, AudioSettings, CueCoordinator, CueLevels, MAX_VOLUME,
};
use crate::features::focus::{Phase, PhaseCompleted, SessionConfig, SessionMachine, Transition};

/// A discrete user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", content = "value", rename_all = "snake_case")]
pub enum Intent {
    Start,
    Pause,
    Resume,
    Stop,
    Reset,
    SetAmbiencePreset(AmbiencePreset),
    SetMuted(bool),
    SetVolume(u8),
}

impl Intent {
    /// Parse an intent name as typed on the command line.
    ///
    /// Accepts `start`, `pause`, `resume`, `stop`, `reset`, `mute`, `unmute`,
    /// `volume=N` and `preset=rain|wave|wind`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if let Some(value) = s.strip_prefix("volume=") {
            return value.parse::<u8>().ok().map(Self::SetVolume);
        }
        if let Some(value) = s.strip_prefix("preset=") {
            return AmbiencePreset::ALL
                .into_iter()
                .find(|p| p.name() == value)
                .map(Self::SetAmbiencePreset);
        }
        match s.as_str() {
            "start" => Some(Self::Start),
            "pause" => Some(Self::Pause),
            "resume" => Some(Self::Resume),
            "stop" => Some(Self::Stop),
            "reset" => Some(Self::Reset),
            "mute" => Some(Self::SetMuted(true)),
            "unmute" => Some(Self::SetMuted(false)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Pause => write!(f, "pause"),
            Self::Resume => write!(f, "resume"),
            Self::Stop => write!(f, "stop"),
            Self::Reset => write!(f, "reset"),
            Self::SetAmbiencePreset(preset) => write!(f, "preset={preset}"),
            Self::SetMuted(true) => write!(f, "mute"),
            Self::SetMuted(false) => write!(f, "unmute"),
            Self::SetVolume(volume) => write!(f, "volume={volume}"),
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Time the clock advanced this frame
    pub delta: Duration,
    /// Phase completion from the tick, if any (at most one per frame)
    pub completed: Option<PhaseCompleted>,
    /// Every transition applied this frame, in order
    pub transitions: Vec<Transition>,
    /// Non-fatal errors: rejected intents and audio failures
    pub errors: Vec<PomodeskError>,
}

/// Serializable view of the controller for status output.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub phase: Phase,
    pub paused_phase: Option<Phase>,
    pub elapsed_secs: u64,
    pub remaining_secs: u64,
    pub completed_cycles: u32,
    pub muted: bool,
    pub volume: u8,
    /// Master volume as heard: zero while muted
    pub effective_volume: u8,
    pub ambience: AmbiencePreset,
    pub ambience_playing: bool,
}

/// Owns the session and drives audio cues from it.
pub struct Controller<A: AudioOutput, C: ClockSource> {
    machine: SessionMachine,
    settings: AudioSettings,
    cues: CueCoordinator<A>,
    clock: C,
    pending: VecDeque<Intent>,
}

impl<A: AudioOutput, C: ClockSource> Controller<A, C> {
    /// Create a controller with an idle session.
    pub fn new(
        config: SessionConfig,
        settings: AudioSettings,
        levels: CueLevels,
        output: A,
        clock: C,
    ) -> Self {
        Self {
            machine: SessionMachine::new(config),
            settings,
            cues: CueCoordinator::new(output, levels, &settings),
            clock,
            pending: VecDeque::new(),
        }
    }

    /// Queue an intent for the next frame.
    pub fn submit(&mut self, intent: Intent) {
        self.pending.push_back(intent);
    }

    /// Run one frame: tick, drain queued intents, react with audio.
    pub fn frame(&mut self) -> FrameReport {
        let delta = self.clock.sample();
        let mut report = FrameReport {
            delta,
            ..FrameReport::default()
        };

        if let Some(event) = self.machine.tick(delta) {
            report.completed = Some(event);
            self.react(event.into(), &mut report);
        }

        while let Some(intent) = self.pending.pop_front() {
            if let Err(e) = self.dispatch(intent, &mut report) {
                tracing::warn!(%intent, error = %e, "intent rejected");
                report.errors.push(e);
            }
        }

        report
    }

    /// Apply one intent immediately, outside the frame cycle.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the intent is not valid in the current
    /// phase, or `AudioUnavailable` if the resulting cue could not start
    /// (the state change itself still applies).
    pub fn apply(&mut self, intent: Intent) -> Result<Option<Transition>, PomodeskError> {
        let mut report = FrameReport::default();
        self.dispatch(intent, &mut report)?;
        match report.errors.pop() {
            Some(e) => Err(e),
            None => Ok(report.transitions.pop()),
        }
    }

    fn dispatch(&mut self, intent: Intent, report: &mut FrameReport) -> Result<(), PomodeskError> {
        tracing::debug!(%intent, phase = %self.machine.phase(), "applying intent");

        let transition = match intent {
            Intent::Start => self.machine.start()?,
            Intent::Pause => self.machine.pause()?,
            Intent::Resume => self.machine.resume()?,
            Intent::Stop => self.machine.stop()?,
            Intent::Reset => self.machine.reset(),
            Intent::SetAmbiencePreset(preset) => {
                if self.settings.ambience_preset != preset {
                    self.settings.ambience_preset = preset;
                    let phase = self.machine.phase();
                    if let Err(e) = self.cues.on_preset_changed(phase, &self.settings) {
                        report.errors.push(e);
                    }
                }
                return Ok(());
            }
            Intent::SetMuted(muted) => {
                if self.settings.muted != muted {
                    self.settings.muted = muted;
                    self.cues.on_mute_changed(&self.settings);
                }
                return Ok(());
            }
            Intent::SetVolume(volume) => {
                let volume = volume.min(MAX_VOLUME);
                if self.settings.volume != volume {
                    self.settings.volume = volume;
                    self.cues.on_volume_changed(&self.settings);
                }
                return Ok(());
            }
        };

        self.react(transition, report);
        Ok(())
    }

    fn react(&mut self, transition: Transition, report: &mut FrameReport) {
        report.transitions.push(transition);
        if let Err(e) = self.cues.on_transition(transition, &self.settings) {
            report.errors.push(e);
        }
    }

    /// Toggle between paused and running; starts the session when idle.
    #[must_use]
    pub fn toggle_intent(&self) -> Intent {
        match self.machine.phase() {
            Phase::Paused => Intent::Resume,
            Phase::Idle | Phase::Finished => Intent::Start,
            Phase::Working | Phase::ShortBreak | Phase::LongBreak => Intent::Pause,
        }
    }

    /// Stop every cue. Call before the controller is dropped at exit.
    pub fn shutdown(&mut self) {
        self.cues.shutdown();
    }

    #[must_use]
    pub const fn current_phase(&self) -> Phase {
        self.machine.phase()
    }

    #[must_use]
    pub fn remaining_time(&self) -> Duration {
        self.machine.remaining()
    }

    #[must_use]
    pub const fn completed_cycles(&self) -> u32 {
        self.machine.completed_cycles()
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.machine.elapsed()
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.machine.progress()
    }

    #[must_use]
    pub const fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    #[must_use]
    pub const fn machine(&self) -> &SessionMachine {
        &self.machine
    }

    #[must_use]
    pub const fn cues(&self) -> &CueCoordinator<A> {
        &self.cues
    }

    pub fn cues_mut(&mut self) -> &mut CueCoordinator<A> {
        &mut self.cues
    }

    /// Capture the current state for display or JSON output.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            phase: self.machine.phase(),
            paused_phase: self.machine.state().pre_pause_phase,
            elapsed_secs: self.machine.elapsed().as_secs(),
            remaining_secs: self.machine.remaining().as_secs(),
            completed_cycles: self.machine.completed_cycles(),
            muted: self.settings.muted,
            volume: self.settings.volume,
            effective_volume: self.settings.effective_volume(),
            ambience: self.settings.ambience_preset,
            ambience_playing: self.cues.ambience().is_some_and(|a| !a.paused),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedStepClock;
    use crate::features::audio::{AudioCommand, ChannelStatus, CueId, RecordingOutput};
    use crate::features::focus::TransitionKind;

    type TestController = Controller<RecordingOutput, FixedStepClock>;

    fn minutes(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    fn controller(step: Duration) -> TestController {
        Controller::new(
            SessionConfig::default(),
            AudioSettings::default(),
            CueLevels::default(),
            RecordingOutput::new(),
            FixedStepClock::new(step),
        )
    }

    #[test]
    fn test_intent_parse() {
        assert_eq!(Intent::parse("start"), Some(Intent::Start));
        assert_eq!(Intent::parse(" Pause "), Some(Intent::Pause));
        assert_eq!(Intent::parse("mute"), Some(Intent::SetMuted(true)));
        assert_eq!(Intent::parse("volume=40"), Some(Intent::SetVolume(40)));
        assert_eq!(
            Intent::parse("preset=wind"),
            Some(Intent::SetAmbiencePreset(AmbiencePreset::Wind))
        );
        assert_eq!(Intent::parse("volume=loud"), None);
        assert_eq!(Intent::parse("preset=birds"), None);
        assert_eq!(Intent::parse("explode"), None);
    }

    #[test]
    fn test_intent_display_round_trips_through_parse() {
        for intent in [
            Intent::Start,
            Intent::Reset,
            Intent::SetMuted(false),
            Intent::SetVolume(7),
            Intent::SetAmbiencePreset(AmbiencePreset::Wave),
        ] {
            assert_eq!(Intent::parse(&intent.to_string()), Some(intent));
        }
    }

    #[test]
    fn test_work_phase_completion_scenario() {
        let mut c = controller(minutes(25));
        c.apply(Intent::Start).unwrap();
        assert!(c.cues().ambience().is_some());

        let report = c.frame();
        assert!(report.errors.is_empty());

        assert_eq!(
            report.completed,
            Some(PhaseCompleted {
                old: Phase::Working,
                new: Phase::ShortBreak
            })
        );
        assert_eq!(c.current_phase(), Phase::ShortBreak);
        assert_eq!(c.elapsed(), Duration::ZERO);
        assert!(c.cues().ambience().is_none());
        assert_eq!(c.cues().output().live_loops(), 0);
        assert_eq!(c.cues().output().play_once_count(CueId::Alarm), 1);
    }

    #[test]
    fn test_frame_ticks_before_draining_intents() {
        let mut c = controller(minutes(1));
        c.submit(Intent::Start);

        // The tick happens while idle, so the first frame only starts.
        let report = c.frame();
        assert_eq!(report.transitions.len(), 1);
        assert_eq!(c.elapsed(), Duration::ZERO);

        c.frame();
        assert_eq!(c.elapsed(), minutes(1));
        assert_eq!(c.remaining_time(), minutes(24));
    }

    #[test]
    fn test_rejected_intent_is_reported_not_fatal() {
        let mut c = controller(minutes(1));
        c.submit(Intent::Pause);
        c.submit(Intent::Start);
        c.submit(Intent::Start);

        let report = c.frame();

        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().all(|e| !e.is_fatal()));
        assert_eq!(c.current_phase(), Phase::Working);
        assert_eq!(report.transitions[0].kind, TransitionKind::Started);
    }

    #[test]
    fn test_mute_keeps_loop_and_unmute_restores_volume() {
        let mut c = controller(minutes(1));
        c.apply(Intent::SetVolume(60)).unwrap();
        c.apply(Intent::Start).unwrap();
        let handle = c.cues().ambience().unwrap().handle;

        c.apply(Intent::SetMuted(true)).unwrap();
        assert!(c.cues().output().channel(handle).is_some());
        assert_eq!(c.cues().output().effective_volume(handle), 0);

        c.apply(Intent::SetMuted(false)).unwrap();
        assert_eq!(c.cues().ambience().unwrap().handle, handle);
        assert_eq!(c.cues().output().effective_volume(handle), 60);
        assert_eq!(c.cues().output().live_loops(), 1);
    }

    #[test]
    fn test_pause_then_stop_releases_ambience() {
        let mut c = controller(minutes(1));
        c.apply(Intent::Start).unwrap();
        let handle = c.cues().ambience().unwrap().handle;

        c.apply(Intent::Pause).unwrap();
        assert_eq!(
            c.cues().output().channel(handle).unwrap().status,
            ChannelStatus::Paused
        );
        assert_eq!(c.cues().ambience().unwrap().handle, handle);

        c.apply(Intent::Stop).unwrap();
        assert!(c.cues().output().channel(handle).is_none());
        assert_eq!(c.cues().output().live_channels(), 0);
        assert_eq!(c.current_phase(), Phase::Idle);
    }

    #[test]
    fn test_pause_resume_preserves_elapsed() {
        let mut c = controller(minutes(3));
        c.apply(Intent::Start).unwrap();
        c.frame();
        let elapsed = c.elapsed();

        c.apply(Intent::Pause).unwrap();
        c.frame();
        c.frame();
        c.apply(Intent::Resume).unwrap();

        assert_eq!(c.elapsed(), elapsed);
        assert_eq!(c.current_phase(), Phase::Working);
    }

    #[test]
    fn test_reset_while_paused_releases_ambience() {
        let mut c = controller(minutes(1));
        c.apply(Intent::Start).unwrap();
        c.frame();
        let handle = c.cues().ambience().unwrap().handle;
        c.apply(Intent::Pause).unwrap();

        let transition = c.apply(Intent::Reset).unwrap().unwrap();
        assert_eq!(transition.kind, TransitionKind::Reset);
        assert!(c.cues().output().channel(handle).is_none());
        assert!(c.cues().ambience().is_none());
        assert_eq!(c.cues().output().live_channels(), 0);
        assert_eq!(c.current_phase(), Phase::Idle);
        assert_eq!(c.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_reset_while_working_releases_all_cues() {
        let mut c = controller(minutes(25));
        c.apply(Intent::Start).unwrap();
        // Work ends: alarm rings and the short break starts.
        c.frame();
        assert_eq!(c.current_phase(), Phase::ShortBreak);
        // Break ends: ambience is back, the second alarm supersedes the first.
        c.frame();
        assert_eq!(c.current_phase(), Phase::Working);
        assert_eq!(c.cues().output().live_loops(), 1);
        assert!(c.cues().alarm().is_some());

        c.apply(Intent::Reset).unwrap();
        assert_eq!(c.cues().output().live_channels(), 0);
        assert!(c.cues().alarm().is_none());
        assert_eq!(c.completed_cycles(), 0);
    }

    #[test]
    fn test_volume_change_keeps_ambience_playing() {
        let mut c = controller(minutes(1));
        c.apply(Intent::Start).unwrap();
        let handle = c.cues().ambience().unwrap().handle;
        c.cues_mut().output_mut().take_commands();

        c.apply(Intent::SetVolume(40)).unwrap();

        assert_eq!(c.cues().ambience().unwrap().handle, handle);
        assert_eq!(
            c.cues().output().channel(handle).unwrap().status,
            ChannelStatus::Playing
        );
        assert_eq!(c.cues().output().live_loops(), 1);
        assert_eq!(c.cues().output().effective_volume(handle), 40);
        assert!(!c
            .cues()
            .output()
            .commands()
            .iter()
            .any(|cmd| matches!(cmd, AudioCommand::Stop { .. } | AudioCommand::PlayLoop { .. })));
        assert_eq!(c.snapshot().effective_volume, 40);
    }

    #[test]
    fn test_volume_clamped_and_applied() {
        let mut c = controller(minutes(1));
        c.apply(Intent::SetVolume(250)).unwrap();
        assert_eq!(c.settings().volume, 100);

        c.apply(Intent::SetVolume(30)).unwrap();
        assert_eq!(c.cues().output().master_volume(), 30);
    }

    #[test]
    fn test_audio_failure_does_not_stop_timer() {
        let mut c = controller(minutes(1));
        c.cues_mut().output_mut().set_unavailable(true);

        let err = c.apply(Intent::Start).unwrap_err();
        assert!(matches!(err, PomodeskError::AudioUnavailable(_)));
        assert_eq!(c.current_phase(), Phase::Working);
        assert!(c.cues().ambience().is_none());

        c.frame();
        assert_eq!(c.elapsed(), minutes(1));
    }

    #[test]
    fn test_toggle_intent() {
        let mut c = controller(minutes(1));
        assert_eq!(c.toggle_intent(), Intent::Start);
        c.apply(Intent::Start).unwrap();
        assert_eq!(c.toggle_intent(), Intent::Pause);
        c.apply(Intent::Pause).unwrap();
        assert_eq!(c.toggle_intent(), Intent::Resume);
    }

    #[test]
    fn test_snapshot() {
        let mut c = controller(minutes(5));
        c.apply(Intent::Start).unwrap();
        c.frame();

        let snapshot = c.snapshot();
        assert_eq!(snapshot.phase, Phase::Working);
        assert_eq!(snapshot.elapsed_secs, 300);
        assert_eq!(snapshot.remaining_secs, 1200);
        assert!(snapshot.ambience_playing);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["phase"], "working");
    }

    #[test]
    fn test_shutdown_stops_everything() {
        let mut c = controller(minutes(25));
        c.apply(Intent::Start).unwrap();
        c.frame();
        assert_eq!(c.cues().output().live_channels(), 1);

        c.shutdown();
        assert_eq!(c.cues().output().live_channels(), 0);
    }
}
