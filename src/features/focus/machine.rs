//! Pomodoro session state machine.
//!
//! Owns the current phase and the time spent in it. Every successful
//! operation returns a [`Transition`] value; the audio layer reacts to those
//! values instead of to UI code.

use std::time::Duration;

use serde::Serialize;

use super::phase::Phase;
use super::session::SessionConfig;
use crate::error::PomodeskError;

/// Mutable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Current phase
    pub phase: Phase,
    /// Time accumulated in the current phase
    pub elapsed: Duration,
    /// Work phases completed since the last start or reset
    pub completed_cycles: u32,
    /// Phase to return to on resume; only set while paused
    pub pre_pause_phase: Option<Phase>,
}

/// What caused a phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Started,
    Paused,
    Resumed,
    Stopped,
    Reset,
    /// A timed phase ran out on tick.
    Completed,
}

/// A phase change produced by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub kind: TransitionKind,
}

impl Transition {
    const fn new(from: Phase, to: Phase, kind: TransitionKind) -> Self {
        Self { from, to, kind }
    }
}

/// Emitted when a timed phase reaches its configured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseCompleted {
    pub old: Phase,
    pub new: Phase,
}

impl From<PhaseCompleted> for Transition {
    fn from(event: PhaseCompleted) -> Self {
        Self::new(event.old, event.new, TransitionKind::Completed)
    }
}

/// The session state machine.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    config: SessionConfig,
    state: SessionState,
}

impl SessionMachine {
    /// Create a machine in the `Idle` phase.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::default(),
        }
    }

    /// Begin a new session from `Idle` or `Finished`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` from any other phase.
    pub fn start(&mut self) -> Result<Transition, PomodeskError> {
        let from = self.state.phase;
        if !matches!(from, Phase::Idle | Phase::Finished) {
            return Err(self.reject("start"));
        }

        self.state = SessionState {
            phase: Phase::Working,
            ..SessionState::default()
        };
        tracing::debug!(%from, "session started");
        Ok(Transition::new(from, Phase::Working, TransitionKind::Started))
    }

    /// Freeze the running phase.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless a timed phase is running.
    pub fn pause(&mut self) -> Result<Transition, PomodeskError> {
        let from = self.state.phase;
        if !from.is_running() {
            return Err(self.reject("pause"));
        }

        self.state.pre_pause_phase = Some(from);
        self.state.phase = Phase::Paused;
        tracing::debug!(%from, elapsed = ?self.state.elapsed, "session paused");
        Ok(Transition::new(from, Phase::Paused, TransitionKind::Paused))
    }

    /// Return to the phase that was running before `pause`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless paused.
    pub fn resume(&mut self) -> Result<Transition, PomodeskError> {
        let to = match (self.state.phase, self.state.pre_pause_phase) {
            (Phase::Paused, Some(phase)) => phase,
            _ => return Err(self.reject("resume")),
        };

        self.state.phase = to;
        self.state.pre_pause_phase = None;
        tracing::debug!(%to, "session resumed");
        Ok(Transition::new(Phase::Paused, to, TransitionKind::Resumed))
    }

    /// Abandon the session and return to `Idle`.
    ///
    /// Clears the progress of the current phase. The completed cycle count
    /// is kept for display until the next start or reset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when already idle.
    pub fn stop(&mut self) -> Result<Transition, PomodeskError> {
        let from = self.state.phase;
        if from == Phase::Idle {
            return Err(self.reject("stop"));
        }

        self.state = SessionState {
            completed_cycles: self.state.completed_cycles,
            ..SessionState::default()
        };
        tracing::debug!(%from, "session stopped");
        Ok(Transition::new(from, Phase::Idle, TransitionKind::Stopped))
    }

    /// Return to a fresh `Idle` state from any phase.
    pub fn reset(&mut self) -> Transition {
        let from = self.state.phase;
        self.state = SessionState::default();
        tracing::debug!(%from, "session reset");
        Transition::new(from, Phase::Idle, TransitionKind::Reset)
    }

    /// Advance the running phase by `delta`.
    ///
    /// At most one phase completion happens per call. Time left over after
    /// a completion carries into the next phase unless it would complete
    /// that phase as well, in which case the next phase starts from zero.
    pub fn tick(&mut self, delta: Duration) -> Option<PhaseCompleted> {
        let old = self.state.phase;
        if !old.is_running() {
            return None;
        }

        let elapsed = self.state.elapsed.saturating_add(delta);
        let limit = self.config.phase_duration(old);
        if elapsed < limit {
            self.state.elapsed = elapsed;
            return None;
        }

        let overflow = elapsed - limit;
        let new = self.next_phase(old);
        let next_limit = self.config.phase_duration(new);

        self.state.phase = new;
        self.state.elapsed = if overflow < next_limit {
            overflow
        } else {
            Duration::ZERO
        };

        tracing::info!(
            from = %old,
            to = %new,
            completed_cycles = self.state.completed_cycles,
            "phase completed"
        );
        Some(PhaseCompleted { old, new })
    }

    /// Pick the phase after `phase` completes, counting finished work phases.
    fn next_phase(&mut self, phase: Phase) -> Phase {
        if phase == Phase::Working {
            self.state.completed_cycles += 1;
            if self.state.completed_cycles % self.config.cycles_before_long_break() == 0 {
                Phase::LongBreak
            } else {
                Phase::ShortBreak
            }
        } else if self
            .config
            .rounds()
            .is_some_and(|rounds| self.state.completed_cycles >= rounds)
        {
            Phase::Finished
        } else {
            Phase::Working
        }
    }

    fn reject(&self, intent: &'static str) -> PomodeskError {
        tracing::debug!(intent, phase = %self.state.phase, "transition rejected");
        PomodeskError::InvalidTransition {
            intent,
            phase: self.state.phase,
        }
    }

    /// Length of the phase currently being timed (the pre-pause phase while paused).
    #[must_use]
    pub fn current_phase_duration(&self) -> Duration {
        match (self.state.phase, self.state.pre_pause_phase) {
            (Phase::Paused, Some(phase)) => self.config.phase_duration(phase),
            (Phase::Idle, _) => self.config.work_duration(),
            (phase, _) => self.config.phase_duration(phase),
        }
    }

    /// Time left in the current phase.
    ///
    /// While idle this is the full work duration about to be started.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        if self.state.phase == Phase::Idle {
            return self.config.work_duration();
        }
        self.current_phase_duration()
            .saturating_sub(self.state.elapsed)
    }

    /// Get progress through the current phase (0.0 - 1.0).
    #[must_use]
    pub fn progress(&self) -> f64 {
        let total = self.current_phase_duration();
        if total.is_zero() || self.state.phase == Phase::Idle {
            return if self.state.phase == Phase::Finished { 1.0 } else { 0.0 };
        }
        (self.state.elapsed.as_secs_f64() / total.as_secs_f64()).min(1.0)
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.state.elapsed
    }

    #[must_use]
    pub const fn completed_cycles(&self) -> u32 {
        self.state.completed_cycles
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    fn machine() -> SessionMachine {
        SessionMachine::new(SessionConfig::default())
    }

    fn working() -> SessionMachine {
        let mut m = machine();
        m.start().unwrap();
        m
    }

    #[test]
    fn test_start_from_idle() {
        let mut m = machine();
        let t = m.start().unwrap();

        assert_eq!(t, Transition::new(Phase::Idle, Phase::Working, TransitionKind::Started));
        assert_eq!(m.phase(), Phase::Working);
        assert_eq!(m.elapsed(), Duration::ZERO);
        assert_eq!(m.completed_cycles(), 0);
    }

    #[test]
    fn test_start_rejected_while_running() {
        let mut m = working();
        m.tick(minutes(3));
        let before = *m.state();

        let err = m.start().unwrap_err();
        assert!(matches!(
            err,
            PomodeskError::InvalidTransition { intent: "start", phase: Phase::Working }
        ));
        assert_eq!(*m.state(), before);

        m.pause().unwrap();
        assert!(m.start().is_err());
        assert_eq!(m.phase(), Phase::Paused);
    }

    #[test]
    fn test_pause_resume_round_trip() {
        let mut m = working();
        m.tick(minutes(10));
        let before = *m.state();

        m.pause().unwrap();
        assert_eq!(m.phase(), Phase::Paused);
        assert_eq!(m.state().pre_pause_phase, Some(Phase::Working));

        m.resume().unwrap();
        assert_eq!(*m.state(), before);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let mut m = working();
        m.tick(minutes(1));
        m.pause().unwrap();

        assert!(m.tick(minutes(60)).is_none());
        assert_eq!(m.elapsed(), minutes(1));
        assert_eq!(m.remaining(), minutes(24));
    }

    #[test]
    fn test_pause_during_break_resumes_break() {
        let mut m = working();
        m.tick(minutes(25));
        assert_eq!(m.phase(), Phase::ShortBreak);

        m.pause().unwrap();
        let t = m.resume().unwrap();
        assert_eq!(t.to, Phase::ShortBreak);
    }

    #[test]
    fn test_invalid_pause_and_resume() {
        let mut m = machine();
        assert!(m.pause().is_err());
        assert!(m.resume().is_err());
        assert!(m.stop().is_err());
        assert_eq!(*m.state(), SessionState::default());

        let mut m = working();
        assert!(m.resume().is_err());
        assert_eq!(m.phase(), Phase::Working);
    }

    #[test]
    fn test_tick_exact_work_duration() {
        let mut m = working();
        let event = m.tick(minutes(25));

        assert_eq!(
            event,
            Some(PhaseCompleted {
                old: Phase::Working,
                new: Phase::ShortBreak
            })
        );
        assert_eq!(m.phase(), Phase::ShortBreak);
        assert_eq!(m.elapsed(), Duration::ZERO);
        assert_eq!(m.completed_cycles(), 1);
    }

    #[test]
    fn test_tick_carries_overflow() {
        let mut m = working();
        m.tick(minutes(24));
        m.tick(Duration::from_secs(90));

        assert_eq!(m.phase(), Phase::ShortBreak);
        assert_eq!(m.elapsed(), Duration::from_secs(30));
    }

    #[test]
    fn test_one_event_per_tick_with_huge_delta() {
        let mut m = working();
        let event = m.tick(minutes(120));

        assert!(event.is_some());
        assert_eq!(m.phase(), Phase::ShortBreak);
        assert_eq!(m.elapsed(), Duration::ZERO);
        assert_eq!(m.completed_cycles(), 1);
    }

    #[test]
    fn test_long_break_every_fourth_cycle() {
        let mut m = working();
        let mut breaks = Vec::new();

        for _ in 0..4 {
            let event = m.tick(minutes(25)).unwrap();
            breaks.push(event.new);
            m.tick(m.config().phase_duration(event.new)).unwrap();
        }

        assert_eq!(
            breaks,
            vec![Phase::ShortBreak, Phase::ShortBreak, Phase::ShortBreak, Phase::LongBreak]
        );
        assert_eq!(m.phase(), Phase::Working);
        assert_eq!(m.completed_cycles(), 4);
    }

    #[test]
    fn test_elapsed_never_exceeds_phase_duration() {
        let mut m = working();
        for step in [1u64, 7, 59, 301, 1499, 1500, 1501, 3000, 9000] {
            for _ in 0..20 {
                m.tick(Duration::from_secs(step));
                let limit = m.config().phase_duration(m.phase());
                assert!(m.elapsed() <= limit, "elapsed {:?} > {:?}", m.elapsed(), limit);
            }
        }
    }

    #[test]
    fn test_tick_noop_when_not_running() {
        let mut m = machine();
        assert!(m.tick(minutes(30)).is_none());
        assert_eq!(m.phase(), Phase::Idle);
        assert_eq!(m.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_rounds_finish_session() {
        let config = SessionConfig::new(minutes(1), minutes(1), minutes(2), 2)
            .unwrap()
            .with_rounds(2)
            .unwrap();
        let mut m = SessionMachine::new(config);
        m.start().unwrap();

        m.tick(minutes(1)); // -> ShortBreak
        m.tick(minutes(1)); // -> Working
        m.tick(minutes(1)); // -> LongBreak
        let event = m.tick(minutes(2)).unwrap();

        assert_eq!(event.new, Phase::Finished);
        assert_eq!(m.remaining(), Duration::ZERO);
        assert!(m.tick(minutes(5)).is_none());
        assert!(m.pause().is_err());

        m.start().unwrap();
        assert_eq!(m.phase(), Phase::Working);
        assert_eq!(m.completed_cycles(), 0);
    }

    #[test]
    fn test_stop_clears_progress() {
        let mut m = working();
        m.tick(minutes(25));
        m.tick(minutes(2));

        let t = m.stop().unwrap();
        assert_eq!(t.kind, TransitionKind::Stopped);
        assert_eq!(m.phase(), Phase::Idle);
        assert_eq!(m.elapsed(), Duration::ZERO);
        assert_eq!(m.state().pre_pause_phase, None);
    }

    #[test]
    fn test_stop_from_paused() {
        let mut m = working();
        m.pause().unwrap();
        let t = m.stop().unwrap();

        assert_eq!(t.from, Phase::Paused);
        assert_eq!(m.state().pre_pause_phase, None);
    }

    #[test]
    fn test_reset_clears_cycles() {
        let mut m = working();
        m.tick(minutes(25));
        assert_eq!(m.completed_cycles(), 1);

        let t = m.reset();
        assert_eq!(t.kind, TransitionKind::Reset);
        assert_eq!(*m.state(), SessionState::default());

        // Reset is accepted from Idle too.
        assert_eq!(m.reset().from, Phase::Idle);
    }

    #[test]
    fn test_remaining_and_progress() {
        let mut m = machine();
        assert_eq!(m.remaining(), minutes(25));
        assert!((m.progress() - 0.0).abs() < f64::EPSILON);

        m.start().unwrap();
        m.tick(Duration::from_secs(750));
        assert_eq!(m.remaining(), Duration::from_secs(750));
        assert!((m.progress() - 0.5).abs() < 0.001);
    }
}
