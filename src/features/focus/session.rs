//! Session configuration.
//!
//! Fixed for the lifetime of a session; validated once at construction.

use std::time::Duration;

use super::phase::Phase;
use crate::error::PomodeskError;

const DEFAULT_WORK: Duration = Duration::from_secs(25 * 60);
const DEFAULT_SHORT_BREAK: Duration = Duration::from_secs(5 * 60);
const DEFAULT_LONG_BREAK: Duration = Duration::from_secs(15 * 60);
const DEFAULT_CYCLES_BEFORE_LONG_BREAK: u32 = 4;

/// Durations and cycle counts for one Pomodoro session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    work_duration: Duration,
    break_duration: Duration,
    long_break_duration: Duration,
    cycles_before_long_break: u32,
    rounds: Option<u32>,
}

impl SessionConfig {
    /// Create a validated session configuration.
    ///
    /// # Errors
    ///
    /// Returns `PomodeskError::Configuration` if any duration is zero or
    /// `cycles_before_long_break` is zero.
    pub fn new(
        work_duration: Duration,
        break_duration: Duration,
        long_break_duration: Duration,
        cycles_before_long_break: u32,
    ) -> Result<Self, PomodeskError> {
        for (name, value) in [
            ("work duration", work_duration),
            ("break duration", break_duration),
            ("long break duration", long_break_duration),
        ] {
            if value.is_zero() {
                return Err(PomodeskError::Configuration(format!(
                    "{name} must be positive"
                )));
            }
        }

        if cycles_before_long_break == 0 {
            return Err(PomodeskError::Configuration(
                "cycles before long break must be positive".to_string(),
            ));
        }

        Ok(Self {
            work_duration,
            break_duration,
            long_break_duration,
            cycles_before_long_break,
            rounds: None,
        })
    }

    /// Finish the session once this many work phases (and the break after
    /// the last one) have completed.
    ///
    /// # Errors
    ///
    /// Returns `PomodeskError::Configuration` if `rounds` is zero.
    pub fn with_rounds(mut self, rounds: u32) -> Result<Self, PomodeskError> {
        if rounds == 0 {
            return Err(PomodeskError::Configuration(
                "rounds must be positive".to_string(),
            ));
        }
        self.rounds = Some(rounds);
        Ok(self)
    }

    /// Configured length of a timed phase; zero for untimed phases.
    #[must_use]
    pub const fn phase_duration(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Working => self.work_duration,
            Phase::ShortBreak => self.break_duration,
            Phase::LongBreak => self.long_break_duration,
            Phase::Idle | Phase::Paused | Phase::Finished => Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn work_duration(&self) -> Duration {
        self.work_duration
    }

    #[must_use]
    pub const fn break_duration(&self) -> Duration {
        self.break_duration
    }

    #[must_use]
    pub const fn long_break_duration(&self) -> Duration {
        self.long_break_duration
    }

    #[must_use]
    pub const fn cycles_before_long_break(&self) -> u32 {
        self.cycles_before_long_break
    }

    #[must_use]
    pub const fn rounds(&self) -> Option<u32> {
        self.rounds
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_duration: DEFAULT_WORK,
            break_duration: DEFAULT_SHORT_BREAK,
            long_break_duration: DEFAULT_LONG_BREAK,
            cycles_before_long_break: DEFAULT_CYCLES_BEFORE_LONG_BREAK,
            rounds: None,
        }
    }
}
