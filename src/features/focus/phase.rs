//! Session phases.

use serde::{Deserialize, Serialize};

/// Phase of a Pomodoro session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No session running
    #[default]
    Idle,
    /// Focus interval
    Working,
    /// Short break between focus intervals
    ShortBreak,
    /// Long break after every N focus intervals
    LongBreak,
    /// Session is paused; see `SessionState::pre_pause_phase`
    Paused,
    /// All configured rounds are done; terminal until reset
    Finished,
}

impl Phase {
    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Working => "Working",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
            Self::Paused => "Paused",
            Self::Finished => "Finished",
        }
    }

    /// Check if this phase is a timed interval that advances on tick.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Working | Self::ShortBreak | Self::LongBreak)
    }

    /// Check if this is a break phase.
    #[must_use]
    pub const fn is_break(&self) -> bool {
        matches!(self, Self::ShortBreak | Self::LongBreak)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
