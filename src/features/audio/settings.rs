//! User-adjustable audio settings.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Highest accepted volume.
pub const MAX_VOLUME: u8 = 100;

/// Ambient sound played during work phases.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AmbiencePreset {
    #[default]
    Rain,
    Wave,
    Wind,
}

impl AmbiencePreset {
    /// All presets in display order.
    pub const ALL: [Self; 3] = [Self::Rain, Self::Wave, Self::Wind];

    /// Get the preset's short name, also used as its sound file stem.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rain => "rain",
            Self::Wave => "wave",
            Self::Wind => "wind",
        }
    }
}

impl std::fmt::Display for AmbiencePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Audio settings shared between the control surface and the cue coordinator.
///
/// The control surface is the only writer; it goes through
/// `Controller`, which notifies the coordinator after each change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub muted: bool,
    /// Master volume, 0..=100
    pub volume: u8,
    pub ambience_preset: AmbiencePreset,
}

impl AudioSettings {
    /// Create settings, clamping the volume into range.
    #[must_use]
    pub fn new(muted: bool, volume: u8, ambience_preset: AmbiencePreset) -> Self {
        Self {
            muted,
            volume: volume.min(MAX_VOLUME),
            ambience_preset,
        }
    }

    /// Volume actually heard.
    #[must_use]
    pub const fn effective_volume(&self) -> u8 {
        if self.muted {
            0
        } else {
            self.volume
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self::new(false, MAX_VOLUME, AmbiencePreset::Rain)
    }
}
