//! Configuration settings for pomodesk.
//!
//! Settings are loaded from `~/.pomodesk/config.yaml`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::PomodeskError;
use crate::features::audio::{AmbiencePreset, AudioSettings, CueLevels, MAX_VOLUME};
use crate::features::focus::SessionConfig;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Pomodoro timer settings.
    pub timer: TimerConfig,
    /// Ambience and alarm settings.
    pub audio: AudioConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// TUI frame period in milliseconds.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
}

/// Pomodoro timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Work phase duration in minutes.
    #[serde(default = "default_work")]
    pub work_minutes: u32,
    /// Short break duration in minutes.
    #[serde(default = "default_short_break")]
    pub short_break_minutes: u32,
    /// Long break duration in minutes.
    #[serde(default = "default_long_break")]
    pub long_break_minutes: u32,
    /// Number of work phases before a long break.
    #[serde(default = "default_cycles_before_long_break")]
    pub cycles_before_long_break: u32,
    /// Finish the session after this many work phases (runs forever if unset).
    #[serde(default)]
    pub rounds: Option<u32>,
}

/// Ambience and alarm settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Start muted.
    #[serde(default)]
    pub muted: bool,
    /// Master volume (0-100).
    #[serde(default = "default_volume")]
    pub volume: u8,
    /// Ambient sound for work phases.
    #[serde(default)]
    pub ambience: AmbiencePreset,
    /// Ambience channel volume (0-100).
    #[serde(default = "default_volume")]
    pub ambience_level: u8,
    /// Alarm channel volume (0-100).
    #[serde(default = "default_volume")]
    pub alarm_level: u8,
    /// Directory holding `rain.wav`, `wave.wav`, `wind.wav` and `alarm.wav`.
    #[serde(default)]
    pub sounds_dir: Option<PathBuf>,
}

/// Timer values given on the command line, taking precedence over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerOverrides {
    pub work: Option<Duration>,
    pub short_break: Option<Duration>,
    pub long_break: Option<Duration>,
    pub cycles_before_long_break: Option<u32>,
    pub rounds: Option<u32>,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_frame_ms() -> u64 {
    100
}

const fn default_work() -> u32 {
    25
}

const fn default_short_break() -> u32 {
    5
}

const fn default_long_break() -> u32 {
    15
}

const fn default_cycles_before_long_break() -> u32 {
    4
}

const fn default_volume() -> u8 {
    MAX_VOLUME
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work(),
            short_break_minutes: default_short_break(),
            long_break_minutes: default_long_break(),
            cycles_before_long_break: default_cycles_before_long_break(),
            rounds: None,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            muted: false,
            volume: default_volume(),
            ambience: AmbiencePreset::default(),
            ambience_level: default_volume(),
            alarm_level: default_volume(),
            sounds_dir: None,
        }
    }
}

fn minutes(m: u32) -> Duration {
    Duration::from_secs(u64::from(m) * 60)
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, PomodeskError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            PomodeskError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            PomodeskError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), PomodeskError> {
        let contents = self.to_yaml()?;

        std::fs::write(path, contents).map_err(|e| {
            PomodeskError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Serialize the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, PomodeskError> {
        serde_yaml::to_string(self)
            .map_err(|e| PomodeskError::Config(format!("Failed to serialize config: {e}")))
    }

    /// Build the session configuration from the timer section.
    ///
    /// # Errors
    ///
    /// Returns `PomodeskError::Configuration` for zero durations or counts.
    pub fn session_config(&self) -> Result<SessionConfig, PomodeskError> {
        self.session_config_with(&TimerOverrides::default())
    }

    /// Build the session configuration, letting `overrides` win.
    ///
    /// # Errors
    ///
    /// Returns `PomodeskError::Configuration` for zero durations or counts.
    pub fn session_config_with(
        &self,
        overrides: &TimerOverrides,
    ) -> Result<SessionConfig, PomodeskError> {
        let timer = &self.timer;
        let config = SessionConfig::new(
            overrides.work.unwrap_or(minutes(timer.work_minutes)),
            overrides
                .short_break
                .unwrap_or(minutes(timer.short_break_minutes)),
            overrides
                .long_break
                .unwrap_or(minutes(timer.long_break_minutes)),
            overrides
                .cycles_before_long_break
                .unwrap_or(timer.cycles_before_long_break),
        )?;

        match overrides.rounds.or(timer.rounds) {
            Some(rounds) => config.with_rounds(rounds),
            None => Ok(config),
        }
    }

    /// Audio settings at startup.
    #[must_use]
    pub fn audio_settings(&self) -> AudioSettings {
        AudioSettings::new(self.audio.muted, self.audio.volume, self.audio.ambience)
    }

    /// Per-cue channel volumes.
    #[must_use]
    pub fn cue_levels(&self) -> CueLevels {
        CueLevels {
            ambience: self.audio.ambience_level.min(MAX_VOLUME),
            alarm: self.audio.alarm_level.min(MAX_VOLUME),
        }
    }

    /// Directory to load sound files from.
    #[must_use]
    pub fn sounds_dir(&self, paths: &Paths) -> PathBuf {
        self.audio
            .sounds_dir
            .clone()
            .unwrap_or_else(|| paths.sounds.clone())
    }
}
