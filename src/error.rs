//! Error types for pomodesk.

use thiserror::Error;

use crate::features::focus::Phase;

/// Errors that can occur while running a focus session.
#[derive(Error, Debug)]
pub enum PomodeskError {
    /// An intent was issued in a phase that does not accept it.
    ///
    /// The session state is left exactly as it was before the call.
    #[error("Cannot {intent} while {phase}")]
    InvalidTransition {
        /// The rejected intent (e.g. "start", "pause").
        intent: &'static str,
        /// The phase the session was in.
        phase: Phase,
    },

    /// The audio output service failed (device lost, missing sound file).
    #[error("Audio unavailable: {0}")]
    AudioUnavailable(String),

    /// Invalid session parameters (non-positive durations or cycle counts).
    #[error("Invalid session configuration: {0}")]
    Configuration(String),

    /// Configuration file could not be read, parsed or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal setup or drawing failed.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PomodeskError {
    /// Whether the error should abort the frame loop.
    ///
    /// Rejected intents and audio failures only degrade the session; the
    /// timer keeps running.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidTransition { .. } | Self::AudioUnavailable(_))
    }
}
