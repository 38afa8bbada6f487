//! Ambient sound and alarm cues.
//!
//! The audio layer is split in two:
//! - [`AudioOutput`]: the capability set any playback backend provides
//!   (play once, play looped, pause/resume/stop a channel, master mute and
//!   volume).
//! - [`CueCoordinator`]: keeps playback consistent with the session phase
//!   and the user's [`AudioSettings`].
//!
//! Backends:
//! - [`RecordingOutput`]: in-memory, records every command (headless
//!   simulation and tests)
//! - `DeviceOutput`: plays through the default output device (requires the
//!   `device` feature)

pub mod coordinator;
#[cfg(feature = "device")]
pub mod device;
pub mod recording;
pub mod settings;

use serde::Serialize;

pub use coordinator::{CueCoordinator, CueLevels};
#[cfg(feature = "device")]
pub use device::DeviceOutput;
pub use recording::{AudioCommand, ChannelStatus, RecordingOutput};
pub use settings::{AmbiencePreset, AudioSettings, MAX_VOLUME};

use crate::error::PomodeskError;

/// A logical sound role, independent of the channel playing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CueId {
    /// Looped background sound for work phases
    Ambience(AmbiencePreset),
    /// One-shot sound at every phase boundary
    Alarm,
}

impl CueId {
    /// Sound file stem for this cue (`rain`, `alarm`, ...).
    #[must_use]
    pub const fn file_stem(&self) -> &'static str {
        match self {
            Self::Ambience(preset) => preset.name(),
            Self::Alarm => "alarm",
        }
    }
}

impl std::fmt::Display for CueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ambience(preset) => write!(f, "ambience:{preset}"),
            Self::Alarm => write!(f, "alarm"),
        }
    }
}

/// Opaque reference to a playing channel, issued by an [`AudioOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ChannelHandle(pub u64);

impl std::fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Audio output service.
///
/// Channel operations must tolerate stale handles (a one-shot that already
/// finished, a channel that was stopped) by doing nothing.
#[cfg_attr(test, mockall::automock)]
pub trait AudioOutput {
    /// Play a cue once.
    ///
    /// # Errors
    ///
    /// Returns `AudioUnavailable` if the cue cannot be played.
    fn play_once(&mut self, cue: CueId) -> Result<ChannelHandle, PomodeskError>;

    /// Play a cue on repeat until stopped.
    ///
    /// # Errors
    ///
    /// Returns `AudioUnavailable` if the cue cannot be played.
    fn play_loop(&mut self, cue: CueId) -> Result<ChannelHandle, PomodeskError>;

    fn pause(&mut self, handle: ChannelHandle);

    fn resume(&mut self, handle: ChannelHandle);

    fn stop(&mut self, handle: ChannelHandle);

    /// Silence (or restore) every channel without stopping playback.
    fn set_master_mute(&mut self, muted: bool);

    /// Set the volume (0..=100) applied on top of every channel's own volume.
    fn set_master_volume(&mut self, volume: u8);

    /// Set one channel's volume (0..=100).
    fn set_channel_volume(&mut self, handle: ChannelHandle, volume: u8);
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn play_once(&mut self, cue: CueId) -> Result<ChannelHandle, PomodeskError> {
        (**self).play_once(cue)
    }

    fn play_loop(&mut self, cue: CueId) -> Result<ChannelHandle, PomodeskError> {
        (**self).play_loop(cue)
    }

    fn pause(&mut self, handle: ChannelHandle) {
        (**self).pause(handle);
    }

    fn resume(&mut self, handle: ChannelHandle) {
        (**self).resume(handle);
    }

    fn stop(&mut self, handle: ChannelHandle) {
        (**self).stop(handle);
    }

    fn set_master_mute(&mut self, muted: bool) {
        (**self).set_master_mute(muted);
    }

    fn set_master_volume(&mut self, volume: u8) {
        (**self).set_master_volume(volume);
    }

    fn set_channel_volume(&mut self, handle: ChannelHandle, volume: u8) {
        (**self).set_channel_volume(handle, volume);
    }
}
