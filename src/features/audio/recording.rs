//! In-memory audio output.
//!
//! Tracks channels and master state like a mixer would and keeps a log of
//! every command it received. Used by `pomodesk simulate` and by tests.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{AudioOutput, ChannelHandle, CueId, MAX_VOLUME};
use crate::error::PomodeskError;

/// A command received by the output, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AudioCommand {
    PlayOnce { cue: CueId, handle: ChannelHandle },
    PlayLoop { cue: CueId, handle: ChannelHandle },
    /// A play request that failed because the output was unavailable.
    PlayFailed { cue: CueId },
    Pause { handle: ChannelHandle },
    Resume { handle: ChannelHandle },
    Stop { handle: ChannelHandle },
    SetMasterMute { muted: bool },
    SetMasterVolume { volume: u8 },
    SetChannelVolume { handle: ChannelHandle, volume: u8 },
}

impl std::fmt::Display for AudioCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlayOnce { cue, handle } => write!(f, "play once {cue} {handle}"),
            Self::PlayLoop { cue, handle } => write!(f, "play loop {cue} {handle}"),
            Self::PlayFailed { cue } => write!(f, "play {cue} failed"),
            Self::Pause { handle } => write!(f, "pause {handle}"),
            Self::Resume { handle } => write!(f, "resume {handle}"),
            Self::Stop { handle } => write!(f, "stop {handle}"),
            Self::SetMasterMute { muted } => write!(f, "master mute {muted}"),
            Self::SetMasterVolume { volume } => write!(f, "master volume {volume}"),
            Self::SetChannelVolume { handle, volume } => {
                write!(f, "channel volume {handle} {volume}")
            }
        }
    }
}

/// Playback status of a live channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    Playing,
    Paused,
}

/// A live channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub cue: CueId,
    pub looping: bool,
    pub status: ChannelStatus,
    pub volume: u8,
}

/// Audio output that plays nothing and remembers everything.
#[derive(Debug)]
pub struct RecordingOutput {
    next_handle: u64,
    channels: BTreeMap<ChannelHandle, Channel>,
    master_muted: bool,
    master_volume: u8,
    unavailable: bool,
    keep_log: bool,
    commands: Vec<AudioCommand>,
}

impl RecordingOutput {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_handle: 1,
            channels: BTreeMap::new(),
            master_muted: false,
            master_volume: MAX_VOLUME,
            unavailable: false,
            keep_log: true,
            commands: Vec::new(),
        }
    }

    /// Output that tracks channels but keeps no command log.
    ///
    /// Stand-in for a missing sound device in long-running sessions.
    #[must_use]
    pub const fn silent() -> Self {
        let mut output = Self::new();
        output.keep_log = false;
        output
    }

    /// Make every subsequent play request fail, as if the device was lost.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Commands received so far.
    #[must_use]
    pub fn commands(&self) -> &[AudioCommand] {
        &self.commands
    }

    /// Drain the command log.
    pub fn take_commands(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.commands)
    }

    #[must_use]
    pub fn channel(&self, handle: ChannelHandle) -> Option<&Channel> {
        self.channels.get(&handle)
    }

    /// Live channels playing the given cue.
    pub fn channels_for(
        &self,
        cue: CueId,
    ) -> impl Iterator<Item = (ChannelHandle, &Channel)> + '_ {
        self.channels
            .iter()
            .filter(move |(_, channel)| channel.cue == cue)
            .map(|(handle, channel)| (*handle, channel))
    }

    /// Number of live (playing or paused) channels.
    #[must_use]
    pub fn live_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of live looping channels.
    #[must_use]
    pub fn live_loops(&self) -> usize {
        self.channels.values().filter(|c| c.looping).count()
    }

    /// Count of one-shot plays of the given cue ever requested.
    #[must_use]
    pub fn play_once_count(&self, cue: CueId) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, AudioCommand::PlayOnce { cue: played, .. } if *played == cue))
            .count()
    }

    #[must_use]
    pub const fn master_muted(&self) -> bool {
        self.master_muted
    }

    #[must_use]
    pub const fn master_volume(&self) -> u8 {
        self.master_volume
    }

    /// Volume a listener would hear from a channel: zero when muted, paused
    /// or stopped, otherwise channel volume scaled by master volume.
    #[must_use]
    pub fn effective_volume(&self, handle: ChannelHandle) -> u8 {
        match self.channels.get(&handle) {
            Some(channel) if !self.master_muted && channel.status == ChannelStatus::Playing => {
                let scaled = u16::from(channel.volume) * u16::from(self.master_volume)
                    / u16::from(MAX_VOLUME);
                u8::try_from(scaled).unwrap_or(MAX_VOLUME)
            }
            _ => 0,
        }
    }

    fn log(&mut self, command: AudioCommand) {
        if self.keep_log {
            self.commands.push(command);
        }
    }

    fn start(&mut self, cue: CueId, looping: bool) -> Result<ChannelHandle, PomodeskError> {
        if self.unavailable {
            self.log(AudioCommand::PlayFailed { cue });
            return Err(PomodeskError::AudioUnavailable(format!(
                "no output device for {cue}"
            )));
        }

        let handle = ChannelHandle(self.next_handle);
        self.next_handle += 1;
        self.channels.insert(
            handle,
            Channel {
                cue,
                looping,
                status: ChannelStatus::Playing,
                volume: MAX_VOLUME,
            },
        );
        self.log(if looping {
            AudioCommand::PlayLoop { cue, handle }
        } else {
            AudioCommand::PlayOnce { cue, handle }
        });
        Ok(handle)
    }
}

impl Default for RecordingOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for RecordingOutput {
    fn play_once(&mut self, cue: CueId) -> Result<ChannelHandle, PomodeskError> {
        self.start(cue, false)
    }

    fn play_loop(&mut self, cue: CueId) -> Result<ChannelHandle, PomodeskError> {
        self.start(cue, true)
    }

    fn pause(&mut self, handle: ChannelHandle) {
        self.log(AudioCommand::Pause { handle });
        if let Some(channel) = self.channels.get_mut(&handle) {
            channel.status = ChannelStatus::Paused;
        }
    }

    fn resume(&mut self, handle: ChannelHandle) {
        self.log(AudioCommand::Resume { handle });
        if let Some(channel) = self.channels.get_mut(&handle) {
            channel.status = ChannelStatus::Playing;
        }
    }

    fn stop(&mut self, handle: ChannelHandle) {
        self.log(AudioCommand::Stop { handle });
        self.channels.remove(&handle);
    }

    fn set_master_mute(&mut self, muted: bool) {
        self.log(AudioCommand::SetMasterMute { muted });
        self.master_muted = muted;
    }

    fn set_master_volume(&mut self, volume: u8) {
        let volume = volume.min(MAX_VOLUME);
        self.log(AudioCommand::SetMasterVolume { volume });
        self.master_volume = volume;
    }

    fn set_channel_volume(&mut self, handle: ChannelHandle, volume: u8) {
        let volume = volume.min(MAX_VOLUME);
        self.log(AudioCommand::SetChannelVolume { handle, volume });
        if let Some(channel) = self.channels.get_mut(&handle) {
            channel.volume = volume;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::audio::AmbiencePreset;

    const RAIN: CueId = CueId::Ambience(AmbiencePreset::Rain);

    #[test]
    fn test_silent_output_keeps_no_log() {
        let mut output = RecordingOutput::silent();
        let handle = output.play_loop(RAIN).unwrap();
        output.set_channel_volume(handle, 40);
        output.pause(handle);

        assert!(output.commands().is_empty());
        assert_eq!(output.channel(handle).unwrap().status, ChannelStatus::Paused);
        assert_eq!(output.channel(handle).unwrap().volume, 40);

        output.stop(handle);
        assert_eq!(output.live_channels(), 0);
        assert!(output.take_commands().is_empty());
    }

    #[test]
    fn test_handles_are_unique() {
        let mut output = RecordingOutput::new();
        let a = output.play_loop(RAIN).unwrap();
        let b = output.play_once(CueId::Alarm).unwrap();
        assert_ne!(a, b);
        assert_eq!(output.live_channels(), 2);
        assert_eq!(output.live_loops(), 1);
    }

    #[test]
    fn test_pause_resume_stop() {
        let mut output = RecordingOutput::new();
        let handle = output.play_loop(RAIN).unwrap();

        output.pause(handle);
        assert_eq!(output.channel(handle).unwrap().status, ChannelStatus::Paused);
        assert_eq!(output.effective_volume(handle), 0);

        output.resume(handle);
        assert_eq!(output.channel(handle).unwrap().status, ChannelStatus::Playing);

        output.stop(handle);
        assert!(output.channel(handle).is_none());
    }

    #[test]
    fn test_stale_handles_are_ignored() {
        let mut output = RecordingOutput::new();
        let handle = output.play_once(CueId::Alarm).unwrap();
        output.stop(handle);

        output.pause(handle);
        output.resume(handle);
        output.stop(handle);
        output.set_channel_volume(handle, 10);
        assert_eq!(output.live_channels(), 0);
    }

    #[test]
    fn test_effective_volume() {
        let mut output = RecordingOutput::new();
        let handle = output.play_loop(RAIN).unwrap();
        output.set_channel_volume(handle, 50);
        output.set_master_volume(60);
        assert_eq!(output.effective_volume(handle), 30);

        output.set_master_mute(true);
        assert_eq!(output.effective_volume(handle), 0);
        assert!(output.channel(handle).is_some());
    }

    #[test]
    fn test_unavailable_output() {
        let mut output = RecordingOutput::new();
        output.set_unavailable(true);

        let err = output.play_loop(RAIN).unwrap_err();
        assert!(matches!(err, PomodeskError::AudioUnavailable(_)));
        assert_eq!(output.live_channels(), 0);
        assert_eq!(output.commands(), &[AudioCommand::PlayFailed { cue: RAIN }]);
    }

    #[test]
    fn test_command_display() {
        let cmd = AudioCommand::PlayLoop {
            cue: RAIN,
            handle: ChannelHandle(1),
        };
        assert_eq!(cmd.to_string(), "play loop ambience:rain #1");
    }
}
