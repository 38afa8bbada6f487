//! Cue coordinator.
//!
//! Turns session transitions and settings changes into audio commands.
//! Holds at most one ambience channel and at most one alarm channel.

use serde::{Deserialize, Serialize};

use super::{AudioOutput, AudioSettings, ChannelHandle, CueId, MAX_VOLUME};
use crate::error::PomodeskError;
use crate::features::audio::AmbiencePreset;
use crate::features::focus::{Phase, Transition, TransitionKind};

/// Per-cue channel volumes (0..=100), applied under the master volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueLevels {
    pub ambience: u8,
    pub alarm: u8,
}

impl Default for CueLevels {
    fn default() -> Self {
        Self {
            ambience: MAX_VOLUME,
            alarm: MAX_VOLUME,
        }
    }
}

/// The ambience channel currently owned by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveAmbience {
    pub handle: ChannelHandle,
    pub preset: AmbiencePreset,
    pub paused: bool,
}

/// Keeps playback consistent with the session phase and audio settings.
#[derive(Debug)]
pub struct CueCoordinator<A: AudioOutput> {
    output: A,
    levels: CueLevels,
    ambience: Option<ActiveAmbience>,
    alarm: Option<ChannelHandle>,
}

impl<A: AudioOutput> CueCoordinator<A> {
    /// Create a coordinator and push the initial master state to the output.
    pub fn new(mut output: A, levels: CueLevels, settings: &AudioSettings) -> Self {
        output.set_master_volume(settings.volume);
        output.set_master_mute(settings.muted);
        Self {
            output,
            levels,
            ambience: None,
            alarm: None,
        }
    }

    /// React to a state machine transition.
    ///
    /// Every command derived from the transition is issued even if an
    /// earlier one fails; the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns `AudioUnavailable` if a cue could not be started. The failed
    /// cue is recorded as not playing.
    pub fn on_transition(
        &mut self,
        transition: Transition,
        settings: &AudioSettings,
    ) -> Result<(), PomodeskError> {
        tracing::debug!(
            from = %transition.from,
            to = %transition.to,
            kind = ?transition.kind,
            "cue coordinator reacting"
        );

        match transition.kind {
            TransitionKind::Paused => {
                self.pause_ambience();
                Ok(())
            }
            TransitionKind::Resumed => {
                if transition.to == Phase::Working {
                    self.ensure_ambience(settings.ambience_preset)
                } else {
                    Ok(())
                }
            }
            TransitionKind::Stopped | TransitionKind::Reset => {
                self.release_all();
                Ok(())
            }
            TransitionKind::Started | TransitionKind::Completed => {
                if transition.to != Phase::Working {
                    self.stop_ambience();
                }
                let alarm = if transition.kind == TransitionKind::Completed {
                    self.trigger_alarm()
                } else {
                    Ok(())
                };
                let ambience = if transition.to == Phase::Working {
                    self.ensure_ambience(settings.ambience_preset)
                } else {
                    Ok(())
                };
                alarm.and(ambience)
            }
        }
    }

    /// Apply a mute toggle. Channels keep playing silently while muted.
    pub fn on_mute_changed(&mut self, settings: &AudioSettings) {
        tracing::info!(muted = settings.muted, volume = settings.volume, "mute changed");
        self.output.set_master_mute(settings.muted);
        if !settings.muted {
            self.output.set_master_volume(settings.volume);
        }
    }

    /// Apply a master volume change without interrupting playback.
    pub fn on_volume_changed(&mut self, settings: &AudioSettings) {
        tracing::debug!(volume = settings.volume, "volume changed");
        self.output.set_master_volume(settings.volume);
    }

    /// Switch ambience to the newly selected preset.
    ///
    /// Takes effect immediately while working; a paused ambience switches
    /// when the session resumes.
    ///
    /// # Errors
    ///
    /// Returns `AudioUnavailable` if the new ambience could not be started.
    pub fn on_preset_changed(
        &mut self,
        phase: Phase,
        settings: &AudioSettings,
    ) -> Result<(), PomodeskError> {
        tracing::info!(preset = %settings.ambience_preset, %phase, "ambience preset changed");
        if phase == Phase::Working {
            self.ensure_ambience(settings.ambience_preset)
        } else {
            Ok(())
        }
    }

    /// Stop every cue. Called when the application exits.
    pub fn shutdown(&mut self) {
        self.release_all();
    }

    /// Make sure exactly one ambience channel for `preset` is playing.
    fn ensure_ambience(&mut self, preset: AmbiencePreset) -> Result<(), PomodeskError> {
        match self.ambience {
            Some(active) if active.preset == preset => {
                if active.paused {
                    self.output.resume(active.handle);
                    self.ambience = Some(ActiveAmbience {
                        paused: false,
                        ..active
                    });
                }
                Ok(())
            }
            _ => {
                self.stop_ambience();
                self.start_ambience(preset)
            }
        }
    }

    fn start_ambience(&mut self, preset: AmbiencePreset) -> Result<(), PomodeskError> {
        let cue = CueId::Ambience(preset);
        match self.output.play_loop(cue) {
            Ok(handle) => {
                self.output.set_channel_volume(handle, self.levels.ambience);
                tracing::debug!(%cue, %handle, "ambience started");
                self.ambience = Some(ActiveAmbience {
                    handle,
                    preset,
                    paused: false,
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%cue, error = %e, "ambience could not start");
                self.ambience = None;
                Err(e)
            }
        }
    }

    fn pause_ambience(&mut self) {
        if let Some(active) = self.ambience.as_mut() {
            if !active.paused {
                self.output.pause(active.handle);
                active.paused = true;
                tracing::debug!(handle = %active.handle, "ambience paused");
            }
        }
    }

    fn stop_ambience(&mut self) {
        if let Some(active) = self.ambience.take() {
            self.output.stop(active.handle);
            tracing::debug!(handle = %active.handle, "ambience stopped");
        }
    }

    /// Fire the one-shot alarm, superseding one still sounding.
    fn trigger_alarm(&mut self) -> Result<(), PomodeskError> {
        if let Some(previous) = self.alarm.take() {
            self.output.stop(previous);
        }

        match self.output.play_once(CueId::Alarm) {
            Ok(handle) => {
                self.output.set_channel_volume(handle, self.levels.alarm);
                tracing::debug!(%handle, "alarm triggered");
                self.alarm = Some(handle);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "alarm could not play");
                Err(e)
            }
        }
    }

    fn release_all(&mut self) {
        self.stop_ambience();
        if let Some(handle) = self.alarm.take() {
            self.output.stop(handle);
        }
    }

    /// The ambience channel currently owned, if any.
    #[must_use]
    pub const fn ambience(&self) -> Option<ActiveAmbience> {
        self.ambience
    }

    /// The most recent alarm channel, if not yet released.
    #[must_use]
    pub const fn alarm(&self) -> Option<ChannelHandle> {
        self.alarm
    }

    #[must_use]
    pub const fn levels(&self) -> CueLevels {
        self.levels
    }

    #[must_use]
    pub const fn output(&self) -> &A {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut A {
        &mut self.output
    }
}
