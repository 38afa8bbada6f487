//! Audio output through the default sound device.
//!
//! One `rodio::Sink` per channel. Sound files (`rain.wav`, `wave.wav`,
//! `wind.wav`, `alarm.wav`) are read from the sounds directory on first use
//! and kept in memory.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::{AudioOutput, ChannelHandle, CueId, MAX_VOLUME};
use crate::error::PomodeskError;

struct DeviceChannel {
    sink: Sink,
    volume: u8,
}

/// Plays cues on the system's default output device.
pub struct DeviceOutput {
    // Dropping the stream silences every sink.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sounds_dir: PathBuf,
    sounds: HashMap<&'static str, Arc<[u8]>>,
    channels: HashMap<ChannelHandle, DeviceChannel>,
    next_handle: u64,
    master_muted: bool,
    master_volume: u8,
}

impl DeviceOutput {
    /// Open the default output device.
    ///
    /// # Errors
    ///
    /// Returns `AudioUnavailable` if no output device can be opened.
    pub fn open(sounds_dir: PathBuf) -> Result<Self, PomodeskError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| PomodeskError::AudioUnavailable(format!("No output device: {e}")))?;

        tracing::info!(sounds_dir = %sounds_dir.display(), "audio device opened");

        Ok(Self {
            _stream: stream,
            handle,
            sounds_dir,
            sounds: HashMap::new(),
            channels: HashMap::new(),
            next_handle: 1,
            master_muted: false,
            master_volume: MAX_VOLUME,
        })
    }

    fn sound_data(&mut self, cue: CueId) -> Result<Arc<[u8]>, PomodeskError> {
        let stem = cue.file_stem();
        if let Some(data) = self.sounds.get(stem) {
            return Ok(Arc::clone(data));
        }

        let path = self.sounds_dir.join(format!("{stem}.wav"));
        let data: Arc<[u8]> = std::fs::read(&path)
            .map_err(|e| {
                PomodeskError::AudioUnavailable(format!(
                    "Failed to load sound {}: {e}",
                    path.display()
                ))
            })?
            .into();
        self.sounds.insert(stem, Arc::clone(&data));
        Ok(data)
    }

    fn start(&mut self, cue: CueId, looping: bool) -> Result<ChannelHandle, PomodeskError> {
        self.reap_finished();

        let data = self.sound_data(cue)?;
        let source = Decoder::new(Cursor::new(data))
            .map_err(|e| PomodeskError::AudioUnavailable(format!("Cannot decode {cue}: {e}")))?;
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| PomodeskError::AudioUnavailable(format!("Cannot open channel: {e}")))?;

        if looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }

        let handle = ChannelHandle(self.next_handle);
        self.next_handle += 1;

        let channel = DeviceChannel {
            sink,
            volume: MAX_VOLUME,
        };
        self.apply_volume(&channel);
        self.channels.insert(handle, channel);

        tracing::debug!(%cue, %handle, looping, "channel started");
        Ok(handle)
    }

    fn apply_volume(&self, channel: &DeviceChannel) {
        let volume = if self.master_muted {
            0.0
        } else {
            f32::from(channel.volume) / f32::from(MAX_VOLUME) * f32::from(self.master_volume)
                / f32::from(MAX_VOLUME)
        };
        channel.sink.set_volume(volume);
    }

    fn apply_all_volumes(&self) {
        for channel in self.channels.values() {
            self.apply_volume(channel);
        }
    }

    /// Drop sinks whose one-shot sound has finished.
    fn reap_finished(&mut self) {
        self.channels.retain(|_, channel| !channel.sink.empty());
    }
}

impl AudioOutput for DeviceOutput {
    fn play_once(&mut self, cue: CueId) -> Result<ChannelHandle, PomodeskError> {
        self.start(cue, false)
    }

    fn play_loop(&mut self, cue: CueId) -> Result<ChannelHandle, PomodeskError> {
        self.start(cue, true)
    }

    fn pause(&mut self, handle: ChannelHandle) {
        if let Some(channel) = self.channels.get(&handle) {
            channel.sink.pause();
        }
    }

    fn resume(&mut self, handle: ChannelHandle) {
        if let Some(channel) = self.channels.get(&handle) {
            channel.sink.play();
        }
    }

    fn stop(&mut self, handle: ChannelHandle) {
        if let Some(channel) = self.channels.remove(&handle) {
            channel.sink.stop();
        }
    }

    fn set_master_mute(&mut self, muted: bool) {
        self.master_muted = muted;
        self.apply_all_volumes();
    }

    fn set_master_volume(&mut self, volume: u8) {
        self.master_volume = volume.min(MAX_VOLUME);
        self.apply_all_volumes();
    }

    fn set_channel_volume(&mut self, handle: ChannelHandle, volume: u8) {
        if let Some(channel) = self.channels.get_mut(&handle) {
            channel.volume = volume.min(MAX_VOLUME);
        }
        if let Some(channel) = self.channels.get(&handle) {
            self.apply_volume(channel);
        }
    }
}

impl Drop for DeviceOutput {
    fn drop(&mut self) {
        for channel in self.channels.values() {
            channel.sink.stop();
        }
    }
}
