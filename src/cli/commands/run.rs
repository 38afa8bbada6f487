//! Interactive timer command.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::args::RunArgs;
use crate::config::{Config, Paths};
use crate::controller::Controller;
use crate::core::MonotonicClock;
use crate::error::PomodeskError;
use crate::features::audio::{AudioOutput, RecordingOutput};
use crate::tui;

/// Execute the run command: open the TUI.
///
/// # Errors
///
/// Returns an error for an invalid timer configuration or if the terminal
/// cannot be used.
pub fn run(config: &Config, paths: &Paths, args: &RunArgs) -> Result<String, PomodeskError> {
    let session = config.session_config_with(&args.timer.overrides())?;
    let settings = super::audio_settings(config, &args.audio);
    let output = open_output(config.sounds_dir(paths));

    let controller = Controller::new(
        session,
        settings,
        config.cue_levels(),
        output,
        MonotonicClock::new(),
    );

    tui::run(controller, Duration::from_millis(config.general.frame_ms.max(1)))?;
    Ok(String::new())
}

/// Open the sound device, falling back to a silent output.
#[cfg(feature = "device")]
fn open_output(sounds_dir: PathBuf) -> Box<dyn AudioOutput> {
    match crate::features::audio::DeviceOutput::open(sounds_dir) {
        Ok(device) => Box::new(device),
        Err(e) => {
            tracing::warn!(error = %e, "audio device unavailable, running silent");
            Box::new(RecordingOutput::silent())
        }
    }
}

#[cfg(not(feature = "device"))]
fn open_output(sounds_dir: PathBuf) -> Box<dyn AudioOutput> {
    tracing::info!(
        sounds_dir = %sounds_dir.display(),
        "built without the device feature, running silent"
    );
    Box::new(RecordingOutput::silent())
}
