//! Command implementations for pomodesk.
//!
//! Every command returns the text to print; `main` does the printing.

mod completions;
mod config;
mod run;
mod simulate;

pub use completions::completions;
pub use config::{config_init, config_path, config_show};
pub use run::run;
pub use simulate::{
    parse_schedule, simulate, simulated_span, FrameRecord, ScheduledIntent, SimulationReport,
};

use crate::cli::args::AudioArgs;
use crate::config::Config;
use crate::features::audio::AudioSettings;

/// Startup audio settings: config file values with command-line overrides.
fn audio_settings(config: &Config, args: &AudioArgs) -> AudioSettings {
    let base = config.audio_settings();
    AudioSettings::new(
        base.muted || args.muted,
        args.volume.unwrap_or(base.volume),
        args.ambience.unwrap_or(base.ambience_preset),
    )
}
