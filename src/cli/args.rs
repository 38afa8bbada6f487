use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::config::TimerOverrides;
use crate::core::parse_duration_arg;
use crate::features::audio::AmbiencePreset;

#[derive(Parser)]
#[command(name = "pomodesk")]
#[command(about = "A Pomodoro focus timer with ambient sound and alarm cues")]
#[command(long_about = "pomodesk - A Pomodoro focus timer

Alternates work phases and breaks, plays a looping ambient sound (rain,
wave or wind) while you work and rings an alarm at every phase boundary.

QUICK START:
  pomodesk                         Open the timer
  pomodesk run --work 50m          Open with 50-minute work phases
  pomodesk simulate --frames 40 --step 1m
                                   Run a session headless and show the cues

Configuration lives in ~/.pomodesk/config.yaml (see 'pomodesk config').")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Log debug details to ~/.pomodesk/pomodesk.log
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive timer (default)
    ///
    /// Keys:
    ///   s        start          p   pause / resume
    ///   x        stop           r   reset
    ///   m        mute toggle    +/- volume
    ///   1/2/3    rain/wave/wind q   quit
    ///
    /// # Examples
    ///
    ///   pomodesk run
    ///   pomodesk run --work 50m --short-break 10m
    ///   pomodesk run --ambience wave --volume 60
    Run(RunArgs),

    /// Run a session headless with a simulated clock
    ///
    /// Advances the timer by a fixed step per frame and prints every phase
    /// transition together with the audio commands it produced. Useful to
    /// check a configuration before committing to it.
    ///
    /// Intents are given as NAME@FRAME, comma separated. Names: start,
    /// pause, resume, stop, reset, mute, unmute, volume=N, preset=NAME.
    ///
    /// # Examples
    ///
    ///   pomodesk simulate --frames 60 --step 1m
    ///   pomodesk simulate --intents "start@0,pause@10,resume@15"
    ///   pomodesk simulate --work 2m --short-break 1m --rounds 2 -o json
    Simulate(SimulateArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Print a shell completion script
    ///
    /// # Examples
    ///
    ///   source <(pomodesk completions bash)
    ///   pomodesk completions fish > ~/.config/fish/completions/pomodesk.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Timer overrides shared by `run` and `simulate`.
#[derive(Args, Debug, Clone, Default)]
pub struct TimerArgs {
    /// Work phase duration (e.g., 25m, 1h, 90s)
    #[arg(long, short = 'w', value_parser = parse_duration_arg)]
    pub work: Option<Duration>,

    /// Short break duration
    #[arg(long, value_parser = parse_duration_arg)]
    pub short_break: Option<Duration>,

    /// Long break duration
    #[arg(long, value_parser = parse_duration_arg)]
    pub long_break: Option<Duration>,

    /// Work phases before a long break
    #[arg(long, short = 'c')]
    pub cycles: Option<u32>,

    /// Finish after this many work phases
    #[arg(long)]
    pub rounds: Option<u32>,
}

impl TimerArgs {
    #[must_use]
    pub const fn overrides(&self) -> TimerOverrides {
        TimerOverrides {
            work: self.work,
            short_break: self.short_break,
            long_break: self.long_break,
            cycles_before_long_break: self.cycles,
            rounds: self.rounds,
        }
    }
}

/// Audio overrides shared by `run` and `simulate`.
#[derive(Args, Debug, Clone, Default)]
pub struct AudioArgs {
    /// Start muted
    #[arg(long)]
    pub muted: bool,

    /// Master volume (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,

    /// Ambient sound for work phases
    #[arg(long, value_enum)]
    pub ambience: Option<AmbiencePreset>,
}

/// Arguments for the interactive timer.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub timer: TimerArgs,

    #[command(flatten)]
    pub audio: AudioArgs,
}

/// Arguments for headless simulation.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub timer: TimerArgs,

    #[command(flatten)]
    pub audio: AudioArgs,

    /// Number of frames to run
    #[arg(long, short = 'n', default_value = "60")]
    pub frames: u32,

    /// Clock advance per frame (e.g., 1m, 30s)
    #[arg(long, short = 's', default_value = "1m", value_parser = parse_duration_arg)]
    pub step: Duration,

    /// Intents to submit, as NAME@FRAME (comma separated)
    #[arg(long, short = 'i', default_value = "start@0")]
    pub intents: String,

    /// Emulate a lost audio device (every play request fails)
    #[arg(long)]
    pub no_audio: bool,
}

/// Arguments for configuration management.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
}
