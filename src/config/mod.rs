//! Configuration management for pomodesk.
//!
//! This module handles loading and saving configuration from `~/.pomodesk/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{AudioConfig, Config, GeneralConfig, TimerConfig, TimerOverrides};
