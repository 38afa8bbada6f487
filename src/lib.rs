//! pomodesk - A Pomodoro focus timer
//!
//! This crate provides the session state machine, the audio cue coordinator
//! that follows it, and the terminal and command-line front ends.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use controller::{Controller, Intent};
pub use error::PomodeskError;
