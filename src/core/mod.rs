//! Core abstractions for pomodesk.
//!
//! This module provides the frame clock and duration helpers shared by the
//! CLI and the TUI.

mod clock;
mod duration;

pub use clock::{ClockSource, FixedStepClock, MonotonicClock};
pub use duration::{
    format_duration, format_mmss, parse_duration, parse_duration_arg, render_progress_bar,
};
