//! Pomodoro session timing.
//!
//! Provides the focus session state machine:
//! - Work / short break / long break phases
//! - Start/pause/resume/stop/reset intents
//! - Frame-driven ticking with phase completion events

pub mod machine;
pub mod phase;
pub mod session;

pub use machine::{PhaseCompleted, SessionMachine, SessionState, Transition, TransitionKind};
pub use phase::Phase;
pub use session::SessionConfig;
