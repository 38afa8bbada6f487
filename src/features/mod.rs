//! Feature implementations for pomodesk.
//!
//! - Focus sessions: phases, timing and the session state machine
//! - Audio: ambience and alarm cues driven by the session

pub mod audio;
pub mod focus;
