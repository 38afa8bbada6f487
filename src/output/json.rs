//! JSON output formatting for pomodesk.

use serde::Serialize;

use crate::error::PomodeskError;

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `PomodeskError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, PomodeskError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Intent;
    use crate::features::audio::{AmbiencePreset, AudioCommand, ChannelHandle, CueId};
    use crate::features::focus::{Phase, Transition, TransitionKind};

    #[test]
    fn test_intent_json_shape() {
        let json = to_json(&Intent::SetVolume(40)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["intent"], "set_volume");
        assert_eq!(value["value"], 40);

        let json = to_json(&Intent::Start).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["intent"], "start");
    }

    #[test]
    fn test_transition_json_shape() {
        let transition = Transition {
            from: Phase::Working,
            to: Phase::ShortBreak,
            kind: TransitionKind::Completed,
        };
        let value: serde_json::Value =
            serde_json::from_str(&to_json(&transition).unwrap()).unwrap();
        assert_eq!(value["from"], "working");
        assert_eq!(value["to"], "short_break");
        assert_eq!(value["kind"], "completed");
    }

    #[test]
    fn test_audio_command_json_shape() {
        let command = AudioCommand::PlayLoop {
            cue: CueId::Ambience(AmbiencePreset::Wave),
            handle: ChannelHandle(3),
        };
        let value: serde_json::Value = serde_json::from_str(&to_json(&command).unwrap()).unwrap();
        assert_eq!(value["command"], "play_loop");
        assert_eq!(value["cue"]["ambience"], "wave");
        assert_eq!(value["handle"], 3);
    }
}
