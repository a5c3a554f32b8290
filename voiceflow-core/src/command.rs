use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const CMD_RECORD_AUDIO: &str = "record_audio";
pub const CMD_STOP_RECORDING: &str = "stop_recording";
pub const CMD_TRANSCRIBE: &str = "transcribe";
pub const CMD_TRANSCRIBE_BASE64: &str = "transcribe_base64";

/// Every operation the worker understands. The router rejects anything else
/// before it reaches the worker's stdin.
pub const KNOWN_COMMANDS: [&str; 4] = [
    CMD_RECORD_AUDIO,
    CMD_STOP_RECORDING,
    CMD_TRANSCRIBE,
    CMD_TRANSCRIBE_BASE64,
];

pub fn is_known_command(name: &str) -> bool {
    KNOWN_COMMANDS.contains(&name)
}

/// One request to the worker. Immutable once constructed; serialized exactly once
/// by the framer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "command")]
    pub name: String,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

impl Command {
    pub fn new(name: impl Into<String>, args: Vec<Value>, kwargs: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            args,
            kwargs,
        }
    }

    pub fn record_audio() -> Self {
        Self::new(CMD_RECORD_AUDIO, vec![], Map::new())
    }

    pub fn stop_recording() -> Self {
        Self::new(CMD_STOP_RECORDING, vec![], Map::new())
    }

    pub fn transcribe(path: impl Into<String>) -> Self {
        Self::new(CMD_TRANSCRIBE, vec![Value::String(path.into())], Map::new())
    }

    pub fn transcribe_base64(payload: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self::new(
            CMD_TRANSCRIBE_BASE64,
            vec![
                Value::String(payload.into()),
                Value::String(media_type.into()),
            ],
            Map::new(),
        )
    }
}
