use serde::{Deserialize, Serialize};

/// One decoded record from the worker's stdout.
///
/// The protocol contract is that exactly one of the two fields is populated;
/// the framer rejects anything else as a decode error before it gets here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkerMessage {
    pub fn result(text: impl Into<String>) -> Self {
        Self {
            result: Some(text.into()),
            error: None,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(text.into()),
        }
    }
}
