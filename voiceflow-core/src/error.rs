use thiserror::Error;

/// Local failures of the bridge itself. Errors reported by a running worker are
/// not represented here; those travel as data (`WorkerMessage::error`) to the
/// session.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The worker failed to start or has exited; no command can be delivered.
    #[error("transcription worker unavailable")]
    WorkerUnavailable,

    /// Rejected locally by the router; never reaches the worker.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A complete line from the worker that is not a well-formed protocol record.
/// Always non-fatal: the line is dropped and decoding continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("worker line is not valid UTF-8")]
    InvalidUtf8,

    #[error("worker line is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("worker message has neither result nor error")]
    MissingPayload,

    #[error("worker message has both result and error")]
    AmbiguousPayload,
}
