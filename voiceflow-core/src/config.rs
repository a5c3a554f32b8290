use serde::{Deserialize, Serialize};

/// How to start the external worker. Fixed for the lifetime of the app;
/// the worker is spawned exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerInvocation {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub worker: WorkerInvocation,

    /// Selected output language code shown in the session state.
    pub language: String,
}
