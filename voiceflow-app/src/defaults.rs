use voiceflow_core::{AppConfig, WorkerInvocation};

/// The legacy fixed worker invocation, relative to the app's working
/// directory.
pub fn default_config() -> AppConfig {
    AppConfig {
        worker: WorkerInvocation {
            program: "python".into(),
            args: vec!["src/whisper/Whisper_transc.py".into()],
        },
        language: "en".into(),
    }
}
