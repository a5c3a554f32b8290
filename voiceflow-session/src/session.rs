use std::sync::Arc;

use thiserror::Error;

use voiceflow_core::{BridgeError, Command, WorkerMessage};

use crate::traits::CommandSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Idle,
    Recording,
    Uploading,
    Error,
}

/// The UI-visible state of one recording/upload/transcription attempt.
/// Mutated only through `SessionController` transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub mode: SessionMode,
    pub transcript: Vec<String>,
    pub language: String,
    pub last_error: Option<String>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// A recording or upload is already in progress; the request is rejected
    /// and the state left unchanged.
    #[error("session busy ({mode:?})")]
    Busy { mode: SessionMode },

    #[error("not recording")]
    NotRecording,

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Drives the session state machine from user actions and dispatcher
/// notifications. Transitions run on a single control task; the mode check is
/// the only mutual exclusion, which is sufficient because overlapping sessions
/// are rejected here.
pub struct SessionController {
    session: Session,
    sink: Arc<dyn CommandSink>,
}

impl SessionController {
    pub fn new(sink: Arc<dyn CommandSink>, language: impl Into<String>) -> Self {
        Self {
            session: Session {
                mode: SessionMode::Idle,
                transcript: Vec::new(),
                language: language.into(),
                last_error: None,
            },
            sink,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_language(&mut self, code: impl Into<String>) {
        self.session.language = code.into();
    }

    /// `Idle -> Recording`. Clears the previous transcript and error.
    pub async fn start_recording(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.begin_session();
        self.sink.submit(&Command::record_audio()).await?;
        self.session.mode = SessionMode::Recording;
        Ok(())
    }

    /// `Recording -> Idle`. Results for audio already captured may still
    /// arrive afterwards; stopping only signals intent.
    pub async fn stop_recording(&mut self) -> Result<(), SessionError> {
        if self.session.mode != SessionMode::Recording {
            return Err(SessionError::NotRecording);
        }
        self.sink.submit(&Command::stop_recording()).await?;
        self.session.mode = SessionMode::Idle;
        Ok(())
    }

    /// `Idle -> Uploading`, transcribing a file by path.
    pub async fn upload_file(&mut self, path: &str) -> Result<(), SessionError> {
        self.upload(Command::transcribe(path)).await
    }

    /// `Idle -> Uploading`, transcribing inline base64 audio.
    pub async fn upload_inline(
        &mut self,
        payload: &str,
        media_type: &str,
    ) -> Result<(), SessionError> {
        self.upload(Command::transcribe_base64(payload, media_type))
            .await
    }

    async fn upload(&mut self, command: Command) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.begin_session();
        self.session.mode = SessionMode::Uploading;

        if let Err(e) = self.sink.submit(&command).await {
            // The command never reached the worker; don't leave the session
            // stuck waiting for a result that cannot come.
            self.session.mode = SessionMode::Idle;
            self.session.last_error = Some(e.to_string());
            return Err(e.into());
        }
        Ok(())
    }

    /// Applies one dispatcher notification.
    pub fn on_message(&mut self, message: WorkerMessage) {
        if let Some(error) = message.error {
            log::warn!("worker reported error: {error}");
            self.session.last_error = Some(error);
            self.session.mode = SessionMode::Error;
            return;
        }

        if let Some(fragment) = message.result {
            // Dedup already happened in the dispatcher; arrival order is kept.
            self.session.transcript.push(fragment);
            if self.session.mode == SessionMode::Uploading {
                self.session.mode = SessionMode::Idle;
            }
        }
    }

    fn ensure_idle(&mut self) -> Result<(), SessionError> {
        match self.session.mode {
            SessionMode::Idle => Ok(()),
            // A worker error is cleared by the next user action.
            SessionMode::Error => {
                self.session.mode = SessionMode::Idle;
                Ok(())
            }
            mode => Err(SessionError::Busy { mode }),
        }
    }

    fn begin_session(&mut self) {
        self.session.transcript.clear();
        self.session.last_error = None;
        self.sink.reset_session();
    }
}
