use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;

use voiceflow_bridge::bridge::{BridgeHandle, spawn_bridge};
use voiceflow_core::{AppConfig, BridgeError, Command, WorkerMessage};
use voiceflow_session::session::{Session, SessionController, SessionError};
use voiceflow_session::traits::CommandSink;

use crate::process::ProcessWorkerSpawner;

/// Adapts the bridge capability surface to the session's `CommandSink` seam.
struct BridgeSink(BridgeHandle);

#[async_trait]
impl CommandSink for BridgeSink {
    async fn submit(&self, command: &Command) -> Result<(), BridgeError> {
        self.0.submit(command).await
    }

    fn reset_session(&self) {
        self.0.reset_session();
    }
}

/// Owns the bridge and the session controller and pumps dispatcher
/// notifications into the session on a single control task, so session
/// transitions never race.
#[derive(Clone)]
pub struct AppService {
    bridge: BridgeHandle,
    controller: Arc<tokio::sync::Mutex<SessionController>>,
}

impl AppService {
    pub async fn start(cfg: &AppConfig) -> Self {
        Self::start_with_observer(cfg, |_| {}).await
    }

    /// Same as `start`, but also invokes `observer` for every message after it
    /// has been applied to the session (e.g. for live UI output).
    pub async fn start_with_observer(
        cfg: &AppConfig,
        observer: impl Fn(&WorkerMessage) + Send + Sync + 'static,
    ) -> Self {
        let spawner = ProcessWorkerSpawner::new(cfg.worker.clone());
        let bridge = spawn_bridge(&spawner).await;

        let sink: Arc<dyn CommandSink> = Arc::new(BridgeSink(bridge.clone()));
        let controller = Arc::new(tokio::sync::Mutex::new(SessionController::new(
            sink,
            cfg.language.clone(),
        )));

        // Single-slot subscription: this replaces any earlier subscriber, so a
        // restarted UI can never stack callbacks.
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        bridge.subscribe_responses(move |message| {
            let _ = tx.send(message);
        });

        {
            let controller = controller.clone();
            tokio::spawn(async move {
                while let Some(message) = rx.recv().await {
                    controller.lock().await.on_message(message.clone());
                    observer(&message);
                }
            });
        }

        Self { bridge, controller }
    }

    pub async fn start_recording(&self) -> Result<(), SessionError> {
        self.controller.lock().await.start_recording().await
    }

    pub async fn stop_recording(&self) -> Result<(), SessionError> {
        self.controller.lock().await.stop_recording().await
    }

    pub async fn upload_file(&self, path: &str) -> Result<(), SessionError> {
        self.controller.lock().await.upload_file(path).await
    }

    /// Transcribes an in-memory clip by sending it inline as base64.
    pub async fn upload_audio_bytes(
        &self,
        bytes: &[u8],
        media_type: &str,
    ) -> Result<(), SessionError> {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        self.controller
            .lock()
            .await
            .upload_inline(&payload, media_type)
            .await
    }

    pub async fn set_language(&self, code: &str) {
        self.controller.lock().await.set_language(code);
    }

    pub async fn snapshot(&self) -> Session {
        self.controller.lock().await.session().clone()
    }

    pub async fn shutdown(&self) {
        self.bridge.shutdown().await;
    }
}
