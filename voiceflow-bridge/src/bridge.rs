use std::sync::Arc;

use serde_json::{Map, Value};

use voiceflow_core::{BridgeError, Command, FrameDecoder, WorkerMessage};

use crate::dispatcher::Dispatcher;
use crate::router::Router;
use crate::supervisor::{self, SupervisorEvent, SupervisorHandle};
use crate::traits::WorkerSpawner;

/// The capability surface crossing the UI / privileged-process boundary.
///
/// Exactly two operations are exposed: fire-and-forget `call` on the write
/// path and a single replaceable callback on the read path. Nothing else about
/// the worker is observable through this handle, which is what lets the
/// privileged side sanitize all traffic.
#[derive(Clone)]
pub struct BridgeHandle {
    router: Arc<Router>,
    dispatcher: Arc<Dispatcher>,
    supervisor: SupervisorHandle,
}

impl BridgeHandle {
    /// Submits one command to the worker. No synchronous result: any number of
    /// responses (including zero) may arrive later through the subscriber.
    pub async fn call(
        &self,
        name: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<(), BridgeError> {
        self.submit(&Command::new(name, args, kwargs)).await
    }

    pub async fn submit(&self, command: &Command) -> Result<(), BridgeError> {
        self.router.submit(command).await
    }

    /// Registers the response subscriber, replacing any previous one.
    pub fn subscribe_responses(&self, callback: impl Fn(WorkerMessage) + Send + Sync + 'static) {
        self.dispatcher.subscribe(callback);
    }

    /// Clears per-session dispatcher state (result dedup) when a new
    /// recording or upload begins.
    pub fn reset_session(&self) {
        self.dispatcher.reset();
    }

    pub async fn shutdown(&self) {
        self.supervisor.shutdown().await;
    }
}

/// Starts the worker and the event pump connecting its stdout to the
/// dispatcher. Stderr is logged, never parsed.
pub async fn spawn_bridge(spawner: &dyn WorkerSpawner) -> BridgeHandle {
    let (supervisor, mut events) = supervisor::start(spawner).await;
    let dispatcher = Arc::new(Dispatcher::new());
    let router = Arc::new(Router::new(supervisor.clone()));

    {
        let dispatcher = dispatcher.clone();
        let supervisor = supervisor.clone();
        tokio::spawn(async move {
            let mut decoder = FrameDecoder::new();
            while let Some(event) = events.recv().await {
                match event {
                    SupervisorEvent::Stdout(bytes) => {
                        for decoded in decoder.feed(&bytes) {
                            match decoded {
                                Ok(message) => dispatcher.dispatch(message),
                                // Non-fatal: drop the line, keep the stream running.
                                Err(e) => log::warn!("dropped undecodable worker line: {e}"),
                            }
                        }
                    }
                    SupervisorEvent::Stderr(bytes) => {
                        let text = String::from_utf8_lossy(&bytes);
                        for line in text.lines().filter(|l| !l.trim().is_empty()) {
                            log::debug!("worker stderr: {line}");
                        }
                    }
                    SupervisorEvent::Exited => {
                        log::warn!("transcription worker exited; further commands will fail");
                        // Stop the writer so pending calls fail fast instead of
                        // queueing into a dead process.
                        supervisor.shutdown().await;
                    }
                }
            }
        });
    }

    BridgeHandle {
        router,
        dispatcher,
        supervisor,
    }
}
