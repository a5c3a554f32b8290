use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use voiceflow_core::WorkerMessage;

type ResponseCallback = Arc<dyn Fn(WorkerMessage) + Send + Sync>;

/// Delivers decoded worker messages to the single registered subscriber.
///
/// Result fragments already delivered in the current session are suppressed
/// here rather than in the session, which keeps the state machine simpler and
/// lets the dedup rule be tested in isolation. Error messages always pass
/// through.
#[derive(Default)]
pub struct Dispatcher {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    subscriber: Option<ResponseCallback>,
    delivered_results: HashSet<String>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the subscriber, replacing any previous one atomically.
    /// Re-registration across UI re-mounts can therefore never stack.
    pub fn subscribe(&self, callback: impl Fn(WorkerMessage) + Send + Sync + 'static) {
        self.lock().subscriber = Some(Arc::new(callback));
    }

    /// Forgets previously delivered result fragments. Called when a new
    /// recording or upload session begins.
    pub fn reset(&self) {
        self.lock().delivered_results.clear();
    }

    pub fn dispatch(&self, message: WorkerMessage) {
        let subscriber = {
            let mut inner = self.lock();

            if let Some(text) = message.result.as_ref() {
                if !inner.delivered_results.insert(text.clone()) {
                    log::debug!("suppressed duplicate result fragment");
                    return;
                }
            }
            inner.subscriber.clone()
        };

        // Invoke outside the lock so a callback may re-subscribe.
        match subscriber {
            Some(callback) => callback(message),
            None => log::warn!("worker message dropped: no subscriber registered"),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
