use async_trait::async_trait;

use voiceflow_core::{BridgeError, Command};

/// What the session is allowed to do with the bridge: submit a command and
/// mark the start of a new session. This is the write half of the capability
/// surface; responses arrive separately via `SessionController::on_message`.
#[async_trait]
pub trait CommandSink: Send + Sync {
    async fn submit(&self, command: &Command) -> Result<(), BridgeError>;

    /// Forget per-session dispatcher state (result dedup).
    fn reset_session(&self);
}
