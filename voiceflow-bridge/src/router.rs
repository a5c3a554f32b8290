use voiceflow_core::{BridgeError, Command, encode_command, is_known_command};

use crate::supervisor::SupervisorHandle;

/// The single choke point for UI-originated requests.
///
/// Validates the command name, serializes exactly once, and hands the record
/// to the supervisor's writer. Unrecognized commands never reach the worker.
pub struct Router {
    supervisor: SupervisorHandle,
}

impl Router {
    pub fn new(supervisor: SupervisorHandle) -> Self {
        Self { supervisor }
    }

    pub async fn submit(&self, command: &Command) -> Result<(), BridgeError> {
        if !is_known_command(&command.name) {
            return Err(BridgeError::UnknownCommand(command.name.clone()));
        }
        self.supervisor.write(encode_command(command)).await
    }
}
