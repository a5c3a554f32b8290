use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;

use voiceflow_bridge::traits::{WorkerIo, WorkerSpawner};
use voiceflow_core::WorkerInvocation;

/// The real process-spawning capability: starts the configured worker command
/// with all three stdio streams piped.
pub struct ProcessWorkerSpawner {
    invocation: WorkerInvocation,
}

impl ProcessWorkerSpawner {
    pub fn new(invocation: WorkerInvocation) -> Self {
        Self { invocation }
    }
}

#[async_trait]
impl WorkerSpawner for ProcessWorkerSpawner {
    async fn spawn_worker(&self) -> anyhow::Result<WorkerIo> {
        let mut child = tokio::process::Command::new(&self.invocation.program)
            .args(&self.invocation.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| {
                format!("spawn transcription worker: {}", self.invocation.program)
            })?;

        let stdin = child.stdin.take().context("worker stdin not piped")?;
        let stdout = child.stdout.take().context("worker stdout not piped")?;
        let stderr = child.stderr.take().context("worker stderr not piped")?;

        log::info!(
            "started transcription worker: {} (pid {:?})",
            self.invocation.program,
            child.id()
        );

        // The supervisor invokes this after closing stdin; kill_on_drop then
        // reaps the process so the handle is never leaked.
        let kill = Box::new(move || {
            let mut child = child;
            if let Err(e) = child.start_kill() {
                log::debug!("worker already exited: {e}");
            }
        });

        Ok(WorkerIo {
            stdin: Box::new(stdin),
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            kill: Some(kill),
        })
    }
}
