use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

/// The piped stdio of a started worker, plus a best-effort way to terminate it.
///
/// The streams are boxed so the supervisor works the same against a real child
/// process and against in-memory pipes in tests.
pub struct WorkerIo {
    pub stdin: Box<dyn AsyncWrite + Send + Unpin>,
    pub stdout: Box<dyn AsyncRead + Send + Unpin>,
    pub stderr: Box<dyn AsyncRead + Send + Unpin>,

    /// Invoked on shutdown after stdin is closed. `None` when there is no
    /// process handle to signal (in-memory workers).
    pub kill: Option<Box<dyn FnOnce() + Send>>,
}

/// Host-supplied capability: "start process P with stdin/stdout/stderr pipes".
/// The supervisor calls this exactly once per application run.
#[async_trait]
pub trait WorkerSpawner: Send + Sync {
    async fn spawn_worker(&self) -> anyhow::Result<WorkerIo>;
}
