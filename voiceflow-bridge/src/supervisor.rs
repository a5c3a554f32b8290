use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;

use voiceflow_core::BridgeError;

use crate::traits::{WorkerIo, WorkerSpawner};

const CHANNEL_CAPACITY: usize = 64;
const READ_CHUNK: usize = 4096;

/// Raw output of the worker process, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
    Exited,
}

#[derive(Debug)]
enum SupervisorCmd {
    Write(Vec<u8>),
    Shutdown,
}

/// Cloneable handle to the single worker writer.
///
/// All writes are funneled through one task over one channel, so two `write`
/// calls can never interleave and submission order is delivery order.
#[derive(Clone)]
pub struct SupervisorHandle {
    tx: mpsc::Sender<SupervisorCmd>,
}

impl SupervisorHandle {
    /// Queues one encoded record for delivery to the worker's stdin.
    ///
    /// Fails fast with `WorkerUnavailable` once the worker could not be
    /// started or the writer has shut down.
    pub async fn write(&self, bytes: Vec<u8>) -> Result<(), BridgeError> {
        self.tx
            .send(SupervisorCmd::Write(bytes))
            .await
            .map_err(|_| BridgeError::WorkerUnavailable)
    }

    /// Closes the worker's stdin and signals termination. Idempotent.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(SupervisorCmd::Shutdown).await;
    }
}

/// Starts the worker via the host-supplied spawning capability and wires up
/// the writer and reader tasks.
///
/// A handle is returned even when the spawn fails: the supervisor is then in a
/// permanently failed state where every `write` fails fast, rather than
/// silently dropping input. The caller observes the failure as an immediate
/// `Exited` event.
pub async fn start(
    spawner: &dyn WorkerSpawner,
) -> (SupervisorHandle, mpsc::Receiver<SupervisorEvent>) {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<SupervisorCmd>(CHANNEL_CAPACITY);
    let (evt_tx, evt_rx) = mpsc::channel::<SupervisorEvent>(CHANNEL_CAPACITY);

    let io = match spawner.spawn_worker().await {
        Ok(io) => io,
        Err(e) => {
            log::error!("failed to start transcription worker: {e:#}");
            // Dropping the receiver closes the command channel, so every
            // subsequent write fails with WorkerUnavailable.
            drop(cmd_rx);
            let _ = evt_tx.send(SupervisorEvent::Exited).await;
            return (SupervisorHandle { tx: cmd_tx }, evt_rx);
        }
    };

    let WorkerIo {
        mut stdin,
        mut stdout,
        mut stderr,
        kill,
    } = io;

    // Writer task: the only owner of the worker's stdin.
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                SupervisorCmd::Write(bytes) => {
                    if let Err(e) = stdin.write_all(&bytes).await {
                        log::error!("worker stdin write failed: {e}");
                        break;
                    }
                    if let Err(e) = stdin.flush().await {
                        log::error!("worker stdin flush failed: {e}");
                        break;
                    }
                }
                SupervisorCmd::Shutdown => break,
            }
        }

        // Closing stdin asks the worker to exit; the kill handle is the backstop.
        let _ = stdin.shutdown().await;
        if let Some(kill) = kill {
            kill();
        }
    });

    // Stdout reader: protocol stream. EOF means the worker is gone.
    {
        let evt_tx = evt_tx.clone();
        tokio::spawn(async move {
            let mut buf = [0u8; READ_CHUNK];
            loop {
                match stdout.read(&mut buf).await {
                    Ok(0) => break,
                    Ok(n) => {
                        if evt_tx
                            .send(SupervisorEvent::Stdout(buf[..n].to_vec()))
                            .await
                            .is_err()
                        {
                            return;
                        }
                    }
                    Err(e) => {
                        log::warn!("worker stdout read failed: {e}");
                        break;
                    }
                }
            }
            let _ = evt_tx.send(SupervisorEvent::Exited).await;
        });
    }

    // Stderr reader: diagnostic-only, never parsed as protocol.
    tokio::spawn(async move {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match stderr.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if evt_tx
                        .send(SupervisorEvent::Stderr(buf[..n].to_vec()))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            }
        }
    });

    (SupervisorHandle { tx: cmd_tx }, evt_rx)
}
