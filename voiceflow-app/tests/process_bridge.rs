//! End-to-end checks against a real child process standing in for the
//! transcription worker.

#![cfg(unix)]

use std::time::Duration;

use tokio::sync::mpsc;

use voiceflow_app::service::AppService;
use voiceflow_core::{AppConfig, WorkerInvocation, WorkerMessage};
use voiceflow_session::session::SessionMode;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// A shell loop that answers every request with a fixed result record, with
/// some non-protocol chatter mixed in the way the real worker prints progress.
fn echo_worker() -> AppConfig {
    AppConfig {
        worker: WorkerInvocation {
            program: "/bin/sh".into(),
            args: vec![
                "-c".into(),
                "while read line; do \
                   echo 'Processing chunk for transcription...'; \
                   echo '{\"result\":\"transcribed text\"}'; \
                 done"
                    .into(),
            ],
        },
        language: "en".into(),
    }
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<WorkerMessage>) -> WorkerMessage {
    tokio::time::timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for a worker message")
        .expect("observer channel closed")
}

#[tokio::test]
async fn upload_round_trips_through_a_real_process() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let service = AppService::start_with_observer(&echo_worker(), move |message| {
        let _ = tx.send(message.clone());
    })
    .await;

    service.upload_file("clip.wav").await.unwrap();

    // The chatter line is dropped by the framer; only the protocol record
    // reaches the session.
    assert_eq!(recv(&mut rx).await, WorkerMessage::result("transcribed text"));

    let session = service.snapshot().await;
    assert_eq!(session.mode, SessionMode::Idle);
    assert_eq!(session.transcript, vec!["transcribed text"]);

    service.shutdown().await;
}

#[tokio::test]
async fn missing_worker_binary_fails_fast() {
    let cfg = AppConfig {
        worker: WorkerInvocation {
            program: "/nonexistent/worker".into(),
            args: vec![],
        },
        language: "en".into(),
    };

    let service = AppService::start(&cfg).await;

    let err = service.start_recording().await.unwrap_err();
    assert!(err.to_string().contains("unavailable"));
    assert_eq!(service.snapshot().await.mode, SessionMode::Idle);
}
