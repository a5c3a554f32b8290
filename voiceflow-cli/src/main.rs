use std::path::PathBuf;

use tokio::io::AsyncBufReadExt;

use voiceflow_app::config_store::ConfigStore;
use voiceflow_app::service::AppService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path = std::env::var_os("VOICEFLOW_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("voiceflow.json"));
    let cfg = ConfigStore::at_path(config_path).load_or_default();

    log::info!(
        "worker invocation: {} {:?}",
        cfg.worker.program,
        cfg.worker.args
    );

    let service = AppService::start_with_observer(&cfg, |message| {
        if let Some(text) = &message.result {
            println!("{text}");
        }
        if let Some(error) = &message.error {
            eprintln!("worker error: {error}");
        }
    })
    .await;

    println!("commands: record | stop | upload <path> | lang <code> | show | quit");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (verb, rest) = match line.split_once(' ') {
            Some((v, r)) => (v, r.trim()),
            None => (line, ""),
        };

        match verb {
            "" => {}
            "record" => report(service.start_recording().await),
            "stop" => report(service.stop_recording().await),
            "upload" => {
                if rest.is_empty() {
                    eprintln!("usage: upload <path>");
                } else {
                    report(service.upload_file(rest).await);
                }
            }
            "lang" => {
                if rest.is_empty() {
                    eprintln!("usage: lang <code>");
                } else {
                    service.set_language(rest).await;
                }
            }
            "show" => {
                let session = service.snapshot().await;
                println!("mode: {:?}  language: {}", session.mode, session.language);
                if let Some(error) = &session.last_error {
                    println!("last error: {error}");
                }
                for fragment in &session.transcript {
                    println!("  {fragment}");
                }
            }
            "quit" => break,
            other => eprintln!("unknown input: {other}"),
        }
    }

    service.shutdown().await;
    Ok(())
}

fn report<E: std::fmt::Display>(result: Result<(), E>) {
    if let Err(e) = result {
        eprintln!("{e}");
    }
}
