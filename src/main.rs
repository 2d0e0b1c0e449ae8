use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ishaara::camera::SimulatedCamera;
use ishaara::config::IshaaraConfig;
use ishaara::detector::RandomDetector;
use ishaara::kernel::event::{Command, Event};
use ishaara::kernel::state::SessionState;
use ishaara::services::llm::GeminiAssembler;
use ishaara::{Controller, Reactor};

const HELP: &str = "Commands: camera | on | off | start | stop | toggle | clear | flip | dismiss | quit";

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = IshaaraConfig::load(config_path.as_deref()).context("loading configuration")?;
    tracing::info!("Ishaara booting with {} signs in vocabulary", config.vocabulary().len());

    let controller = Controller::new(
        config.controller_config(),
        config.vocabulary(),
        Box::new(RandomDetector::new(config.vocabulary())),
        Box::new(SimulatedCamera::default()),
    );
    let assembler = GeminiAssembler::from_config(&config);

    let (tx, rx) = mpsc::channel(100);
    let mut reactor = Reactor::new(rx, tx.clone(), controller, assembler);
    let shutdown = CancellationToken::new();

    let mut view = reactor.subscribe();
    tokio::spawn(async move {
        let mut last = SessionState::new();
        while view.changed().await.is_ok() {
            let state = view.borrow_and_update().clone();
            render(&last, &state);
            last = state;
        }
    });

    let input_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{}", HELP);

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("quit") {
                break;
            }
            match Command::parse(line) {
                Some(cmd) => {
                    tracing::debug!("Console command dispatched: {:?}", cmd);
                    if let Err(e) = tx.send(Event::Command(cmd)).await {
                        tracing::error!("Failed to send command: {}", e);
                        break;
                    }
                }
                None => println!("{}", HELP),
            }
        }
        input_shutdown.cancel();
    });

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_shutdown.cancel();
        }
    });

    reactor.run(shutdown).await;

    let snap = reactor.controller.telemetry.snapshot();
    tracing::info!(
        "Session summary: {} detections, {} local, {} remote ok, {} remote failed, {} stale",
        snap.detection_stats.accepted,
        snap.assembly_stats.short_circuits,
        snap.assembly_stats.succeeded,
        snap.assembly_stats.failed,
        snap.assembly_stats.stale_discarded,
    );
    Ok(())
}

fn render(prev: &SessionState, next: &SessionState) {
    if prev.phase != next.phase {
        println!("[SESSION] {:?}", next.phase);
    }
    if prev.facing != next.facing {
        println!("[CAMERA] facing {:?}", next.facing);
    }
    if prev.words() != next.words() {
        println!("[SIGNS] {}", next.pending_sentence());
    }
    if prev.translation != next.translation && !next.translation.is_empty() {
        println!("[TRANSLATION] {}", next.translation);
    }
    if prev.error != next.error {
        if let Some(err) = &next.error {
            println!("[ERROR] {}", err);
        }
    }
}
