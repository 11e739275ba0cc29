//! Live viewer for an Evolvit simulation.

mod animator;
mod client;
mod display;
mod poller;
mod telemetry;

use anyhow::Result;
use evolvit_core::{DisplayMode, ViewerConfig};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const DEFAULT_TERMINAL_LOG: &str = "evolvit-viewer.log";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ViewerConfig::from_env()?;

    // Initialize telemetry; the terminal canvas owns stdout and stderr
    let log_target = match (config.display, config.log_file.as_deref()) {
        (_, Some(path)) => telemetry::LogTarget::File(path),
        (DisplayMode::Terminal, None) => telemetry::LogTarget::File(DEFAULT_TERMINAL_LOG),
        (DisplayMode::Headless, None) => telemetry::LogTarget::Stderr,
    };
    telemetry::init_telemetry(config.otel_endpoint.as_deref(), log_target)?;

    info!("Starting Evolvit viewer");
    info!("Server URL: {}", config.server_url);

    let source = client::SimulationClient::new(config.clone())?;
    let mut animator = animator::Animator::new(source, config.render.clone(), &config.scheduler);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    let outcome = match config.display {
        DisplayMode::Headless => {
            let mut sink = display::HeadlessSink::default();
            animator.run(&mut sink, cancel).await
        }
        DisplayMode::Terminal => {
            let mut sink = display::TerminalDisplay::new()?;
            let keys = display::spawn_key_listener(cancel.clone());
            let outcome = animator.run(&mut sink, cancel.clone()).await;
            cancel.cancel();
            let _ = keys.await;
            outcome
        }
    };

    if let Err(e) = &outcome {
        error!("Viewer stopped: {}", e);
    }
    info!(
        cycles = animator.scheduler().cycles(),
        failed_fetches = animator.poller().consecutive_failures(),
        "Viewer finished"
    );

    info!("Shutting down viewer");

    // Shutdown telemetry
    telemetry::shutdown_telemetry();

    outcome
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
