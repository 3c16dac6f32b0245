use std::sync::Arc;

use attendq::{config, http, queue, telemetry};

use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use config::EngineConfig;
use queue::QueueCoordinator;

const DEFAULT_HTTP_PORT: u16 = 8710;

/// Create a shutdown signal handler.
async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler, continuing without it");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler, continuing without it");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
    let _ = shutdown_tx.send(());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let config = EngineConfig::from_env();
    info!(
        starvation_minutes = config.starvation_threshold.num_minutes(),
        called_timeout_secs = config.called_timeout.map(|t| t.num_seconds()),
        "Engine configuration loaded"
    );

    let coordinator = QueueCoordinator::new(config);

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let shutdown_tx_signal = shutdown_tx.clone();
    tokio::spawn(async move {
        shutdown_signal(shutdown_tx_signal).await;
    });

    let http_port = std::env::var("ATTENDQ_HTTP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_HTTP_PORT);

    if http_port == 0 {
        error!(port = http_port, "Invalid HTTP port, must be 1-65535");
        std::process::exit(1);
    }

    let router = http::create_router(Arc::clone(&coordinator));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", http_port)).await?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = http_port,
        endpoint = %format!("http://0.0.0.0:{}", http_port),
        "attendq server ready"
    );

    let mut shutdown_rx = shutdown_tx.subscribe();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    coordinator.shutdown();
    info!("Shutdown complete");

    Ok(())
}
