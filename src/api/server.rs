use std::net::SocketAddr;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tracing::info;

use super::services::{get_status, health, start_download};
use super::state::AppState;
use crate::config::Config;
use crate::job::JobController;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(address: SocketAddr, config: Config) -> Result<(), AnyError> {
    let controller = JobController::new(&config.fetch)
        .map_err(|e| format!("failed to initialize fetch client: {e}"))?;
    let state = AppState::new(config, controller);

    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "rangefetch API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Router shared by the server and the integration tests.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/download", post(start_download))
        .route("/status", get(get_status))
        .route("/health", get(health))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
