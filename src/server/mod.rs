//! HTTP front end: `GET /check?url=...` and `GET /healthcheck`.

pub mod handlers;
pub mod types;

// Standard library
use std::net::SocketAddr;

// 3rd party crates
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tracing::{error, info};

pub use types::{AppState, CheckQuery, AUTH_TOKEN_HEADER};

/// REST API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/check", get(handlers::check))
        .route("/healthcheck", get(handlers::healthcheck))
        .with_state(state)
}

/// Serves the router until Ctrl+C.
pub async fn serve(address: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener: TcpListener = TcpListener::bind(address).await?;
    info!("Server listening on: http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, initiating graceful shutdown...");
}
