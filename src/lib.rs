#![forbid(unsafe_code)]

mod adapters;
mod api;
mod app;
mod domain;
mod infrastructure;
mod ports;

use tokio::net::TcpListener;
use tracing::{error, info};

use app::AppController;

pub use domain::DomainError;

/// Start the service and serve until Ctrl-C.
pub async fn run() -> Result<(), DomainError> {
    let controller = AppController::new().await?;

    let server = &controller.config().server;
    let addr = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Listening");

    let served = axum::serve(listener, controller.router())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    controller.shutdown().await;
    served.map_err(|e| {
        error!(error = %e, "Server error");
        DomainError::Io(e.to_string())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
