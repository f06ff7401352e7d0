pub mod api;
pub mod banner;
pub mod config;
pub mod error;
pub mod router;
pub mod services;
pub mod state;

use std::net::SocketAddr;

pub use config::Config;
pub use router::create_router;
pub use state::AppState;

pub async fn run_server(addr: SocketAddr, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config);
    let app = create_router(state.clone());

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down, cancelling outstanding task monitors");
    state.monitor.shutdown().await;
}
