//! Graceful shutdown signal and the stop order spec section 5 requires:
//! HTTP ingestion stops first (stop accepting new events), then gossip
//! (stop broadcasting and listening), then consensus (finish its current
//! tick), then the durable stores flush and close as their `Arc`s drop.

use tracing::info;

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM — whichever arrives
/// first. Mirrors the dual-signal pattern common to axum's own graceful
/// shutdown examples, since this node's HTTP surface is itself axum.
pub async fn wait_for_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, starting graceful shutdown"),
        _ = terminate => info!("received SIGTERM, starting graceful shutdown"),
    }
}
