//! Node entry point: load configuration, wire every subsystem via
//! [`cw_node::context`], spawn each as an independent task, and shut them
//! down in the order spec section 5 requires.

use anyhow::Context as _;
use cw_node::context::{self, NodeContext};
use cw_node::shutdown;
use tokio::sync::watch;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = cw_node::config::NodeConfig::from_env().context("failed to load node configuration")?;
    let _telemetry_guard = cw_telemetry::init_telemetry(&config.telemetry).context("failed to initialize telemetry")?;

    info!("starting computational-work node");
    let (ctx, equilibrium) = context::build(&config).context("failed to wire node subsystems")?;
    let listen_addr = ctx.http.listen_addr.clone();
    let body_limit = ctx.http.body_limit_bytes;

    let (http_shutdown_tx, http_shutdown_rx) = watch::channel(false);
    let (gossip_shutdown_tx, gossip_shutdown_rx) = watch::channel(false);
    let (consensus_shutdown_tx, consensus_shutdown_rx) = watch::channel(false);

    let consensus_handle = tokio::spawn(ctx.consensus.clone().run(consensus_shutdown_rx));

    let broadcast_handle = tokio::spawn(ctx.gossip.clone().run_broadcast(gossip_shutdown_rx.clone()));
    let listen_handle = tokio::spawn(ctx.gossip.clone().run_listen(gossip_shutdown_rx.clone()));
    let cleanup_handle = tokio::spawn(ctx.gossip.clone().run_cleanup(gossip_shutdown_rx.clone()));
    let equilibrium_handle = tokio::spawn(context::run_equilibrium(
        equilibrium,
        ctx.bus.clone(),
        gossip_shutdown_rx.clone(),
    ));

    let http_handle = spawn_http_server(&ctx, listen_addr, body_limit, http_shutdown_rx).await?;

    info!("node is running; press Ctrl+C to stop");
    shutdown::wait_for_signal().await;

    info!("stopping HTTP ingestion");
    let _ = http_shutdown_tx.send(true);
    let _ = http_handle.await;

    info!("stopping gossip and the equilibrium controller");
    let _ = gossip_shutdown_tx.send(true);
    let _ = tokio::join!(broadcast_handle, listen_handle, cleanup_handle, equilibrium_handle);

    info!("finishing the current consensus tick");
    let _ = consensus_shutdown_tx.send(true);
    let _ = consensus_handle.await;

    info!("closing chain store and ingest queue");
    drop(ctx);

    info!("node shutdown complete");
    Ok(())
}

async fn spawn_http_server(
    ctx: &NodeContext,
    listen_addr: String,
    body_limit: usize,
    mut shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let state = ctx.app_state();
    let router = cw_api::build_router_with_limit(state, body_limit);
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind HTTP surface on {listen_addr}"))?;
    info!(addr = %listen_addr, "HTTP surface listening");

    Ok(tokio::spawn(async move {
        let server = axum::serve(listener, router).with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        });
        if let Err(e) = server.await {
            tracing::error!(error = %e, "HTTP server exited with an error");
        }
    }))
}
