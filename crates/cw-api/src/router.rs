//! Route table and middleware stack (spec section 6).

use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ingest/block", post(handlers::ingest_block))
        .route("/v1/data/block/latest", get(handlers::get_latest_block))
        .route("/v1/data/block/:index", get(handlers::get_block_by_index))
        .route("/v1/data/blocks/all", get(handlers::list_blocks))
        .route("/v1/peers", get(handlers::list_peers))
        .route("/v1/rewards/:address", get(handlers::rewards))
        .route("/v1/gossip/announce", post(handlers::gossip_announce))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Same router as [`build_router`] but with the configured request body
/// limit applied (kept separate since the limit is read from
/// [`crate::config::HttpConfig`], not [`AppState`]).
pub fn build_router_with_limit(state: AppState, body_limit_bytes: usize) -> Router {
    build_router(state).layer(DefaultBodyLimit::max(body_limit_bytes))
}
