//! Request handlers for every route in the HTTP surface (spec section 6.2).

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cw_chain_store::ChainStoreError;
use cw_types::{Block, Hash32, PeerTip};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;

#[derive(Serialize)]
struct Success<T: Serialize> {
    status: &'static str,
    data: T,
}

fn success<T: Serialize>(data: T) -> Json<Success<T>> {
    Json(Success { status: "success", data })
}

#[derive(Serialize)]
struct IngestAck {
    status: &'static str,
    event_id: String,
}

/// `POST /v1/ingest/block`. Validation happens here, before the event ever
/// reaches the queue: a malformed event never touches either durable store
/// (spec section 8, R3).
pub async fn ingest_block(
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<IngestAck>), ApiError> {
    let event = cw_validator::validate_event(&raw)?;
    let event_id = event.event_id.clone();
    // Both Accepted and Duplicate land on the same idempotent 202 (spec
    // section 7: DuplicateEvent recovery is "202 idempotent; prior state
    // returned"), so the outcome itself does not change the response shape.
    // `raw` (not `event` re-encoded) is what consensus re-validates
    // against, so the submitter's exact signed bytes survive the hand-off.
    state.queue.enqueue(event, raw)?;
    Ok((StatusCode::ACCEPTED, Json(IngestAck { status: "accepted", event_id })))
}

/// `GET /v1/data/block/latest`.
pub async fn get_latest_block(State(state): State<AppState>) -> Result<Json<Success<Block>>, ApiError> {
    match state.chain.tip()? {
        Some(block) => Ok(success(block)),
        None => Err(ChainStoreError::NotFound { index: 0 }.into()),
    }
}

/// `GET /v1/data/block/{index}`.
pub async fn get_block_by_index(
    State(state): State<AppState>,
    Path(index): Path<u64>,
) -> Result<Json<Success<Block>>, ApiError> {
    match state.chain.get_by_index(index)? {
        Some(block) => Ok(success(block)),
        None => Err(ChainStoreError::NotFound { index }.into()),
    }
}

#[derive(Deserialize)]
pub struct ListParams {
    limit: Option<usize>,
}

/// `GET /v1/data/blocks/all?limit=N`: the newest `limit` committed blocks,
/// oldest-first, ending at the current tip.
pub async fn list_blocks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Success<Vec<Block>>>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(state.default_list_limit)
        .clamp(1, state.max_list_limit);

    let blocks = match state.chain.tip()? {
        Some(tip) => {
            let start = tip.index.saturating_sub(limit.saturating_sub(1) as u64);
            state.chain.range(start, limit)?
        }
        None => Vec::new(),
    };
    Ok(success(blocks))
}

#[derive(Serialize)]
struct PeersBody {
    peers: Vec<PeerTip>,
    total_peers: usize,
}

/// `GET /v1/peers`.
pub async fn list_peers(State(state): State<AppState>) -> Json<Success<PeersBody>> {
    let peers = state.peers.peer_snapshot();
    let total_peers = state.peers.peer_count();
    success(PeersBody { peers, total_peers })
}

#[derive(Serialize)]
struct RewardsBody {
    total_rewards: f64,
    blocks_mined: u64,
}

/// `GET /v1/rewards/{address}`: a derived view over the Chain Store, not a
/// separate ledger (spec section 6.2's ambient note).
pub async fn rewards(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Success<RewardsBody>>, ApiError> {
    let blocks = match state.chain.tip()? {
        Some(tip) => state.chain.range(0, tip.index as usize + 1)?,
        None => Vec::new(),
    };

    let mut total_rewards = 0.0;
    let mut blocks_mined = 0u64;
    for block in &blocks {
        if block.miner_address == address {
            total_rewards += block.work_score;
            blocks_mined += 1;
        }
    }
    Ok(success(RewardsBody { total_rewards, blocks_mined }))
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    latest_block_height: u64,
}

/// `GET /health`.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthBody>, ApiError> {
    let latest_block_height = state.chain.tip()?.map(|b| b.index).unwrap_or(0);
    let status = if state.halted.load(Ordering::SeqCst) { "unhealthy" } else { "healthy" };
    Ok(Json(HealthBody { status, latest_block_height }))
}

#[derive(Deserialize)]
pub struct AnnounceBody {
    tip_index: u64,
    tip_hash: String,
    #[allow(dead_code)]
    timestamp: f64,
    peer_address: String,
}

#[derive(Serialize)]
struct AnnounceAck {
    status: &'static str,
}

/// `POST /v1/gossip/announce`: the one addition the gossip wire needs
/// beyond the existing read endpoints (spec section 4.5, DESIGN.md's
/// gossip-wire decision).
pub async fn gossip_announce(
    State(state): State<AppState>,
    Json(body): Json<AnnounceBody>,
) -> Result<Json<AnnounceAck>, ApiError> {
    let tip_hash = Hash32::from_hex(&body.tip_hash)
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "BadHex", "tip_hash is not valid hex"))?;
    state.peers.record_announcement(&body.peer_address, body.tip_index, tip_hash);
    Ok(Json(AnnounceAck { status: "success" }))
}
