//! End-to-end walkthroughs of the node's core scenarios, driven through
//! the real HTTP router and, for the peer catch-up scenario, the real
//! gossip service over an in-memory transport.

use crate::support::{genesis, signed_ingest_body, signed_ingest_body_integer_and_lowercase, Node};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use cw_bus::EventBus;
use cw_chain_store::{ChainStoreService, InMemoryKv as ChainMemKv};
use cw_crypto::Ed25519KeyPair;
use cw_equilibrium::{IntervalCell, RateCounters};
use cw_gossip::ports::InMemoryTransport;
use cw_gossip::{GossipConfig, GossipService, TipAnnouncement};
use cw_ingest_queue::{InMemoryKv as QueueMemKv, IngestQueueService};
use cw_types::Hash32;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn post_block(router: axum::Router, body: &Value) -> axum::response::Response {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/ingest/block")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// E1: a freshly-wired node already has a genesis block at height 0 before
/// any event is ever submitted.
#[tokio::test]
async fn e1_genesis_boots_without_any_submitted_event() {
    let node = Node::new(genesis());
    node.chain.ensure_genesis().unwrap();
    let tip = node.chain.tip().unwrap().unwrap();
    assert_eq!(tip.index, 0);
    assert_eq!(tip.block_hash, genesis().hash);
    assert_eq!(tip.previous_hash, Hash32::zero());
}

/// E2: a single well-formed submission is accepted over HTTP, then
/// committed by the next consensus tick at height 1, with its claimed
/// `block_index` ignored in favor of the tip-extension rule.
#[tokio::test]
async fn e2_single_submission_is_accepted_then_committed_at_height_one() {
    let node = Node::new(genesis());
    node.chain.ensure_genesis().unwrap();
    let kp = Ed25519KeyPair::from_seed([21u8; 32]);
    let body = signed_ingest_body(&kp, "e2-1", Hash32([0xAA; 32]), "miner-e2", 3.0);

    let response = post_block(node.router(), &body).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let ack = body_json(response).await;
    assert_eq!(ack["event_id"], "e2-1");

    let committed = node.tick();
    assert_eq!(committed, 1);
    let tip = node.chain.tip().unwrap().unwrap();
    assert_eq!(tip.index, 1);
    assert_eq!(tip.miner_address, "miner-e2");
    assert_eq!(tip.cumulative_work_score, 3.0);
}

/// A client is free to send `work_score`/`ts` as JSON integers and
/// `capacity` in any case `Capacity::from_str` accepts; both must still
/// commit, since the signature was verified over exactly those bytes at
/// ingest and must not be re-derived from a re-encoded struct at commit
/// time (spec section 4.4.1).
#[tokio::test]
async fn integer_work_score_and_lowercase_capacity_still_commit() {
    let node = Node::new(genesis());
    node.chain.ensure_genesis().unwrap();
    let kp = Ed25519KeyPair::from_seed([27u8; 32]);
    let body = signed_ingest_body_integer_and_lowercase(&kp, "e-int-1", Hash32([0x77; 32]), "miner-int", 5);

    let response = post_block(node.router(), &body).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let committed = node.tick();
    assert_eq!(committed, 1, "a validly-signed integer/lowercase payload must commit, not be rejected as BadSignature");
    let tip = node.chain.tip().unwrap().unwrap();
    assert_eq!(tip.index, 1);
    assert_eq!(tip.miner_address, "miner-int");
    assert_eq!(tip.cumulative_work_score, 5.0);
}

/// E3: re-submitting the same `event_id` is swallowed idempotently by the
/// queue and never commits a second block.
#[tokio::test]
async fn e3_duplicate_event_id_commits_at_most_once() {
    let node = Node::new(genesis());
    node.chain.ensure_genesis().unwrap();
    let kp = Ed25519KeyPair::from_seed([22u8; 32]);
    let body = signed_ingest_body(&kp, "e3-1", Hash32([0xBB; 32]), "miner-e3", 1.0);

    let first = post_block(node.router(), &body).await;
    assert_eq!(first.status(), StatusCode::ACCEPTED);
    let second = post_block(node.router(), &body).await;
    assert_eq!(second.status(), StatusCode::ACCEPTED, "a duplicate is idempotent 202, not an error");

    let committed = node.tick();
    assert_eq!(committed, 1);
    assert_eq!(node.chain.tip().unwrap().unwrap().index, 1);
}

/// E4: two events submitted around the same tip height both commit,
/// settling one after the other in arrival order rather than colliding.
#[tokio::test]
async fn e4_concurrent_height_race_settles_both_events_in_order() {
    let node = Node::new(genesis());
    node.chain.ensure_genesis().unwrap();
    let kp_a = Ed25519KeyPair::from_seed([23u8; 32]);
    let kp_b = Ed25519KeyPair::from_seed([24u8; 32]);
    let body_a = signed_ingest_body(&kp_a, "e4-a", Hash32([0xCC; 32]), "miner-a", 1.0);
    let body_b = signed_ingest_body(&kp_b, "e4-b", Hash32([0xDD; 32]), "miner-b", 1.0);

    assert_eq!(post_block(node.router(), &body_a).await.status(), StatusCode::ACCEPTED);
    assert_eq!(post_block(node.router(), &body_b).await.status(), StatusCode::ACCEPTED);

    let committed = node.tick();
    assert_eq!(committed, 2);
    let blocks = node.chain.range(0, 3).unwrap();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[1].previous_hash, blocks[0].block_hash);
    assert_eq!(blocks[2].previous_hash, blocks[1].block_hash);
}

/// E5: a node that has fallen behind catches up to a peer's tip entirely
/// through the gossip listen loop — no event is ever submitted to it
/// directly, and the caught-up blocks still go through the consensus
/// engine's own commit path (spec section 4.5's "never writes directly").
#[tokio::test]
async fn e5_peer_catch_up_closes_the_gap_via_gossip() {
    let ahead = Node::new(genesis());
    ahead.chain.ensure_genesis().unwrap();
    let kp = Ed25519KeyPair::from_seed([25u8; 32]);
    let body = signed_ingest_body(&kp, "e5-1", Hash32([0xEE; 32]), "miner-ahead", 2.0);
    let event = cw_validator::validate_event(&body).unwrap();
    ahead.queue.enqueue(event, body).unwrap();
    ahead.tick();
    assert_eq!(ahead.chain.tip().unwrap().unwrap().index, 1);

    let behind_chain = Arc::new(ChainStoreService::new(Arc::new(ChainMemKv::new()), genesis()));
    behind_chain.ensure_genesis().unwrap();
    let behind_queue = Arc::new(IngestQueueService::new(Arc::new(QueueMemKv::new())).unwrap());
    let behind_bus = Arc::new(EventBus::new());
    let behind_consensus =
        cw_consensus::ConsensusEngine::new(behind_chain.clone(), behind_queue.clone(), behind_bus, cw_consensus::ConsensusConfig::default());

    let transport = InMemoryTransport::new();
    let ahead_tip = ahead.chain.tip().unwrap().unwrap();
    transport.seed_peer(
        "ahead-node",
        TipAnnouncement {
            tip_index: ahead_tip.index,
            tip_hash: ahead_tip.block_hash,
            timestamp: ahead_tip.timestamp,
        },
        ahead.chain.range(0, 2).unwrap(),
    );

    let behind_gossip = GossipService::new(
        behind_chain.clone(),
        behind_queue.clone(),
        transport,
        Arc::new(EventBus::new()),
        Arc::new(RateCounters::new()),
        Arc::new(IntervalCell::new(10.0)),
        GossipConfig {
            bootstrap_peers: vec!["ahead-node".to_string()],
            ..GossipConfig::default()
        },
    );

    let fetched = behind_gossip.listen_once().await;
    assert_eq!(fetched, 1, "the listen loop should enqueue exactly the one block the peer is ahead by");

    let committed = behind_consensus.tick_once().unwrap();
    assert_eq!(committed, 1);
    assert_eq!(behind_chain.tip().unwrap().unwrap().block_hash, ahead_tip.block_hash);
}

/// E6: a tampered payload fails signature verification at the HTTP
/// boundary and never reaches the ingest queue at all.
#[tokio::test]
async fn e6_malformed_signature_is_rejected_before_the_queue() {
    let node = Node::new(genesis());
    node.chain.ensure_genesis().unwrap();
    let kp = Ed25519KeyPair::from_seed([26u8; 32]);
    let mut body = signed_ingest_body(&kp, "e6-1", Hash32([0xFF; 32]), "miner-e6", 1.0);
    body["work_score"] = serde_json::json!(999.0);

    let response = post_block(node.router(), &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err = body_json(response).await;
    assert_eq!(err["error"], "BadSignature");
    assert_eq!(node.queue.status_of("e6-1").unwrap(), None);
}
