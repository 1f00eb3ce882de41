//! Durability and boundary checks that a pure in-memory harness can't
//! exercise: a real RocksDB-backed chain store surviving a process
//! restart, the validator's hex-shape rules, and the HTTP surface never
//! letting a malformed event reach either durable store.

use crate::support::{genesis, signed_ingest_body, Node};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use cw_chain_store::adapters::rocksdb::{self, RocksDbConfig};
use cw_chain_store::ChainStoreService;
use cw_crypto::Ed25519KeyPair;
use cw_types::Hash32;
use tower::ServiceExt;

/// R1: a chain store reopened against the same RocksDB directory sees the
/// same tip and the same committed blocks it had before closing — the
/// append-only log is genuinely durable, not just an in-memory illusion.
#[test]
fn r1_chain_store_survives_a_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let anchor = genesis();

    {
        let kv = rocksdb::open_shared(RocksDbConfig::for_testing(dir.path().to_string_lossy())).unwrap();
        let chain = ChainStoreService::new(kv, anchor.clone());
        chain.ensure_genesis().unwrap();
        let mut block = anchor.block();
        block.index = 1;
        block.block_hash = Hash32([0x42; 32]);
        block.previous_hash = anchor.hash;
        block.miner_address = "miner-r1".to_string();
        block.work_score = 5.0;
        block.cumulative_work_score = 5.0;
        chain.append(block).unwrap();
    }

    let reopened_kv = rocksdb::open_shared(RocksDbConfig::for_testing(dir.path().to_string_lossy())).unwrap();
    let reopened = ChainStoreService::new(reopened_kv, anchor);
    let tip = reopened.tip().unwrap().unwrap();
    assert_eq!(tip.index, 1);
    assert_eq!(tip.miner_address, "miner-r1");
    assert_eq!(reopened.get_by_index(0).unwrap().unwrap().index, 0);
}

/// R2: the validator rejects hex fields of the wrong length or alphabet
/// before ever reaching signature verification.
#[test]
fn r2_validator_rejects_malformed_hex_fields() {
    let kp = Ed25519KeyPair::from_seed([30u8; 32]);
    let mut body = signed_ingest_body(&kp, "r2-1", Hash32([0x77; 32]), "miner-r2", 1.0);
    body["block_hash"] = serde_json::json!("not-hex");
    let err = cw_validator::validate_event(&body).unwrap_err();
    assert_eq!(err, cw_validator::ValidationError::BadHex { field: "block_hash" });
}

/// R3: a structurally malformed ingest request (missing a required field)
/// is rejected at the HTTP boundary and never touches the ingest queue,
/// so a later tick has nothing spurious to commit.
#[tokio::test]
async fn r3_malformed_http_event_never_reaches_the_queue() {
    let node = Node::new(genesis());
    node.chain.ensure_genesis().unwrap();
    let kp = Ed25519KeyPair::from_seed([31u8; 32]);
    let mut body = signed_ingest_body(&kp, "r3-1", Hash32([0x88; 32]), "miner-r3", 1.0);
    body.as_object_mut().unwrap().remove("miner_address");

    let response = node
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/ingest/block")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(node.queue.status_of("r3-1").unwrap(), None);
    assert_eq!(node.tick(), 0);
    assert_eq!(node.chain.tip().unwrap().unwrap().index, 0);
}
