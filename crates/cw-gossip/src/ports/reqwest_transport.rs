//! Production [`GossipTransport`]: peers are plain HTTP endpoints speaking
//! the same wire format as this node's own HTTP surface (spec section 6).
//!
//! There is no dedicated gossip wire contract in the public endpoint table;
//! tip exchange rides `GET /v1/data/block/latest` and `GET
//! /v1/data/block/{index}` (already required for catch-up anyway), and the
//! one addition this subsystem needs — receiving an unsolicited
//! announcement — is `POST /v1/gossip/announce`.

use crate::domain::{GossipError, TipAnnouncement};
use crate::ports::outbound::GossipTransport;
use async_trait::async_trait;
use cw_types::Block;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Deserialize)]
struct Envelope<T> {
    #[allow(dead_code)]
    status: String,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Serialize)]
struct AnnouncementBody {
    tip_index: u64,
    tip_hash: String,
    timestamp: f64,
    peer_address: String,
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    self_address: String,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, self_address: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client configuration is static and always valid");
        Self { client, self_address: self_address.into() }
    }

    fn malformed(peer: &str, detail: impl Into<String>) -> GossipError {
        GossipError::PeerMalformed { peer: peer.to_string(), detail: detail.into() }
    }

    fn unreachable(peer: &str, detail: impl std::fmt::Display) -> GossipError {
        GossipError::PeerUnreachable { peer: peer.to_string(), detail: detail.to_string() }
    }
}

#[async_trait]
impl GossipTransport for ReqwestTransport {
    async fn announce(&self, peer_address: &str, announcement: TipAnnouncement) -> Result<(), GossipError> {
        let url = format!("http://{peer_address}/v1/gossip/announce");
        let body = AnnouncementBody {
            tip_index: announcement.tip_index,
            tip_hash: announcement.tip_hash.to_hex(),
            timestamp: announcement.timestamp,
            peer_address: self.self_address.clone(),
        };
        self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::unreachable(peer_address, e))?;
        Ok(())
    }

    async fn fetch_tip(&self, peer_address: &str) -> Result<TipAnnouncement, GossipError> {
        let url = format!("http://{peer_address}/v1/data/block/latest");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::unreachable(peer_address, e))?;
        let envelope: Envelope<Block> = response
            .json()
            .await
            .map_err(|e| Self::malformed(peer_address, e.to_string()))?;
        let tip = envelope
            .data
            .ok_or_else(|| Self::malformed(peer_address, "missing tip block"))?;
        Ok(TipAnnouncement {
            tip_index: tip.index,
            tip_hash: tip.block_hash,
            timestamp: tip.timestamp,
        })
    }

    async fn fetch_block(&self, peer_address: &str, index: u64) -> Result<Option<Block>, GossipError> {
        let url = format!("http://{peer_address}/v1/data/block/{index}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::unreachable(peer_address, e))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let envelope: Envelope<Block> = response
            .json()
            .await
            .map_err(|e| Self::malformed(peer_address, e.to_string()))?;
        Ok(envelope.data)
    }
}
