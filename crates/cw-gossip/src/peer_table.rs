//! The bounded peer table: an arena of [`PeerRow`] plus an address index,
//! so health-score state is addressed by peer address and never by a
//! back-pointer (spec section 9's redesign guidance).

use crate::domain::PeerRow;
use cw_types::{Hash32, PeerTip};
use std::collections::HashMap;

const BASE_BACKOFF_SECS: f64 = 2.0;
const MAX_BACKOFF_SECS: f64 = 300.0;
const FAILURE_HEALTH_DECAY: f64 = 0.5;

pub struct PeerTable {
    rows: Vec<PeerRow>,
    index: HashMap<String, usize>,
    cap: usize,
}

impl PeerTable {
    pub fn new(cap: usize) -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
            cap,
        }
    }

    pub fn seed_bootstrap(&mut self, addrs: &[String], now: f64) {
        for addr in addrs {
            self.ensure_row(addr, now);
        }
    }

    fn ensure_row(&mut self, peer_address: &str, now: f64) -> usize {
        if let Some(&i) = self.index.get(peer_address) {
            return i;
        }
        let i = self.rows.len();
        self.rows.push(PeerRow::new(peer_address.to_string(), now));
        self.index.insert(peer_address.to_string(), i);
        i
    }

    /// Record a freshly-received tip announcement, creating the peer row
    /// on first contact (spec section 4.3's PeerTip lifecycle, section 9).
    pub fn upsert_tip(&mut self, peer_address: &str, tip_index: u64, tip_hash: Hash32, now: f64, rtt: f64) {
        let i = self.ensure_row(peer_address, now);
        let row = &mut self.rows[i];
        row.tip.tip_index = tip_index;
        row.tip.tip_hash = tip_hash;
        row.tip.last_seen = now;
        row.tip.rtt_estimate = rtt;
    }

    pub fn record_success(&mut self, peer_address: &str, now: f64) {
        if let Some(&i) = self.index.get(peer_address) {
            let row = &mut self.rows[i];
            row.health_score = 1.0;
            row.consecutive_failures = 0;
            row.backoff_until = None;
            row.tip.last_seen = now;
        }
    }

    pub fn record_failure(&mut self, peer_address: &str, now: f64) {
        if let Some(&i) = self.index.get(peer_address) {
            let row = &mut self.rows[i];
            row.health_score *= FAILURE_HEALTH_DECAY;
            row.consecutive_failures += 1;
            let backoff = (BASE_BACKOFF_SECS * 2f64.powi(row.consecutive_failures as i32 - 1))
                .min(MAX_BACKOFF_SECS);
            row.backoff_until = Some(now + backoff);
        }
    }

    pub fn mark_supplied_block(&mut self, peer_address: &str) {
        if let Some(&i) = self.index.get(peer_address) {
            self.rows[i].supplied_block = true;
        }
    }

    /// Peers not currently suspended by backoff, in table order.
    pub fn healthy_peers(&self, now: f64) -> Vec<PeerTip> {
        self.rows
            .iter()
            .filter(|row| !row.is_suspended(now))
            .map(|row| row.tip.clone())
            .collect()
    }

    /// Evict rows whose `last_seen` has exceeded `stale_ttl_secs`.
    pub fn evict_stale(&mut self, now: f64, stale_ttl_secs: f64) {
        self.rows.retain(|row| now - row.tip.last_seen <= stale_ttl_secs);
        self.reindex();
    }

    /// Trim back to `cap`, keeping peers that have supplied at least one
    /// accepted block over pure announcers, then most-recently-seen
    /// (spec section 4.5's "most-recent-useful" cleanup policy).
    pub fn prune_to_cap(&mut self) {
        if self.rows.len() <= self.cap {
            return;
        }
        self.rows.sort_by(|a, b| {
            b.supplied_block
                .cmp(&a.supplied_block)
                .then(b.tip.last_seen.partial_cmp(&a.tip.last_seen).unwrap())
        });
        self.rows.truncate(self.cap);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.tip.peer_address.clone(), i))
            .collect();
    }

    pub fn snapshot(&self) -> Vec<PeerTip> {
        self.rows.iter().map(|row| row.tip.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_tip_creates_a_row_on_first_contact() {
        let mut table = PeerTable::new(64);
        table.upsert_tip("peer-a", 5, Hash32([0xAA; 32]), 100.0, 10.0);
        assert_eq!(table.len(), 1);
        assert_eq!(table.snapshot()[0].tip_index, 5);
    }

    #[test]
    fn repeated_failures_suspend_a_peer_via_growing_backoff() {
        let mut table = PeerTable::new(64);
        table.upsert_tip("peer-a", 1, Hash32::zero(), 0.0, 1.0);
        table.record_failure("peer-a", 0.0);
        table.record_failure("peer-a", 0.0);
        assert!(table.healthy_peers(0.5).is_empty());
        assert!(!table.healthy_peers(1000.0).is_empty());
    }

    #[test]
    fn success_clears_backoff_and_restores_health() {
        let mut table = PeerTable::new(64);
        table.upsert_tip("peer-a", 1, Hash32::zero(), 0.0, 1.0);
        table.record_failure("peer-a", 0.0);
        table.record_success("peer-a", 1.0);
        assert_eq!(table.healthy_peers(1.0).len(), 1);
    }

    #[test]
    fn evict_stale_removes_peers_past_the_ttl() {
        let mut table = PeerTable::new(64);
        table.upsert_tip("peer-a", 1, Hash32::zero(), 0.0, 1.0);
        table.evict_stale(400.0, 300.0);
        assert!(table.is_empty());
    }

    #[test]
    fn prune_to_cap_favors_peers_that_supplied_blocks() {
        let mut table = PeerTable::new(1);
        table.upsert_tip("announcer-only", 1, Hash32::zero(), 0.0, 1.0);
        table.upsert_tip("supplier", 1, Hash32::zero(), 0.0, 1.0);
        table.mark_supplied_block("supplier");
        table.prune_to_cap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.snapshot()[0].peer_address, "supplier");
    }
}
