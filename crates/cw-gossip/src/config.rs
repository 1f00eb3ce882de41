//! Gossip protocol configuration (spec section 8).

use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct GossipConfig {
    pub bootstrap_peers: Vec<String>,
    pub max_peers: usize,
    pub fetch_window: u64,
    pub peer_cleanup_interval: Duration,
    pub peer_stale_ttl: Duration,
    pub peer_request_timeout: Duration,
    /// This node's own `host:port`, sent with every announcement so the
    /// receiving peer can address us back (spec section 4.5's wire reuse
    /// of the HTTP surface carries no other way to learn the caller's
    /// listen address).
    pub self_address: String,
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            bootstrap_peers: Vec::new(),
            max_peers: 64,
            fetch_window: 100,
            peer_cleanup_interval: Duration::from_secs(60),
            peer_stale_ttl: Duration::from_secs(300),
            peer_request_timeout: Duration::from_secs(5),
            self_address: String::new(),
        }
    }
}

impl GossipConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = env::var("BOOTSTRAP_PEERS") {
            config.bootstrap_peers = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Ok(v) = env::var("MAX_PEERS") {
            if let Ok(n) = v.parse() {
                config.max_peers = n;
            }
        }
        if let Ok(v) = env::var("FETCH_WINDOW") {
            if let Ok(n) = v.parse() {
                config.fetch_window = n;
            }
        }
        if let Ok(v) = env::var("PEER_CLEANUP_INTERVAL") {
            if let Ok(secs) = v.parse() {
                config.peer_cleanup_interval = Duration::from_secs_f64(secs);
            }
        }
        if let Ok(v) = env::var("PEER_STALE_TTL") {
            if let Ok(secs) = v.parse() {
                config.peer_stale_ttl = Duration::from_secs_f64(secs);
            }
        }
        if let Ok(v) = env::var("PEER_REQUEST_TIMEOUT") {
            if let Ok(secs) = v.parse() {
                config.peer_request_timeout = Duration::from_secs_f64(secs);
            }
        }
        if let Ok(v) = env::var("LISTEN_ADDR") {
            config.self_address = v;
        }
        config
    }
}
