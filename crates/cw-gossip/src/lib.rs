//! # Gossip Protocol
//!
//! Peer discovery, tip announcement, and catch-up fetch between nodes
//! (spec section 4.5). Three independent loops share one [`peer_table`]:
//! broadcast pushes this node's tip outward, listen pulls peers' tips and
//! closes any gap, and cleanup evicts peers that have gone stale. Every
//! peer-supplied block is re-validated by the Consensus Engine through the
//! Ingest Queue rather than appended directly.

pub mod config;
pub mod domain;
pub mod peer_table;
pub mod ports;
pub mod service;

pub use config::GossipConfig;
pub use domain::{GossipError, PeerRow, TipAnnouncement};
pub use peer_table::PeerTable;
pub use ports::GossipTransport;
pub use service::GossipService;
