//! # cw-api
//!
//! The HTTP surface: block ingestion, chain reads, peer and reward
//! queries, health, and the gossip wire's announce endpoint. Depends only
//! on the inbound port traits in [`ports`]; production wiring (which
//! concrete adapters sit behind those traits) lives in the node binary.

pub mod config;
pub mod error;
pub mod handlers;
pub mod ports;
pub mod router;
pub mod state;


pub use config::HttpConfig;
pub use error::ApiError;
pub use ports::{ChainStoreReader, IngestQueueProducer, PeerSource};
pub use router::{build_router, build_router_with_limit};
pub use state::AppState;
