//! # Chain Store
//!
//! The append-only log of committed blocks. Enforces the genesis anchor
//! and the previous-hash link on every write; never rewrites or deletes a
//! committed entry.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::ChainStoreError;
pub use ports::{BatchOperation, InMemoryKv, KeyValueStore};
pub use service::ChainStoreService;
