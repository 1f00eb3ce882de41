//! # Consensus Engine
//!
//! The single writer to the chain store (spec section 4.4): drains the
//! ingest queue on a fixed tick, re-validates each candidate against the
//! current tip, rebinds its height (eta-damping, section 4.4.2), and
//! appends it. A fatal chain-store error halts the engine rather than risk
//! violating the append-only invariants.

pub mod config;
pub mod engine;
pub mod error;

pub use config::ConsensusConfig;
pub use engine::ConsensusEngine;
pub use error::ConsensusError;
