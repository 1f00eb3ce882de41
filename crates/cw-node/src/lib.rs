//! # cw-node
//!
//! The node binary's wiring layer: [`config::NodeConfig`] loads every
//! subsystem's configuration from the environment, and [`context::build`]
//! constructs the chain store, ingest queue, consensus engine, gossip
//! service, and equilibrium controller that `main` spawns as independent
//! tasks (spec section 5).

pub mod config;
pub mod context;
pub mod shutdown;
