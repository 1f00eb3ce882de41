//! # Equilibrium Controller
//!
//! Tunes the gossip broadcast interval toward a critical-damping
//! equilibrium between outgoing announcements (`lambda`) and integrated
//! peer tips (`eta`), targeting `lambda == eta` so the broadcast/listen
//! ratio settles near 1.0.

pub mod config;
pub mod controller;
pub mod rate;

pub use config::EquilibriumConfig;
pub use controller::{EquilibriumController, LISTEN_DEPHASE_FACTOR};
pub use rate::{IntervalCell, RateCounters};
