//! Consensus engine configuration.

use std::env;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusConfig {
    /// Seconds between drain cycles (spec section 4.4.1).
    pub tick_secs: f64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self { tick_secs: 10.0 }
    }
}

impl ConsensusConfig {
    /// Overlay `CONSENSUS_TICK` onto the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = env::var("CONSENSUS_TICK") {
            if let Ok(secs) = v.parse() {
                config.tick_secs = secs;
            }
        }
        config
    }
}
