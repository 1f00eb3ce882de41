//! Node-wide configuration: the genesis anchor plus every subsystem's
//! `from_env()` config, loaded once at startup (spec section 6.5).

use cw_types::{GenesisAnchor, Hash32, HexFieldError};
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GENESIS_HASH is required and must be 64 hex characters: {0}")]
    BadGenesisHash(HexFieldError),
}

/// Filesystem paths for the two durable stores (spec section 6.4).
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub chain_db_path: String,
    pub ingest_db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            chain_db_path: "./data/chain".to_string(),
            ingest_db_path: "./data/ingest".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = env::var("CHAIN_DB_PATH") {
            config.chain_db_path = v;
        }
        if let Ok(v) = env::var("INGEST_DB_PATH") {
            config.ingest_db_path = v;
        }
        config
    }
}

/// Every subsystem's configuration, assembled once in [`NodeConfig::from_env`]
/// and handed out to the pieces `context::NodeContext::start` wires up.
pub struct NodeConfig {
    pub genesis: GenesisAnchor,
    pub storage: StorageConfig,
    pub consensus: cw_consensus::ConsensusConfig,
    pub gossip: cw_gossip::GossipConfig,
    pub equilibrium: cw_equilibrium::EquilibriumConfig,
    pub http: cw_api::HttpConfig,
    pub telemetry: cw_telemetry::TelemetryConfig,
}

impl NodeConfig {
    /// Load every subsystem's configuration from the environment.
    ///
    /// `GENESIS_HASH` is the one required variable (spec section 6.5): a
    /// missing or malformed value is a `GenesisMismatch`, fatal at startup
    /// (spec section 7) rather than falling back to a default, since two
    /// nodes that silently disagreed on genesis would never converge.
    pub fn from_env() -> Result<Self, ConfigError> {
        let genesis_hash_hex = env::var("GENESIS_HASH").unwrap_or_default();
        let hash = Hash32::from_hex(&genesis_hash_hex).map_err(ConfigError::BadGenesisHash)?;
        let timestamp = env::var("GENESIS_TIMESTAMP")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            genesis: GenesisAnchor { hash, timestamp },
            storage: StorageConfig::from_env(),
            consensus: cw_consensus::ConsensusConfig::from_env(),
            gossip: cw_gossip::GossipConfig::from_env(),
            equilibrium: cw_equilibrium::EquilibriumConfig::from_env(),
            http: cw_api::HttpConfig::from_env(),
            telemetry: cw_telemetry::TelemetryConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn missing_genesis_hash_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("GENESIS_HASH");
        assert!(matches!(NodeConfig::from_env(), Err(ConfigError::BadGenesisHash(_))));
    }

    #[test]
    fn well_formed_genesis_hash_is_accepted() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("GENESIS_HASH", "11".repeat(32));
        let config = NodeConfig::from_env().unwrap();
        assert_eq!(config.genesis.hash, Hash32([0x11; 32]));
        env::remove_var("GENESIS_HASH");
    }
}
