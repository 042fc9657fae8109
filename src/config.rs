use std::collections::HashMap;
use thiserror::Error;

use crate::pricing::Network;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    /// JSONL file of decoded records to ingest at startup; optional, the
    /// query API can serve a previously-built database on its own.
    pub records_path: Option<String>,
    /// JSON contract-state fixture; omitted means every chain read reverts.
    pub chain_state_path: Option<String>,
    pub network: Network,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let records_path = env_map.get("RECORDS_PATH").cloned();
        let chain_state_path = env_map.get("CHAIN_STATE_PATH").cloned();

        let network_raw = env_map
            .get("NETWORK")
            .map(|s| s.as_str())
            .unwrap_or("mainnet");
        let network = Network::parse(network_raw).ok_or_else(|| {
            ConfigError::InvalidValue(
                "NETWORK".to_string(),
                format!(
                    "must be mainnet, fantom, or arbitrum-one, got {}",
                    network_raw
                ),
            )
        })?;

        Ok(Config {
            port,
            database_path,
            records_path,
            chain_state_path,
            network,
        })
    }
}
