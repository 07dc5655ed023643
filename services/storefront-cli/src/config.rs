use anyhow::{Context, Result};
use ev_chain_client::ChainConfig;
use serde::Deserialize;
use std::fs;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_DB_PATH: &str = ".storefront-db";

/// Settings for the console host, read from the environment:
///
/// - `STOREFRONT_RPC_URL`: JSON-RPC endpoint of the node
/// - `STOREFRONT_DB_PATH`: RocksDB directory for the catalog
/// - `STOREFRONT_CONFIG`: optional path to the same `storefront.json` the
///   browser host loads; only its `chain` section is used here
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub rpc_url: String,
    pub db_path: String,
    pub chain: ChainConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    chain: ChainConfig,
}

impl CliConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let chain = match lookup("STOREFRONT_CONFIG").filter(|path| !path.trim().is_empty()) {
            Some(path) => {
                let raw = fs::read_to_string(&path).with_context(|| format!("failed to read config file: {path}"))?;
                let file: ConfigFile =
                    serde_json::from_str(&raw).with_context(|| format!("failed to parse config file: {path}"))?;
                file.chain
            }
            None => ChainConfig::default(),
        };

        Ok(Self {
            rpc_url: lookup("STOREFRONT_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
            db_path: lookup("STOREFRONT_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            chain,
        })
    }
}
