use serde::{Deserialize, Serialize};

pub const ETHO_TOKEN_ADDRESS: &str = "0x62e6387436e02118c708f7Bef980d7960cBa336c";
pub const PLATFORM_WALLET_ADDRESS: &str = "0x1A077De405DfD0e0F4fAf447b4a8129c3fE9A3D0";
pub const POLYGON_CHAIN_ID: &str = "0x89";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Network descriptor sent with `wallet_addEthereumChain`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl Default for NetworkDescriptor {
    fn default() -> Self {
        Self {
            chain_name: "Polygon Mainnet".to_owned(),
            native_currency: NativeCurrency {
                name: "MATIC".to_owned(),
                symbol: "MATIC".to_owned(),
                decimals: 18,
            },
            rpc_urls: vec!["https://polygon-rpc.com/".to_owned()],
            block_explorer_urls: vec!["https://polygonscan.com/".to_owned()],
        }
    }
}

/// Chain, token and payment settings for the storefront.
///
/// Every field has a default so hosts can deserialize a partial override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChainConfig {
    /// Hex chain id, `0x`-prefixed, as used by `wallet_switchEthereumChain`.
    pub chain_id: String,
    pub token_address: String,
    pub token_symbol: String,
    /// Recipient of every purchase transfer.
    pub platform_address: String,
    pub network: NetworkDescriptor,
    pub receipt_poll_interval_ms: u32,
    pub receipt_poll_attempts: u32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: POLYGON_CHAIN_ID.to_owned(),
            token_address: ETHO_TOKEN_ADDRESS.to_owned(),
            token_symbol: "ETHO".to_owned(),
            platform_address: PLATFORM_WALLET_ADDRESS.to_owned(),
            network: NetworkDescriptor::default(),
            receipt_poll_interval_ms: 1_500,
            receipt_poll_attempts: 120,
        }
    }
}

impl ChainConfig {
    /// Decimal form of the chain id (`0x89` → `137`), used as the session's network id.
    pub fn network_id(&self) -> String {
        parse_quantity(&self.chain_id)
            .map(|id| id.to_string())
            .unwrap_or_else(|| self.chain_id.clone())
    }

    pub fn add_chain_params(&self) -> serde_json::Value {
        serde_json::json!([{
            "chainId": self.chain_id,
            "chainName": self.network.chain_name,
            "nativeCurrency": {
                "name": self.network.native_currency.name,
                "symbol": self.network.native_currency.symbol,
                "decimals": self.network.native_currency.decimals,
            },
            "rpcUrls": self.network.rpc_urls,
            "blockExplorerUrls": self.network.block_explorer_urls,
        }])
    }
}

/// Parses a JSON-RPC quantity (`0x`-prefixed hex) or a plain decimal string.
pub fn parse_quantity(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}
