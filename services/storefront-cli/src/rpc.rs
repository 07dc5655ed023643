use async_trait::async_trait;
use ev_chain_client::{ProviderError, USER_REJECTED, WalletProvider};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::cell::Cell;
use std::time::Duration;
use tracing::{debug, warn};

/// JSON-RPC "internal error", used for transport and decoding failures.
const INTERNAL_ERROR: i64 = -32603;

/// Wallet provider backed by a node's JSON-RPC endpoint.
///
/// The node must manage the signing account (a dev node or a signer proxy).
pub struct RpcWallet {
    endpoint: String,
    http: reqwest::Client,
    next_id: Cell<u64>,
}

impl RpcWallet {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            next_id: Cell::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        debug!(id, method, "json-rpc request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| ProviderError::new(INTERNAL_ERROR, format!("{method} transport: {err}")))?;

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::new(INTERNAL_ERROR, format!("{method} response: {err}")))?;

        body.into_result()
    }
}

#[async_trait(?Send)]
impl WalletProvider for RpcWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        if method != "eth_requestAccounts" {
            return self.call(method, params).await;
        }

        // Plain nodes expose their managed accounts through eth_accounts only.
        match self.call(method, params).await {
            Err(err) if err.code != USER_REJECTED => {
                warn!("eth_requestAccounts unavailable ({err}); falling back to eth_accounts");
                self.call("eth_accounts", json!([])).await
            }
            other => other,
        }
    }

    async fn delay(&self, millis: u32) {
        tokio::time::sleep(Duration::from_millis(u64::from(millis))).await;
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ProviderError>,
}

impl RpcResponse {
    fn into_result(self) -> Result<Value, ProviderError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_member_becomes_provider_error() {
        let body: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"Method not found","data":null}}"#,
        )
        .unwrap();
        let err = body.into_result().unwrap_err();
        assert_eq!(err.code, -32601);
        assert_eq!(err.message, "Method not found");
    }

    #[test]
    fn null_result_is_kept() {
        let body: RpcResponse = serde_json::from_str(r#"{"jsonrpc":"2.0","id":7,"result":null}"#).unwrap();
        assert_eq!(body.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn request_shape() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 3,
            method: "eth_chainId",
            params: json!([]),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "jsonrpc": "2.0", "id": 3, "method": "eth_chainId", "params": [] })
        );
    }

    #[test]
    fn endpoint_is_normalised() {
        let wallet = RpcWallet::new("http://localhost:8545/");
        assert_eq!(wallet.endpoint(), "http://localhost:8545");
    }
}
