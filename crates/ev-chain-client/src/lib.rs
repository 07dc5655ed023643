//! Wallet-facing chain access for the storefront.
//!
//! All network traffic funnels through [`ChainClient`], which talks to an
//! EIP-1193 style [`WalletProvider`] supplied by the host (the injected
//! browser wallet, or a JSON-RPC endpoint for the native console).

pub mod config;
pub mod erc20;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod units;

use async_trait::async_trait;
use ev_api_types::WalletAddress;
use serde::Deserialize;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use config::{ChainConfig, NativeCurrency, NetworkDescriptor};

/// EIP-1193 code for a request the user declined.
pub const USER_REJECTED: i64 = 4001;
/// EIP-3326 code for a chain the wallet does not know yet.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

#[derive(Debug, Clone, Error, Deserialize, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("MetaMask not found")]
    ProviderUnavailable,
    #[error("wallet returned no accounts")]
    NoAccounts,
    #[error("Wallet not connected")]
    NotConnected,
    #[error("wrong network: {0}")]
    NetworkMismatch(String),
    #[error("transfer rejected: {0}")]
    TransferRejected(String),
    #[error("transfer failed: {0}")]
    TransferFailed(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The wallet boundary. Hosts are single-threaded, so futures need not be `Send`.
#[async_trait(?Send)]
pub trait WalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Suspends the caller between receipt polls.
    async fn delay(&self, millis: u32);
}

#[async_trait(?Send)]
impl<T: WalletProvider + ?Sized> WalletProvider for Rc<T> {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        (**self).request(method, params).await
    }

    async fn delay(&self, millis: u32) {
        (**self).delay(millis).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
}

/// Owns the single wallet connection for the lifetime of the application.
///
/// The provider is `None` when the host has no wallet. The bound signer is
/// set only by [`ChainClient::connect`] and cleared by [`ChainClient::disconnect`].
pub struct ChainClient<P> {
    provider: Option<P>,
    config: ChainConfig,
    signer: RefCell<Option<WalletAddress>>,
}

impl<P: WalletProvider> ChainClient<P> {
    pub fn new(provider: Option<P>, config: ChainConfig) -> Self {
        Self {
            provider,
            config,
            signer: RefCell::new(None),
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn signer(&self) -> Option<WalletAddress> {
        self.signer.borrow().clone()
    }

    pub fn disconnect(&self) {
        self.signer.borrow_mut().take();
    }

    fn provider(&self) -> Result<&P, ChainError> {
        self.provider.as_ref().ok_or(ChainError::ProviderUnavailable)
    }

    /// Requests account access, makes sure the wallet is on the configured
    /// network and binds the first account as signer.
    pub async fn connect(&self) -> Result<WalletAddress, ChainError> {
        let provider = self.provider()?;

        let accounts = provider.request("eth_requestAccounts", json!([])).await?;
        let accounts: Vec<String> = serde_json::from_value(accounts)
            .map_err(|err| ChainError::InvalidResponse(format!("eth_requestAccounts: {err}")))?;
        let account = accounts.into_iter().next().ok_or(ChainError::NoAccounts)?;
        let account = WalletAddress(account);

        self.ensure_network(provider).await?;
        *self.signer.borrow_mut() = Some(account.clone());

        info!(account = %account, chain = %self.config.chain_id, "wallet connected");
        Ok(account)
    }

    async fn ensure_network(&self, provider: &P) -> Result<(), ChainError> {
        let current = provider.request("eth_chainId", json!([])).await?;
        let current = current.as_str().unwrap_or_default();
        let wanted = config::parse_quantity(&self.config.chain_id);
        if wanted.is_some() && config::parse_quantity(current) == wanted {
            return Ok(());
        }

        debug!(current, wanted = %self.config.chain_id, "switching wallet network");
        match self.switch_network(provider).await {
            Ok(()) => Ok(()),
            Err(err) if err.code == UNRECOGNIZED_CHAIN => {
                info!(chain = %self.config.chain_id, "network unknown to wallet, adding it");
                provider
                    .request("wallet_addEthereumChain", self.config.add_chain_params())
                    .await
                    .map_err(|err| ChainError::NetworkMismatch(err.message))?;
                self.switch_network(provider)
                    .await
                    .map_err(|err| ChainError::NetworkMismatch(err.message))
            }
            Err(err) => Err(ChainError::NetworkMismatch(err.message)),
        }
    }

    async fn switch_network(&self, provider: &P) -> Result<(), ProviderError> {
        provider
            .request(
                "wallet_switchEthereumChain",
                json!([{ "chainId": self.config.chain_id }]),
            )
            .await
            .map(|_| ())
    }

    /// Token balance of `address` as a human-scaled decimal string.
    /// Returns `"0"` when the host has no wallet.
    pub async fn get_balance(&self, address: &WalletAddress) -> Result<String, ChainError> {
        let Some(provider) = self.provider.as_ref() else {
            return Ok("0".to_owned());
        };

        let owner = erc20::parse_address(address.as_str())?;
        let raw = self.call_token(provider, erc20::balance_of(&owner)).await?;
        let balance = erc20::decode_uint(&raw)?;
        let decimals = self.token_decimals(provider).await?;

        units::format_units(balance, decimals)
    }

    /// Transfers `amount` tokens from the bound signer to `recipient` and
    /// waits for the transaction to be mined.
    pub async fn purchase_image(&self, amount: f64, recipient: &WalletAddress) -> Result<TransferReceipt, ChainError> {
        let tx_hash = self.submit_transfer(amount, recipient).await?;
        self.confirm_transfer(tx_hash).await
    }

    /// Submits the token transfer and returns its hash without waiting.
    pub async fn submit_transfer(&self, amount: f64, recipient: &WalletAddress) -> Result<String, ChainError> {
        let from = self.signer().ok_or(ChainError::NotConnected)?;
        let provider = self.provider()?;

        if !amount.is_finite() || amount < 0.0 {
            return Err(ChainError::InvalidAmount(amount.to_string()));
        }

        let to = erc20::parse_address(recipient.as_str())?;
        let decimals = self.token_decimals(provider).await?;
        let value = units::parse_units(&amount.to_string(), decimals)?;

        let tx = json!([{
            "from": from.as_str(),
            "to": self.config.token_address,
            "data": erc20::transfer(&to, value),
        }]);

        let tx_hash = match provider.request("eth_sendTransaction", tx).await {
            Ok(hash) => hash
                .as_str()
                .map(ToOwned::to_owned)
                .ok_or_else(|| ChainError::InvalidResponse("eth_sendTransaction returned no hash".to_owned()))?,
            Err(err) if err.code == USER_REJECTED => return Err(ChainError::TransferRejected(err.message)),
            Err(err) => return Err(ChainError::TransferFailed(err.message)),
        };

        info!(%tx_hash, amount, recipient = %recipient, "token transfer submitted");
        Ok(tx_hash)
    }

    /// Polls for the receipt of a submitted transfer.
    pub async fn confirm_transfer(&self, tx_hash: String) -> Result<TransferReceipt, ChainError> {
        let provider = self.provider()?;
        self.wait_for_receipt(provider, tx_hash).await
    }

    async fn wait_for_receipt(&self, provider: &P, tx_hash: String) -> Result<TransferReceipt, ChainError> {
        for attempt in 0..self.config.receipt_poll_attempts {
            if attempt > 0 {
                provider.delay(self.config.receipt_poll_interval_ms).await;
            }

            let receipt = provider
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if receipt.is_null() {
                continue;
            }

            let block_number = receipt
                .get("blockNumber")
                .and_then(Value::as_str)
                .and_then(config::parse_quantity);

            return match receipt.get("status").and_then(Value::as_str) {
                Some(status) if config::parse_quantity(status) == Some(1) => {
                    info!(%tx_hash, ?block_number, "token transfer confirmed");
                    Ok(TransferReceipt { tx_hash, block_number })
                }
                status => {
                    warn!(%tx_hash, ?status, "token transfer reverted");
                    Err(ChainError::TransferFailed(format!("transaction {tx_hash} reverted")))
                }
            };
        }

        warn!(%tx_hash, "gave up waiting for receipt");
        Err(ChainError::TransferFailed(format!(
            "confirmation timed out for transaction {tx_hash}"
        )))
    }

    async fn token_decimals(&self, provider: &P) -> Result<u8, ChainError> {
        let raw = self.call_token(provider, erc20::decimals()).await?;
        let decimals = erc20::decode_uint(&raw)?;
        u8::try_from(decimals).map_err(|_| ChainError::InvalidResponse(format!("token decimals out of range: {decimals}")))
    }

    async fn call_token(&self, provider: &P, data: String) -> Result<String, ChainError> {
        let result = provider
            .request(
                "eth_call",
                json!([{ "to": self.config.token_address, "data": data }, "latest"]),
            )
            .await?;

        result
            .as_str()
            .map(ToOwned::to_owned)
            .ok_or_else(|| ChainError::InvalidResponse("eth_call returned a non-string result".to_owned()))
    }
}
