//! Scripted in-process wallet for tests.

use alloy_primitives::{U256, hex};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::cell::RefCell;

use crate::{ProviderError, UNRECOGNIZED_CHAIN, USER_REJECTED, WalletProvider, erc20};

#[derive(Debug, Default)]
struct MockState {
    accounts: Vec<String>,
    chain_id: String,
    known_chains: Vec<String>,
    balance: U256,
    decimals: u8,
    pending_polls: u32,
    reject_accounts: bool,
    reject_switch: bool,
    reject_transfer: bool,
    revert_transfer: bool,
    delays: u32,
    calls: Vec<(String, Value)>,
}

/// Behaves like an injected wallet holding an 18-decimal token.
#[derive(Debug, Default)]
pub struct MockWallet {
    state: RefCell<MockState>,
}

impl MockWallet {
    pub fn new(accounts: Vec<String>, chain_id: &str) -> Self {
        Self {
            state: RefCell::new(MockState {
                accounts,
                chain_id: chain_id.to_owned(),
                known_chains: vec![chain_id.to_owned()],
                decimals: 18,
                ..MockState::default()
            }),
        }
    }

    pub fn know_chain(&self, chain_id: &str) {
        self.state.borrow_mut().known_chains.push(chain_id.to_owned());
    }

    /// Balance in base units, as a decimal string.
    pub fn set_balance(&self, base_units: &str) {
        self.state.borrow_mut().balance = U256::from_str_radix(base_units, 10).unwrap_or_default();
    }

    pub fn set_accounts(&self, accounts: Vec<String>) {
        self.state.borrow_mut().accounts = accounts;
    }

    /// Number of receipt polls that report the transaction as still pending.
    pub fn set_pending_polls(&self, polls: u32) {
        self.state.borrow_mut().pending_polls = polls;
    }

    pub fn reject_accounts(&self) {
        self.state.borrow_mut().reject_accounts = true;
    }

    pub fn reject_switch(&self) {
        self.state.borrow_mut().reject_switch = true;
    }

    pub fn reject_transfer(&self) {
        self.state.borrow_mut().reject_transfer = true;
    }

    pub fn revert_transfer(&self) {
        self.state.borrow_mut().revert_transfer = true;
    }

    pub fn chain_id(&self) -> String {
        self.state.borrow().chain_id.clone()
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.state.borrow().calls.iter().filter(|(m, _)| m == method).count()
    }

    pub fn delays(&self) -> u32 {
        self.state.borrow().delays
    }

    fn word(value: U256) -> Value {
        Value::String(format!("0x{}", hex::encode(value.to_be_bytes::<32>())))
    }
}

#[async_trait(?Send)]
impl WalletProvider for MockWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let mut state = self.state.borrow_mut();
        state.calls.push((method.to_owned(), params.clone()));

        match method {
            "eth_requestAccounts" => {
                if state.reject_accounts {
                    return Err(ProviderError::new(USER_REJECTED, "User rejected the request."));
                }
                Ok(json!(state.accounts))
            }
            "eth_chainId" => Ok(json!(state.chain_id)),
            "wallet_switchEthereumChain" => {
                if state.reject_switch {
                    return Err(ProviderError::new(USER_REJECTED, "User rejected the request."));
                }
                let target = params[0]["chainId"].as_str().unwrap_or_default().to_owned();
                if !state.known_chains.contains(&target) {
                    return Err(ProviderError::new(
                        UNRECOGNIZED_CHAIN,
                        format!("Unrecognized chain ID \"{target}\"."),
                    ));
                }
                state.chain_id = target;
                Ok(Value::Null)
            }
            "wallet_addEthereumChain" => {
                let target = params[0]["chainId"].as_str().unwrap_or_default().to_owned();
                state.known_chains.push(target);
                Ok(Value::Null)
            }
            "eth_call" => {
                let data = params[0]["data"].as_str().unwrap_or_default();
                let selector = data.trim_start_matches("0x").get(..8).unwrap_or_default();
                match selector {
                    erc20::BALANCE_OF_SELECTOR => Ok(Self::word(state.balance)),
                    erc20::DECIMALS_SELECTOR => Ok(Self::word(U256::from(state.decimals))),
                    _ => Err(ProviderError::new(-32000, "execution reverted")),
                }
            }
            "eth_sendTransaction" => {
                if state.reject_transfer {
                    return Err(ProviderError::new(
                        USER_REJECTED,
                        "MetaMask Tx Signature: User denied transaction signature.",
                    ));
                }
                Ok(json!("0x5eed000000000000000000000000000000000000000000000000000000000001"))
            }
            "eth_getTransactionReceipt" => {
                if state.pending_polls > 0 {
                    state.pending_polls -= 1;
                    return Ok(Value::Null);
                }
                let status = if state.revert_transfer { "0x0" } else { "0x1" };
                Ok(json!({
                    "transactionHash": params[0],
                    "blockNumber": "0x1",
                    "status": status,
                }))
            }
            other => Err(ProviderError::new(-32601, format!("method {other} not supported"))),
        }
    }

    async fn delay(&self, _millis: u32) {
        self.state.borrow_mut().delays += 1;
    }
}
