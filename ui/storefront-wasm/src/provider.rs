//! Injected browser wallet (`window.ethereum`).
//!
//! Requests go through the EIP-1193 `request` function; rejections are
//! mapped back to [`ProviderError`] using the `code`/`message` fields the
//! wallet attaches to the error object.

use async_trait::async_trait;
use ev_chain_client::{ProviderError, WalletProvider};
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use serde_json::{Value, json};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// JSON-RPC "internal error", used when the wallet throws something without a code.
const INTERNAL_ERROR: i64 = -32603;

#[derive(Clone)]
pub struct InjectedWallet {
    ethereum: JsValue,
}

impl InjectedWallet {
    /// The injected provider, if the page has one.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_undefined() || ethereum.is_null() {
            return None;
        }
        Some(Self { ethereum })
    }

    fn method(&self, name: &str) -> Result<Function, JsValue> {
        Reflect::get(&self.ethereum, &JsValue::from_str(name))?
            .dyn_into::<Function>()
            .map_err(|_| JsValue::from_str(&format!("ethereum.{name} is not a function")))
    }
}

#[async_trait(?Send)]
impl WalletProvider for InjectedWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let args = json!({ "method": method, "params": params })
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| ProviderError::new(INTERNAL_ERROR, err.to_string()))?;

        let promise = self
            .method("request")
            .and_then(|request| request.call1(&self.ethereum, &args))
            .and_then(|result| result.dyn_into::<Promise>())
            .map_err(provider_error)?;

        let result = JsFuture::from(promise).await.map_err(provider_error)?;
        if result.is_undefined() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result).map_err(|err| ProviderError::new(INTERNAL_ERROR, err.to_string()))
    }

    async fn delay(&self, millis: u32) {
        gloo_timers::future::TimeoutFuture::new(millis).await;
    }
}

fn provider_error(err: JsValue) -> ProviderError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64())
        .map(|code| code as i64)
        .unwrap_or(INTERNAL_ERROR);
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    ProviderError::new(code, message)
}

/// Registration of an `accountsChanged` handler. Dropping it unregisters
/// the handler from the wallet.
pub struct AccountsChangedListener {
    wallet: InjectedWallet,
    callback: Closure<dyn FnMut(JsValue)>,
}

impl AccountsChangedListener {
    pub fn register(wallet: &InjectedWallet, mut on_change: impl FnMut(Vec<String>) + 'static) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(move |accounts: JsValue| {
            let accounts: Vec<String> = serde_wasm_bindgen::from_value(accounts).unwrap_or_default();
            on_change(accounts);
        }) as Box<dyn FnMut(JsValue)>);

        wallet
            .method("on")?
            .call2(&wallet.ethereum, &JsValue::from_str("accountsChanged"), callback.as_ref())?;

        Ok(Self {
            wallet: wallet.clone(),
            callback,
        })
    }
}

impl Drop for AccountsChangedListener {
    fn drop(&mut self) {
        let removed = self.wallet.method("removeListener").and_then(|remove| {
            remove.call2(
                &self.wallet.ethereum,
                &JsValue::from_str("accountsChanged"),
                self.callback.as_ref(),
            )
        });
        if let Err(err) = removed {
            gloo_console::warn!("failed to remove accountsChanged listener", err);
        }
    }
}
