//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! Never hold a borrow while calling into the marketplace: its observer
//! re-enters here to render.

use crate::provider::{AccountsChangedListener, InjectedWallet};
use crate::storage::LocalStorageStore;
use ev_chain_client::ChainConfig;
use ev_market_core::Marketplace;
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::Rc;

pub type Market = Marketplace<InjectedWallet, LocalStorageStore>;

/// Contents of `config/storefront.json`; every field is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorefrontConfig {
    pub chain: ChainConfig,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
}

#[derive(Default)]
pub struct AppState {
    pub market: Option<Rc<Market>>,
    pub accounts_listener: Option<AccountsChangedListener>,
    /// Object URL of the image picked in the listing form.
    pub draft_image_url: Option<String>,
    pub is_curating: bool,
}

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

/// Run a closure with shared read access to the state.
pub fn with<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Run a closure with mutable access to the state.
pub fn with_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

pub fn market() -> Option<Rc<Market>> {
    with(|s| s.market.clone())
}

pub fn draft_image_url() -> Option<String> {
    with(|s| s.draft_image_url.clone())
}

/// Replaces the picked image, returning the previous object URL so the
/// caller can revoke it.
pub fn set_draft_image_url(url: Option<String>) -> Option<String> {
    with_mut(|s| std::mem::replace(&mut s.draft_image_url, url))
}

pub fn is_curating() -> bool {
    with(|s| s.is_curating)
}

pub fn set_curating(curating: bool) {
    with_mut(|s| s.is_curating = curating);
}
