//! ETHO Visiøn storefront, browser host.
//!
//! Hosts one [`ev_market_core::Marketplace`] backed by the injected wallet
//! and `localStorage`, and renders it into a static page. Each concern lives
//! in its own module.

pub mod api;
pub mod curator;
pub mod dom;
pub mod events;
pub mod provider;
pub mod render;
pub mod state;
pub mod storage;

use curator::{DEFAULT_GEMINI_MODEL, GeminiCurator};
use ev_chain_client::ChainClient;
use ev_market_core::Marketplace;
use provider::{AccountsChangedListener, InjectedWallet};
use std::rc::Rc;
use storage::LocalStorageStore;
use wasm_bindgen::prelude::*;

/// WASM entry point, called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let config = api::load_config().await;

    let wallet = InjectedWallet::detect();
    if wallet.is_none() {
        gloo_console::warn!("no injected wallet found; browsing only");
    }

    let chain = ChainClient::new(wallet.clone(), config.chain.clone());
    let mut market = Marketplace::new(chain, LocalStorageStore, || js_sys::Date::now() as u64);
    if let Some(api_key) = config.gemini_api_key.filter(|key| !key.trim().is_empty()) {
        let model = config
            .gemini_model
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        market = market.with_curator(GeminiCurator::new(api_key, model));
    }
    let market = Rc::new(market);
    market.set_observer(Rc::new(render::Renderer::new(els.clone())));

    let listener = wallet
        .as_ref()
        .map(|wallet| AccountsChangedListener::register(wallet, on_accounts_changed))
        .transpose()?;

    state::with_mut(|s| {
        s.market = Some(market);
        s.accounts_listener = listener;
    });

    events::bind_events(&els)?;
    render::render_all(&els);

    Ok(())
}

fn on_accounts_changed(accounts: Vec<String>) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Some(market) = state::market() {
            market.on_accounts_changed(accounts).await;
        }
    });
}

/// Tears the storefront down: unregisters the wallet listener and stops the
/// marketplace so results still in flight are dropped.
#[wasm_bindgen]
pub fn stop() {
    let (market, listener) = state::with_mut(|s| (s.market.take(), s.accounts_listener.take()));
    drop(listener);
    if let Some(market) = market {
        market.stop();
    }
}
