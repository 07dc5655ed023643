//! Event binding.
//!
//! Wires all UI event listeners. Async handlers are spawned via
//! `wasm_bindgen_futures::spawn_local`; they fetch the marketplace from
//! `state` on every call so nothing holds it past `stop()`.

use crate::dom::{self, Elements};
use crate::render;
use crate::state;
use ev_api_types::ListingDraft;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Helper: attach async click handler to an HtmlElement.
macro_rules! on_click_async {
    ($el:expr, $els:expr, $handler:expr) => {{
        let els = $els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let els2 = els.clone();
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&els2).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once after init.
pub fn bind_events(els: &Elements) -> Result<(), JsValue> {
    // ── Tabs ──
    for tab in &els.tabs {
        let tab_name = tab.get_attribute("data-tab").unwrap_or_default();
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            set_active_tab(&els2, &tab_name);
        }) as Box<dyn FnMut(_)>);
        tab.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    on_click_async!(els.connect_btn, els, on_connect);

    // ── Gallery: one delegated listener for every buy button ──
    {
        let cb = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
            let Some(id) = buy_target(&event) else {
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                if let Some(market) = state::market() {
                    market.buy(&id).await;
                }
            });
        }) as Box<dyn FnMut(_)>);
        els.gallery_grid
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    // ── Sell ──
    {
        let els2 = els.clone();
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            on_image_selected(&els2);
        }) as Box<dyn FnMut(_)>);
        els.listing_image
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    on_click_async!(els.enhance_btn, els, on_enhance);
    on_click_async!(els.submit_listing_btn, els, on_submit_listing);

    // ── Dashboard ──
    on_click_async!(els.save_seller_wallet_btn, els, on_save_seller_wallet);

    Ok(())
}

/// Switch active tab and panel.
pub fn set_active_tab(els: &Elements, tab_name: &str) {
    for tab in &els.tabs {
        dom::toggle_class(tab, "active", tab.get_attribute("data-tab").as_deref() == Some(tab_name));
    }
    for panel in &els.panels {
        let id = panel.id();
        dom::toggle_class(panel, "active", id == tab_name);
    }
}

fn buy_target(event: &web_sys::MouseEvent) -> Option<String> {
    let target = event.target()?.dyn_into::<web_sys::Element>().ok()?;
    let button = target.closest("[data-buy]").ok()??;
    button.get_attribute("data-buy")
}

async fn on_connect(_els: &Elements) {
    if let Some(market) = state::market() {
        // Failures are already surfaced as a notification.
        let _ = market.connect_wallet().await;
    }
}

fn on_image_selected(els: &Elements) {
    let Some(file) = els.listing_image.files().and_then(|files| files.get(0)) else {
        return;
    };
    let url = match web_sys::Url::create_object_url_with_blob(&file) {
        Ok(url) => url,
        Err(err) => {
            gloo_console::warn!("could not read selected image", err);
            return;
        }
    };
    els.listing_preview.set_src(&url);
    dom::remove_class(&els.listing_preview, "hidden");
    if let Some(previous) = state::set_draft_image_url(Some(url)) {
        let _ = web_sys::Url::revoke_object_url(&previous);
    }
}

fn read_draft(els: &Elements) -> ListingDraft {
    ListingDraft {
        name: dom::get_input_value(&els.listing_name),
        description: dom::get_textarea_value(&els.listing_description),
        price: dom::get_input_value(&els.listing_price),
        tags: dom::get_input_value(&els.listing_tags),
        image_url: state::draft_image_url(),
    }
}

fn reset_form(els: &Elements) {
    els.listing_name.set_value("");
    els.listing_description.set_value("");
    els.listing_price.set_value("");
    els.listing_tags.set_value("");
    els.listing_image.set_value("");
    els.listing_preview.set_src("");
    dom::add_class(&els.listing_preview, "hidden");
    // The listing now references the object URL, so it is not revoked.
    state::set_draft_image_url(None);
}

async fn on_enhance(els: &Elements) {
    let Some(market) = state::market() else {
        return;
    };
    if state::is_curating() {
        return;
    }

    state::set_curating(true);
    render::render_curating(els);

    let draft = read_draft(els);
    let curated = market.curate(&draft).await;
    els.listing_description.set_value(&curated.description);
    els.listing_price.set_value(&curated.price);

    state::set_curating(false);
    render::render_curating(els);
}

async fn on_submit_listing(els: &Elements) {
    let Some(market) = state::market() else {
        return;
    };
    if market.submit_listing(&read_draft(els)).is_ok() {
        reset_form(els);
        set_active_tab(els, "marketplace");
    }
}

async fn on_save_seller_wallet(els: &Elements) {
    let Some(market) = state::market() else {
        return;
    };
    if market
        .save_seller_wallet(&dom::get_input_value(&els.seller_wallet_input))
        .is_ok()
    {
        els.seller_wallet_input.set_value("");
    }
}
