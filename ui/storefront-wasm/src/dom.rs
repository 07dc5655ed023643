//! DOM element bindings.
//!
//! All fields are resolved once at startup. To add new UI elements, add a
//! field here and bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement, HtmlTextAreaElement};

// ── Helpers ──

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

fn doc() -> Document {
    gloo_utils::document()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Ok(nl) = doc().query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nl.length())
        .filter_map(|i| nl.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn get_textarea_value(el: &HtmlTextAreaElement) -> String {
    el.value().trim().to_string()
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

/// Escapes text for interpolation into element content or quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

// ── Elements struct ──

/// All DOM element references used by the storefront.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Navigation
    pub tabs: Vec<Element>,
    pub panels: Vec<Element>,
    pub connect_btn: HtmlElement,

    // Marketplace
    pub gallery_grid: Element,
    pub stat_items: Element,
    pub stat_floor: Element,
    pub stat_total: Element,

    // Sell
    pub listing_name: HtmlInputElement,
    pub listing_description: HtmlTextAreaElement,
    pub listing_price: HtmlInputElement,
    pub listing_tags: HtmlInputElement,
    pub listing_image: HtmlInputElement,
    pub listing_preview: HtmlImageElement,
    pub enhance_btn: HtmlElement,
    pub submit_listing_btn: HtmlElement,

    // Dashboard
    pub dashboard_address: Element,
    pub dashboard_balance: Element,
    pub dashboard_network: Element,
    pub seller_wallet_input: HtmlInputElement,
    pub save_seller_wallet_btn: HtmlElement,

    pub notification: Element,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_textarea {
    ($id:expr) => {
        by_id_typed::<HtmlTextAreaElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing textarea #{}", $id)))?
    };
}

macro_rules! get_img {
    ($id:expr) => {
        by_id_typed::<HtmlImageElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing img #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            tabs: query_all(".tab"),
            panels: query_all(".panel"),
            connect_btn: get_html!("connectBtn"),

            gallery_grid: get_el!("galleryGrid"),
            stat_items: get_el!("statItems"),
            stat_floor: get_el!("statFloor"),
            stat_total: get_el!("statTotal"),

            listing_name: get_input!("listingName"),
            listing_description: get_textarea!("listingDescription"),
            listing_price: get_input!("listingPrice"),
            listing_tags: get_input!("listingTags"),
            listing_image: get_input!("listingImage"),
            listing_preview: get_img!("listingPreview"),
            enhance_btn: get_html!("enhanceBtn"),
            submit_listing_btn: get_html!("submitListingBtn"),

            dashboard_address: get_el!("dashboardAddress"),
            dashboard_balance: get_el!("dashboardBalance"),
            dashboard_network: get_el!("dashboardNetwork"),
            seller_wallet_input: get_input!("sellerWalletInput"),
            save_seller_wallet_btn: get_html!("saveSellerWalletBtn"),

            notification: get_el!("notification"),
        })
    }
}
