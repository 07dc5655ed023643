//! Static resource loading.
//!
//! Wraps `fetch` for same-origin resources such as the optional
//! `config/storefront.json` override.

use crate::dom;
use crate::state::StorefrontConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

pub const CONFIG_URL: &str = "config/storefront.json";

/// Fetch a URL and return the body as a plain string.
pub async fn fetch_text(url: &str) -> Result<String, String> {
    let opts = RequestInit::new();
    opts.set_method("GET");

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| format!("{:?}", e))?;

    let window = dom::window();
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("fetch error: {:?}", e))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "not a Response".to_string())?;

    if !resp.ok() {
        return Err(format!("{} {}", resp.status(), resp.status_text()));
    }

    let text = JsFuture::from(resp.text().map_err(|e| format!("{:?}", e))?)
        .await
        .map_err(|e| format!("text error: {:?}", e))?;

    Ok(text.as_string().unwrap_or_default())
}

/// Load the storefront configuration. A missing or malformed file leaves
/// every setting at its default.
pub async fn load_config() -> StorefrontConfig {
    let text = match fetch_text(CONFIG_URL).await {
        Ok(text) => text,
        Err(err) => {
            gloo_console::log!(format!("no {CONFIG_URL} ({err}); using defaults"));
            return StorefrontConfig::default();
        }
    };

    serde_json::from_str(&text).unwrap_or_else(|err| {
        gloo_console::warn!(format!("ignoring malformed {CONFIG_URL}: {err}"));
        StorefrontConfig::default()
    })
}
