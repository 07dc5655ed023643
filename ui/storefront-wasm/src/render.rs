//! Redraws the storefront from the marketplace state.
//!
//! Everything is re-rendered on each change; the catalog is small.

use crate::dom::{self, Elements};
use crate::state;
use ev_api_types::{AssetListing, NOTIFICATION_TTL_MS, Notification, NotificationKind, SessionState};
use ev_market_core::{MarketObserver, PurchasePhase};
use gloo_timers::callback::Timeout;

/// Observer registered with the marketplace.
pub struct Renderer {
    els: Elements,
}

impl Renderer {
    pub fn new(els: Elements) -> Self {
        Self { els }
    }
}

impl MarketObserver for Renderer {
    fn state_changed(&self) {
        render_all(&self.els);
    }

    fn notified(&self, notification: &Notification) {
        render_all(&self.els);
        schedule_clear(notification.seq);
    }
}

fn schedule_clear(seq: u64) {
    Timeout::new(NOTIFICATION_TTL_MS, move || {
        if let Some(market) = state::market() {
            market.clear_notification(seq);
        }
    })
    .forget();
}

pub fn render_all(els: &Elements) {
    let Some(market) = state::market() else {
        return;
    };

    let session = market.session();
    render_session(els, &session);

    let listings = market.listings();
    let cards: String = listings
        .iter()
        .map(|listing| card_html(listing, market.purchase_phase(&listing.id)))
        .collect();
    if listings.is_empty() {
        els.gallery_grid
            .set_inner_html(r#"<div class="asset-card asset-card--empty">No assets listed yet.</div>"#);
    } else {
        els.gallery_grid.set_inner_html(&cards);
    }

    let stats = market.stats();
    dom::set_text(&els.stat_items, &stats.items_listed.to_string());
    dom::set_text(
        &els.stat_floor,
        &stats
            .floor_price
            .map(|floor| format!("{floor} ETHO"))
            .unwrap_or_else(|| "-".to_string()),
    );
    dom::set_text(&els.stat_total, &format!("{} ETHO", stats.total_value));

    if let Some(saved) = market.seller_wallet() {
        els.seller_wallet_input.set_placeholder(&saved);
    }

    render_notification(els, market.notification().as_ref());
    render_curating(els);
}

fn render_session(els: &Elements, session: &SessionState) {
    let label = match session.address() {
        _ if session.is_connecting() => "Connecting...".to_string(),
        Some(address) => format!("{} | {} ETHO", shorten(address, 6, 4), session.balance()),
        None => "Connect MetaMask".to_string(),
    };
    dom::set_text(&els.connect_btn, &label);
    dom::toggle_class(&els.connect_btn, "connected", session.is_connected());
    dom::toggle_class(&els.connect_btn, "busy", session.is_connecting());

    dom::set_text(&els.dashboard_address, session.address().unwrap_or("Not connected"));
    dom::set_text(&els.dashboard_balance, &format!("{} ETHO", session.balance()));
    dom::set_text(&els.dashboard_network, session.network_id().unwrap_or("-"));
}

fn render_notification(els: &Elements, notification: Option<&Notification>) {
    let toast = &els.notification;
    match notification {
        Some(notification) => {
            dom::set_text(toast, &notification.message);
            dom::toggle_class(toast, "visible", true);
            dom::toggle_class(toast, "toast--error", notification.kind == NotificationKind::Error);
            dom::toggle_class(toast, "toast--success", notification.kind == NotificationKind::Success);
        }
        None => {
            dom::remove_class(toast, "visible");
            dom::set_text(toast, "");
        }
    }
}

pub fn render_curating(els: &Elements) {
    let curating = state::is_curating();
    let label = if curating {
        "Enhancing with AI..."
    } else {
        "Enhance with Gemini AI"
    };
    dom::set_text(&els.enhance_btn, label);
    dom::toggle_class(&els.enhance_btn, "busy", curating);

    let available = state::market().is_some_and(|market| market.has_curator());
    dom::toggle_class(&els.enhance_btn, "hidden", !available);
}

fn card_html(listing: &AssetListing, phase: PurchasePhase) -> String {
    let tags: String = listing
        .tags
        .iter()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, dom::escape_html(tag)))
        .collect();
    let busy = if phase == PurchasePhase::Idle { "" } else { " disabled" };

    format!(
        r#"<div class="asset-card">
  <div class="asset-media"><img src="{image}" alt="{name}" loading="lazy"><div class="asset-tags">{tags}</div></div>
  <div class="asset-body">
    <div class="asset-head"><h3>{name}</h3><span class="asset-price">{price} ETHO</span></div>
    <p class="asset-description">{description}</p>
    <div class="asset-foot">
      <span class="asset-seller">By {seller}...</span>
      <button class="buy-btn" data-buy="{id}"{busy}>{label}</button>
    </div>
  </div>
</div>"#,
        image = dom::escape_html(&listing.image_url),
        name = dom::escape_html(&listing.name),
        price = listing.price,
        description = dom::escape_html(&listing.description),
        seller = dom::escape_html(&prefix(&listing.seller, 10)),
        id = dom::escape_html(&listing.id),
        label = phase.label(),
    )
}

fn prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// `0x1234...abcd` style shortening for addresses.
pub fn shorten(s: &str, head: usize, tail: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= head + tail {
        return s.to_string();
    }
    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - tail..].iter().collect();
    format!("{start}...{end}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortens_addresses() {
        assert_eq!(
            shorten("0x1A077De405DfD0e0F4fAf447b4a8129c3fE9A3D0", 6, 4),
            "0x1A07...A3D0"
        );
        assert_eq!(shorten("0xabc", 6, 4), "0xabc");
    }

    #[test]
    fn card_escapes_user_text() {
        let listing = AssetListing {
            id: "abc".to_string(),
            name: "<b>Neon</b>".to_string(),
            description: "a & b".to_string(),
            image_url: "https://picsum.photos/seed/Neon/800/1000".to_string(),
            price: 450.0,
            seller: "0x71C7656EC7ab88b098defB751B7401B5f6d8976F".to_string(),
            created_at: 0,
            tags: vec!["Tech".to_string()],
        };
        let html = card_html(&listing, PurchasePhase::Idle);
        assert!(html.contains("&lt;b&gt;Neon&lt;/b&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("450 ETHO"));
        assert!(html.contains(r#"data-buy="abc">Buy Asset<"#));
        assert!(html.contains("By 0x71C7656E..."));

        let busy = card_html(&listing, PurchasePhase::Confirming);
        assert!(busy.contains(r#"data-buy="abc" disabled>Confirming...<"#));
    }
}
