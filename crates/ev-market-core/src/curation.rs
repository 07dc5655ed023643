//! Description and price suggestions from a generative-text service.
//!
//! Suggestions are advisory: anything empty, unparseable or failed leaves the
//! draft as the seller typed it (prices fall back to a fixed suggestion).

use anyhow::Result;
use async_trait::async_trait;
use ev_api_types::ListingDraft;
use tracing::warn;

use crate::listing::{leading_number, parse_tags};

/// Suggested price when the service answers with something that is not a number.
pub const DEFAULT_SUGGESTED_PRICE: f64 = 500.0;

#[async_trait(?Send)]
pub trait Curator {
    async fn enhance_description(&self, name: &str, description: &str) -> Result<String>;
    async fn suggest_price(&self, tags: &[String]) -> Result<String>;
}

pub fn description_prompt(name: &str, description: &str) -> String {
    format!(
        "As a professional art curator, enhance this image description to make it sound \
         high-tech and valuable for an NFT marketplace.\n\
         Title: {name}\n\
         Current Description: {description}\n\
         Keep the enhanced description concise and professional."
    )
}

pub fn price_prompt(tags: &[String]) -> String {
    format!(
        "Based on these art tags: {}, suggest a competitive starting price in ETHO \
         (a high-value Polygon altcoin).\n\
         Return ONLY a number representing the ETHO price.",
        tags.join(", ")
    )
}

pub fn enhanced_or_original(original: &str, enhanced: &str) -> String {
    let enhanced = enhanced.trim();
    if enhanced.is_empty() {
        original.to_owned()
    } else {
        enhanced.to_owned()
    }
}

/// Leading number of the reply, so "750 ETHO" reads as 750.
pub fn parse_suggested_price(raw: &str) -> f64 {
    leading_number(raw)
        .filter(|price| price.is_finite() && *price > 0.0)
        .unwrap_or(DEFAULT_SUGGESTED_PRICE)
}

/// Returns `draft` with the curator's description and price applied.
/// Needs both a name and a description; otherwise the draft is returned as is.
pub async fn curate_draft<C: Curator + ?Sized>(curator: &C, draft: &ListingDraft) -> ListingDraft {
    let mut curated = draft.clone();
    if draft.name.trim().is_empty() || draft.description.trim().is_empty() {
        return curated;
    }

    match curator.enhance_description(&draft.name, &draft.description).await {
        Ok(text) => curated.description = enhanced_or_original(&draft.description, &text),
        Err(err) => warn!("description enhancement failed: {err:#}"),
    }

    match curator.suggest_price(&parse_tags(&draft.tags)).await {
        Ok(text) => curated.price = parse_suggested_price(&text).to_string(),
        Err(err) => warn!("price suggestion failed: {err:#}"),
    }

    curated
}
