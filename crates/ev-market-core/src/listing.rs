use ev_api_types::{AssetListing, DEFAULT_LISTING_PRICE, ListingDraft};
use uuid::Uuid;

/// Price from the form, or [`DEFAULT_LISTING_PRICE`] when the text does not
/// start with a finite positive number. Trailing text such as a unit is ignored.
pub fn parse_price(raw: &str) -> f64 {
    leading_number(raw)
        .filter(|price| price.is_finite() && *price > 0.0)
        .unwrap_or(DEFAULT_LISTING_PRICE)
}

/// Longest decimal number at the start of `raw` after leading whitespace:
/// optional sign, digits with an optional fraction, optional exponent.
pub fn leading_number(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut at: usize| {
        while at < bytes.len() && bytes[at].is_ascii_digit() {
            at += 1;
        }
        at
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if mantissa || frac_end > end + 1 {
            mantissa = true;
            end = frac_end;
        }
    }
    if !mantissa {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

/// Comma-separated tags, trimmed, blanks dropped, order kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub fn new_listing_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn default_image_url(name: &str) -> String {
    format!("https://picsum.photos/seed/{}/800/1000", encode_path_segment(name))
}

fn encode_path_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Builds the listing a connected seller submits. `seller` always comes from
/// the session, never from the form.
pub fn build_listing(draft: &ListingDraft, seller: &str, created_at: u64, id: String) -> AssetListing {
    let name = draft.name.trim().to_owned();
    let image_url = draft
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| default_image_url(&name));

    AssetListing {
        id,
        description: draft.description.trim().to_owned(),
        image_url,
        price: parse_price(&draft.price),
        seller: seller.to_owned(),
        created_at,
        tags: parse_tags(&draft.tags),
        name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_trimmed_in_order() {
        assert_eq!(parse_tags("Tech, Blue, Minimal"), vec!["Tech", "Blue", "Minimal"]);
        assert_eq!(parse_tags(" a ,, b ,"), vec!["a", "b"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn unparseable_price_uses_default() {
        assert_eq!(parse_price("abc"), DEFAULT_LISTING_PRICE);
        assert_eq!(parse_price(""), DEFAULT_LISTING_PRICE);
        assert_eq!(parse_price("0"), DEFAULT_LISTING_PRICE);
        assert_eq!(parse_price("-3"), DEFAULT_LISTING_PRICE);
        assert_eq!(parse_price("NaN"), DEFAULT_LISTING_PRICE);
        assert_eq!(parse_price(" 249.5 "), 249.5);
    }

    #[test]
    fn price_reads_leading_number() {
        assert_eq!(parse_price("12 ETHO"), 12.0);
        assert_eq!(parse_price("  7.25ETHO"), 7.25);
        assert_eq!(parse_price(".5"), 0.5);
        assert_eq!(parse_price("3."), 3.0);
        assert_eq!(parse_price("1e3 tokens"), 1000.0);
        assert_eq!(parse_price("2e"), 2.0);
        assert_eq!(parse_price("ETHO 12"), DEFAULT_LISTING_PRICE);
        assert_eq!(parse_price("-5 ETHO"), DEFAULT_LISTING_PRICE);
        assert_eq!(parse_price("1e999"), DEFAULT_LISTING_PRICE);
    }

    #[test]
    fn leading_number_needs_a_digit() {
        assert_eq!(leading_number("+.e5"), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number("-0.5x"), Some(-0.5));
    }

    #[test]
    fn ids_are_distinct() {
        let a = new_listing_id();
        let b = new_listing_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn missing_image_gets_placeholder() {
        let draft = ListingDraft {
            name: "Neon Catalyst".to_owned(),
            description: " glow ".to_owned(),
            price: "500".to_owned(),
            tags: "Neon".to_owned(),
            image_url: Some("   ".to_owned()),
        };
        let listing = build_listing(&draft, "0xseller", 42, "id-1".to_owned());
        assert_eq!(listing.image_url, "https://picsum.photos/seed/Neon%20Catalyst/800/1000");
        assert_eq!(listing.description, "glow");
        assert_eq!(listing.seller, "0xseller");
        assert_eq!(listing.created_at, 42);
        assert_eq!(listing.price, 500.0);
    }

    #[test]
    fn provided_image_is_kept() {
        let draft = ListingDraft {
            name: "Blob".to_owned(),
            image_url: Some("blob:https://storefront/1234".to_owned()),
            ..ListingDraft::default()
        };
        let listing = build_listing(&draft, "0xseller", 0, "id".to_owned());
        assert_eq!(listing.image_url, "blob:https://storefront/1234");
        assert_eq!(listing.price, DEFAULT_LISTING_PRICE);
        assert!(listing.tags.is_empty());
    }
}
