use serde::{Deserialize, Serialize};

/// Price applied when the listing form's price does not parse to a finite positive number.
pub const DEFAULT_LISTING_PRICE: f64 = 100.0;

/// How long a notification stays visible before the host clears it.
pub const NOTIFICATION_TTL_MS: u32 = 5_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An image offered for sale.
///
/// Field names are camelCase on the wire so the durable copy in browser
/// storage stays readable by earlier builds of the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetListing {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub seller: String,
    pub created_at: u64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Raw values captured by the listing form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub tags: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceStats {
    pub items_listed: usize,
    pub floor_price: Option<f64>,
    pub total_value: f64,
}

/// The viewer's wallet session.
///
/// Fields are private so that a session without an address always carries a
/// zero balance and no network id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    address: Option<String>,
    balance: String,
    network_id: Option<String>,
    is_connecting: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::disconnected()
    }
}

impl SessionState {
    pub fn disconnected() -> Self {
        Self {
            address: None,
            balance: "0".to_owned(),
            network_id: None,
            is_connecting: false,
        }
    }

    pub fn connected(address: impl Into<String>, balance: impl Into<String>, network_id: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            balance: balance.into(),
            network_id: Some(network_id.into()),
            is_connecting: false,
        }
    }

    /// Marks a connect request as in flight; the rest of the session is kept.
    pub fn begin_connect(&self) -> Self {
        Self {
            is_connecting: true,
            ..self.clone()
        }
    }

    /// Connecting failed: the viewer is left fully disconnected.
    pub fn connect_failed(&self) -> Self {
        Self::disconnected()
    }

    /// Replaces the cached balance of a connected session. No-op when disconnected.
    pub fn with_balance(&self, balance: impl Into<String>) -> Self {
        if self.address.is_none() {
            return self.clone();
        }
        Self {
            balance: balance.into(),
            ..self.clone()
        }
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn balance(&self) -> &str {
        &self.balance
    }

    pub fn network_id(&self) -> Option<&str> {
        self.network_id.as_deref()
    }

    pub fn is_connecting(&self) -> bool {
        self.is_connecting
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// One-shot user feedback. `seq` identifies the emission so an expiring
/// timer only clears the message it was scheduled for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub seq: u64,
    pub message: String,
    pub kind: NotificationKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(session: &SessionState) {
        if session.address().is_none() {
            assert_eq!(session.balance(), "0");
            assert!(session.network_id().is_none());
        } else {
            assert!(session.network_id().is_some());
        }
    }

    #[test]
    fn session_transitions_keep_disconnect_invariant() {
        let start = SessionState::default();
        assert_consistent(&start);
        assert!(!start.is_connecting());

        let connecting = start.begin_connect();
        assert!(connecting.is_connecting());
        assert_consistent(&connecting);

        let failed = connecting.connect_failed();
        assert_eq!(failed, SessionState::disconnected());

        let connected = SessionState::connected("0xabc", "12.5", "137");
        assert_consistent(&connected);
        assert!(!connected.is_connecting());

        let refreshed = connected.with_balance("3.0");
        assert_eq!(refreshed.balance(), "3.0");
        assert_consistent(&refreshed);

        let untouched = SessionState::disconnected().with_balance("99");
        assert_eq!(untouched.balance(), "0");
    }

    #[test]
    fn listing_uses_camel_case_keys() {
        let listing = AssetListing {
            id: "1".to_owned(),
            name: "Cybernetic Horizon".to_owned(),
            description: "neon".to_owned(),
            image_url: "https://picsum.photos/seed/cyber/800/1000".to_owned(),
            price: 450.0,
            seller: "0x3A2...fE1".to_owned(),
            created_at: 1_700_000_000_000,
            tags: vec!["Cyberpunk".to_owned()],
        };

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["imageUrl"], "https://picsum.photos/seed/cyber/800/1000");
        assert_eq!(value["createdAt"], 1_700_000_000_000_u64);
        assert!(value.get("image_url").is_none());
    }
}
