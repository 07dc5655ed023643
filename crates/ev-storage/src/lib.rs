use anyhow::Result;
use ev_api_types::{AssetListing, MarketplaceStats};
use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

#[cfg(feature = "rocksdb")]
mod rocks;
mod seed;

#[cfg(feature = "rocksdb")]
pub use rocks::RocksDbStore;
pub use seed::seed_listings;

/// Slot holding the serialized listing sequence.
pub const ASSETS_KEY: &str = "etho_vision_assets";
/// Slot holding the seller's payout address.
pub const SELLER_WALLET_KEY: &str = "etho_vision_seller_wallet";

/// Durable per-device key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("listing id already exists: {0}")]
    DuplicateId(String),
}

/// The canonical listing collection, newest first, mirrored to durable storage
/// after every mutation.
///
/// Write failures are logged and the in-memory state is kept: the storage
/// gives no durability acknowledgment to act on.
pub struct CatalogStore<S> {
    store: S,
    listings: Vec<AssetListing>,
}

impl<S: KeyValueStore> CatalogStore<S> {
    pub fn open(store: S, now_ms: u64) -> Self {
        let listings = Self::load(&store, now_ms);
        Self { store, listings }
    }

    /// The durable copy when present and readable, otherwise the seed set.
    pub fn load(store: &S, now_ms: u64) -> Vec<AssetListing> {
        let raw = match store.get(ASSETS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return seed_listings(now_ms),
            Err(err) => {
                warn!("failed to read catalog from storage: {err:#}");
                return seed_listings(now_ms);
            }
        };

        match serde_json::from_str::<Vec<AssetListing>>(&raw) {
            Ok(listings) => listings,
            Err(err) => {
                warn!("discarding unreadable catalog copy: {err}");
                seed_listings(now_ms)
            }
        }
    }

    pub fn listings(&self) -> &[AssetListing] {
        &self.listings
    }

    pub fn get(&self, id: &str) -> Option<&AssetListing> {
        self.listings.iter().find(|listing| listing.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn append(&mut self, listing: AssetListing) -> Result<(), CatalogError> {
        if self.contains_id(&listing.id) {
            return Err(CatalogError::DuplicateId(listing.id));
        }
        self.listings.insert(0, listing);
        self.persist();
        Ok(())
    }

    /// Drops the listing with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.listings.len();
        self.listings.retain(|listing| listing.id != id);
        let removed = self.listings.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn stats(&self) -> MarketplaceStats {
        let floor_price = self
            .listings
            .iter()
            .map(|listing| listing.price)
            .fold(None, |floor: Option<f64>, price| {
                Some(floor.map_or(price, |current| current.min(price)))
            });

        MarketplaceStats {
            items_listed: self.listings.len(),
            floor_price,
            total_value: self.listings.iter().map(|listing| listing.price).sum(),
        }
    }

    pub fn seller_wallet(&self) -> Option<String> {
        match self.store.get(SELLER_WALLET_KEY) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(err) => {
                warn!("failed to read seller wallet: {err:#}");
                None
            }
        }
    }

    pub fn set_seller_wallet(&self, wallet_address: &str) {
        if let Err(err) = self.store.set(SELLER_WALLET_KEY, wallet_address) {
            warn!("failed to persist seller wallet: {err:#}");
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.listings)
            .map_err(anyhow::Error::from)
            .and_then(|raw| self.store.set(ASSETS_KEY, &raw));
        if let Err(err) = result {
            warn!(listings = self.listings.len(), "failed to persist catalog: {err:#}");
        }
    }
}
