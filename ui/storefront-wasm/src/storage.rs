//! `localStorage` backend for the catalog.
//!
//! Values are stored raw (no extra JSON quoting) so the slots stay readable by
//! earlier builds of the storefront.

use anyhow::{Result, anyhow};
use ev_storage::KeyValueStore;
use gloo_storage::{LocalStorage, Storage};

#[derive(Clone, Copy, Default)]
pub struct LocalStorageStore;

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|err| anyhow!("localStorage read of {key} failed: {err:?}"))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| anyhow!("localStorage write of {key} failed: {err:?}"))
    }
}
