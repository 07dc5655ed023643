use anyhow::Result;
use rocksdb::{DB, Options};
use std::sync::Arc;

use crate::KeyValueStore;

/// Catalog slots kept in a local RocksDB database (native hosts).
pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    pub fn open_default(path: &str) -> Result<Self> {
        let mut options = Options::default();
        options.create_if_missing(true);
        let db = DB::open(&options, path)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn key_for_slot(slot: &str) -> String {
        format!("slot:{slot}")
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.db.get(Self::key_for_slot(key).as_bytes())?;
        match value {
            Some(raw) => Ok(Some(String::from_utf8(raw)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.put(Self::key_for_slot(key).as_bytes(), value.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ASSETS_KEY, CatalogStore};

    #[test]
    fn catalog_survives_reopen() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().to_string_lossy().to_string();

        let ids = {
            let mut catalog = CatalogStore::open(RocksDbStore::open_default(&path)?, 1_700_000_000_000);
            catalog.remove("3");
            catalog.listings().iter().map(|l| l.id.clone()).collect::<Vec<_>>()
        };

        let store = RocksDbStore::open_default(&path)?;
        assert!(store.get(ASSETS_KEY)?.is_some());
        let reopened = CatalogStore::open(store, 1_700_000_500_000);
        let reopened_ids: Vec<String> = reopened.listings().iter().map(|l| l.id.clone()).collect();
        assert_eq!(reopened_ids, ids);

        Ok(())
    }
}
