//! `localStorage`-backed settings store.

use ink2text_core::{Ink2TextError, KeyValueStore, Result};
use web_sys::Storage;

use crate::describe;

/// Browser `localStorage`.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// The window's `localStorage`, if the host exposes one.
    pub fn from_window() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| Ink2TextError::Settings(describe(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| Ink2TextError::Settings(describe(&e)))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| Ink2TextError::Settings(describe(&e)))
    }
}
