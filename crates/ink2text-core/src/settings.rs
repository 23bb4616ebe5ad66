//! Persisted service credential.
//!
//! The credential lives in a key-value store under [`CREDENTIAL_KEY`]. It is
//! read once when [`Settings`] is loaded and kept in memory; every edit is
//! written through to the store immediately.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Ink2TextError, Result};

/// Key under which the credential is persisted.
pub const CREDENTIAL_KEY: &str = "gemini_api_key";

/// String key-value persistence.
pub trait KeyValueStore {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// JSON object file, one entry per key.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| Ink2TextError::Settings(format!("{}: {e}", self.path.display())))
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| Ink2TextError::Settings(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Credential held in memory and written through to a store.
pub struct Settings {
    store: Box<dyn KeyValueStore>,
    credential: String,
}

impl Settings {
    /// Read the credential once from the store.
    ///
    /// An unreadable store is logged and treated as empty so that the
    /// application still starts.
    pub fn load(store: impl KeyValueStore + 'static) -> Self {
        let credential = match store.get(CREDENTIAL_KEY) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                warn!("Could not read stored credential: {}", e);
                String::new()
            }
        };
        debug!("Loaded settings (credential present: {})", !credential.trim().is_empty());

        Self {
            store: Box::new(store),
            credential,
        }
    }

    /// The stored credential, if it is not blank.
    pub fn credential(&self) -> Option<&str> {
        let key = self.credential.trim();
        (!key.is_empty()).then_some(key)
    }

    /// Replace the credential and persist it immediately.
    pub fn set_credential(&mut self, value: &str) -> Result<()> {
        self.credential = value.to_string();
        self.store.set(CREDENTIAL_KEY, value)
    }

    /// Forget the credential.
    pub fn clear_credential(&mut self) -> Result<()> {
        self.credential.clear();
        self.store.remove(CREDENTIAL_KEY)
    }

    /// Pick the credential for a call: a non-blank override wins over the
    /// stored value.
    pub fn resolve_credential<'a>(&'a self, override_key: Option<&'a str>) -> Result<&'a str> {
        override_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or_else(|| self.credential())
            .ok_or(Ink2TextError::MissingCredential)
    }
}

/// Mask all but the last four characters of a credential.
pub fn mask_credential(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_reads_stored_credential() {
        let mut store = MemoryStore::new();
        store.set(CREDENTIAL_KEY, "abc123").unwrap();

        let settings = Settings::load(store);
        assert_eq!(settings.credential(), Some("abc123"));
    }

    #[test]
    fn test_set_credential_persists_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::load(FileStore::new(&path));
        assert_eq!(settings.credential(), None);

        settings.set_credential("first").unwrap();
        settings.set_credential("second").unwrap();

        let reloaded = Settings::load(FileStore::new(&path));
        assert_eq!(reloaded.credential(), Some("second"));
    }

    #[test]
    fn test_clear_credential() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::load(FileStore::new(&path));
        settings.set_credential("key").unwrap();
        settings.clear_credential().unwrap();

        assert_eq!(settings.credential(), None);
        assert_eq!(Settings::load(FileStore::new(&path)).credential(), None);
    }

    #[test]
    fn test_blank_credential_is_absent() {
        let mut settings = Settings::load(MemoryStore::new());
        settings.set_credential("   ").unwrap();
        assert_eq!(settings.credential(), None);
        assert!(matches!(
            settings.resolve_credential(None),
            Err(Ink2TextError::MissingCredential)
        ));
    }

    #[test]
    fn test_override_wins() {
        let mut settings = Settings::load(MemoryStore::new());
        settings.set_credential("stored").unwrap();

        assert_eq!(settings.resolve_credential(Some("override")).unwrap(), "override");
        assert_eq!(settings.resolve_credential(Some("")).unwrap(), "stored");
        assert_eq!(settings.resolve_credential(None).unwrap(), "stored");
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let settings = Settings::load(FileStore::new(&path));
        assert_eq!(settings.credential(), None);
    }

    #[test]
    fn test_mask_credential() {
        assert_eq!(mask_credential("AIzaSyABCDEFGH"), "**********EFGH");
        assert_eq!(mask_credential("abc"), "***");
    }
}
