//! Subcommands and the pieces they share.

pub mod config;
pub mod convert;
pub mod key;
pub mod output;
pub mod render;

use std::path::{Path, PathBuf};

use tracing::debug;

use ink2text_core::{AppConfig, FileStore, Settings};

/// Where configuration and the stored credential live.
pub struct ConfigDirs {
    root: PathBuf,
}

impl ConfigDirs {
    /// Use the given directory, or `<config_dir>/ink2text` by default.
    pub fn resolve(override_dir: Option<PathBuf>) -> Self {
        let root = override_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ink2text")
        });
        debug!("Using config directory {}", root.display());
        Self { root }
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    /// Load config.json, falling back to defaults when it does not exist.
    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        load_config_from(&self.config_path())
    }

    pub fn load_settings(&self) -> Settings {
        Settings::load(FileStore::new(self.settings_path()))
    }
}

pub fn load_config_from(path: &Path) -> anyhow::Result<AppConfig> {
    if path.exists() {
        AppConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))
    } else {
        Ok(AppConfig::default())
    }
}
