//! Configuration structures for the conversion pipeline.

use serde::{Deserialize, Serialize};

use super::formatting::FormattingPreferences;

/// Main configuration for ink2text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// AI service configuration.
    pub service: ServiceConfig,

    /// Initial formatting preferences.
    pub formatting: FormattingPreferences,

    /// Document export configuration.
    pub export: ExportConfig,
}

/// AI vision service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the generative language API.
    pub endpoint: String,

    /// Model used for extraction.
    pub model: String,

    /// Request timeout in seconds (native builds only).
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Exported document and share configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Shop name printed in the page header band.
    pub shop_name: String,

    /// Title line printed under the header band.
    pub title: String,

    /// File name of the exported/shared document.
    pub file_name: String,

    /// Title passed to the native share sheet.
    pub share_title: String,

    /// Message passed to the native share sheet.
    pub share_text: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            shop_name: "KASHI MOBILE SHOP".to_string(),
            title: "Ink to Text Converter".to_string(),
            file_name: "converted-document.pdf".to_string(),
            share_title: "Converted Document".to_string(),
            share_text: "Here is your converted document.".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::formatting::FontFamily;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"service": {"model": "gemini-2.0-flash"}, "formatting": {"font_family": "serif"}}"#)
            .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.service.model, "gemini-2.0-flash");
        assert_eq!(config.service.timeout_secs, 60);
        assert_eq!(config.formatting.font_family, FontFamily::Serif);
        assert_eq!(config.export.shop_name, "KASHI MOBILE SHOP");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.export.title = "Rate Card".to_string();
        config.save(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded.export.title, "Rate Card");
    }

    #[test]
    fn test_invalid_json_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
