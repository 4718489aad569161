// File: src/config.rs
// Purpose: Collector settings from the [segments] table of rhtmx.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::tree::{DEFAULT_SEGMENT_KEY, PAGE_SEGMENT_KEY};

/// Segment collection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Segment name marking a page leaf (default: "__PAGE__")
    #[serde(default = "default_page_segment_key")]
    pub page_segment_key: String,

    /// Segment name filling unmatched parallel slots (default: "__DEFAULT__")
    #[serde(default = "default_default_segment_key")]
    pub default_segment_key: String,
}

/// Shape of rhtmx.toml as far as segment collection is concerned
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    segments: CollectorConfig,
}

fn default_page_segment_key() -> String {
    PAGE_SEGMENT_KEY.to_string()
}

fn default_default_segment_key() -> String {
    DEFAULT_SEGMENT_KEY.to_string()
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            page_segment_key: default_page_segment_key(),
            default_segment_key: default_default_segment_key(),
        }
    }
}

impl CollectorConfig {
    /// Parse the `[segments]` table out of rhtmx.toml contents
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: ConfigFile = toml::from_str(content).context("Failed to parse [segments] config")?;
        Ok(file.segments)
    }

    /// Load settings from rhtmx.toml, falling back to defaults when absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./rhtmx.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rhtmx.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CollectorConfig::default();
        assert_eq!(config.page_segment_key, "__PAGE__");
        assert_eq!(config.default_segment_key, "__DEFAULT__");
    }

    #[test]
    fn test_parse_segments_table() {
        let config = CollectorConfig::from_toml_str(
            r#"
            [server]
            port = 3000

            [segments]
            page_segment_key = "$page"
            "#,
        )
        .unwrap();
        assert_eq!(config.page_segment_key, "$page");
        assert_eq!(config.default_segment_key, "__DEFAULT__");
    }

    #[test]
    fn test_missing_table_uses_defaults() {
        let config = CollectorConfig::from_toml_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config, CollectorConfig::default());
        assert_eq!(CollectorConfig::from_toml_str("   ").unwrap(), CollectorConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(CollectorConfig::from_toml_str("[segments\npage_segment_key = 1").is_err());
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let config = CollectorConfig::load("definitely/not/here/rhtmx.toml").unwrap();
        assert_eq!(config, CollectorConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("rhtmx-segments-{}.toml", std::process::id()));
        fs::write(&path, "[segments]\ndefault_segment_key = \"$default\"\n").unwrap();

        let config = CollectorConfig::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.default_segment_key, "$default");
    }
}
