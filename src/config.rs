//! Configuration file parser for ~/.config/appshelf/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are ignored by serde, though we log a warning when the file
//! contains potential typos.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::catalog::{SortBy, DEFAULT_CATEGORIES, DEFAULT_ICON};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid value for '{key}': {message}")]
    Invalid { key: &'static str, message: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Categories offered when adding or editing an app.
    pub categories: Vec<String>,

    /// Listing order when `--sort` is not given: favorite, createdAt or name.
    pub default_sort: SortBy,

    /// Install the starter catalog when no stored catalog exists.
    pub seed_on_first_run: bool,

    /// Icon used for new apps that don't specify one.
    pub default_icon: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            default_sort: SortBy::default(),
            seed_on_first_run: true,
            default_icon: DEFAULT_ICON.to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 4] = [
        "categories",
        "default_sort",
        "seed_on_first_run",
        "default_icon",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown `default_sort` → `Err(ConfigError::Parse)`
    /// - Empty `categories` → `Err(ConfigError::Invalid)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        config.check()?;
        tracing::info!(
            path = %path.display(),
            categories = config.categories.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.categories.iter().all(|c| c.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                key: "categories",
                message: "at least one non-empty category is required".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
