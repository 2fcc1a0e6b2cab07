//! Application configuration
//!
//! Configuration loaded from `.gl-review.toml` or the user config file.

use anyhow::{Context, Result};
use gl_review_diff::{OldSidePolicy, DEFAULT_SCHEME};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Scheme of encoded review addresses (e.g. "gl-review" in
    /// `gl-review:src/main.rs?...`)
    #[serde(default = "default_address_scheme")]
    pub address_scheme: String,

    /// Which lines of an old-side document accept comments
    #[serde(default)]
    pub old_side_commenting: OldSidePolicy,

    /// Log filter used when RUST_LOG is not set (e.g. "info", "gl_review_diff=debug")
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_address_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            address_scheme: default_address_scheme(),
            old_side_commenting: OldSidePolicy::default(),
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then the config directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Load config from an explicitly given file.
    ///
    /// Unlike [`Self::load`], a missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
