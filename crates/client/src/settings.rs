//! Persisted user preferences
//!
//! The dashboard keeps three user-owned values across sessions: the
//! refresh interval, the auto-refresh toggle, and the bearer token. They
//! are stored as a single JSON document under a fixed key, with field
//! names matching the original storage format. Missing fields fall back
//! to defaults on load; there is no versioning and no expiry.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed storage key; doubles as the settings file stem
pub const SETTINGS_KEY: &str = "toolhiveSettings";

/// Refresh interval used when the stored value is missing or unparsable
pub const DEFAULT_REFRESH_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiSettings {
    /// Refresh interval in seconds, kept as the raw field text
    pub refresh_interval: String,
    pub is_auto_refresh_enabled: bool,
    pub auth_token: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_SECS.to_string(),
            is_auto_refresh_enabled: true,
            auth_token: String::new(),
        }
    }
}

impl UiSettings {
    /// Parse the refresh interval, falling back to the default on bad input
    pub fn refresh_interval(&self) -> Duration {
        let secs = self
            .refresh_interval
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_REFRESH_SECS);
        Duration::from_secs(secs)
    }

    /// Token to attach as a bearer header, None when unset
    pub fn token(&self) -> Option<&str> {
        let trimmed = self.auth_token.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Load settings from the given path, defaulting everything when the
    /// file is absent or unreadable
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Ignoring malformed settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the given path, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        tracing::debug!("Saved settings to: {}", path.display());
        Ok(())
    }

    /// Default settings file path
    pub fn default_path() -> PathBuf {
        let file = format!("{}.json", SETTINGS_KEY);
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("mcp-dash").join(file)
        } else {
            PathBuf::from(".config/mcp-dash").join(file)
        }
    }
}
