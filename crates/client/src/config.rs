//! Client configuration management

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    pub client: ClientSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the dashboard backend
    pub base_url: String,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            client: ClientSettings {
                log_level: "info".to_string(),
            },
            server: ServerSettings {
                base_url: "http://127.0.0.1:8080".to_string(),
            },
        }
    }
}

impl DashConfig {
    /// Load configuration from the specified path
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            // Try standard locations in order
            let candidates = vec![
                Self::default_path(),
                PathBuf::from("/etc/mcp-dash/client.toml"),
            ];

            candidates
                .into_iter()
                .find(|p| p.exists())
                .ok_or_else(|| anyhow!("No configuration file found, using defaults"))?
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: DashConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()?;

        tracing::info!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default() -> Self {
        match Self::load(None) {
            Ok(config) => config,
            Err(e) => {
                // Print to stderr since logging might not be initialized yet
                eprintln!("Config: {}", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("mcp-dash").join("client.toml")
        } else {
            PathBuf::from(".config/mcp-dash/client.toml")
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.client.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.client.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.server.base_url.is_empty() {
            return Err(anyhow!("server.base_url must not be empty"));
        }
        if !self.server.base_url.starts_with("http://")
            && !self.server.base_url.starts_with("https://")
        {
            return Err(anyhow!(
                "server.base_url must start with http:// or https://, got '{}'",
                self.server.base_url
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashConfig::default();
        assert_eq!(config.client.log_level, "info");
        assert_eq!(config.server.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_config_serialization() {
        let config = DashConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: DashConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.client.log_level, parsed.client.log_level);
        assert_eq!(config.server.base_url, parsed.server.base_url);
    }

    #[test]
    fn test_config_with_custom_values() {
        let toml_content = r#"
[client]
log_level = "debug"

[server]
base_url = "https://dash.example.com"
"#;
        let config: DashConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.client.log_level, "debug");
        assert_eq!(config.server.base_url, "https://dash.example.com");
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = DashConfig::default();
        assert!(config.validate().is_ok());

        config.client.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.client.log_level = "trace".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = DashConfig::default();

        config.server.base_url = String::new();
        assert!(config.validate().is_err());

        config.server.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.server.base_url = "https://example.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");

        let mut config = DashConfig::default();
        config.server.base_url = "http://10.0.0.2:9090".to_string();
        config.save(&path).unwrap();

        let loaded = DashConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.server.base_url, "http://10.0.0.2:9090");
    }
}
