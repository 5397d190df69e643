//! Client configuration
//!
//! Resolution order (later wins):
//! 1. Embedded defaults (compiled into the binary)
//! 2. Override file (~/.config/nestegg/config.toml)
//! 3. Environment (`NESTEGG_API_URL`, `NESTEGG_DATA_DIR`)
//! 4. Explicit setters, used by the CLI flags

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/nestegg.toml");

pub const ENV_API_URL: &str = "NESTEGG_API_URL";
pub const ENV_DATA_DIR: &str = "NESTEGG_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the finance API, without a trailing slash
    pub api_url: String,
    /// Session, drafts and mirror location
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load defaults, the user override file and the environment
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(default_config_path().as_deref())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load the embedded defaults, then the override file if it exists
    pub fn load_from(override_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        apply_toml(&mut config, DEFAULT_CONFIG)?;

        if let Some(path) = override_path {
            if path.exists() {
                let content = fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                apply_toml(&mut config, &content)?;
                tracing::debug!(path = %path.display(), "Loaded config override");
            }
        }

        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.set_api_url(&url)?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn set_api_url(&mut self, url: &str) -> Result<()> {
        self.api_url = normalize_url(url)?;
        Ok(())
    }

    pub fn set_data_dir(&mut self, dir: impl Into<PathBuf>) {
        self.data_dir = dir.into();
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nestegg").join("config.toml"))
}

/// Platform data directory for nestegg
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nestegg")
}

fn normalize_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::Config(format!(
            "API URL must start with http:// or https://, got '{}'",
            url
        )));
    }
    Ok(url.to_string())
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    api: Option<RawApi>,
    storage: Option<RawStorage>,
}

#[derive(Debug, Deserialize)]
struct RawApi {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStorage {
    data_dir: Option<String>,
}

/// Apply the keys present in `content` on top of `config`
fn apply_toml(config: &mut Config, content: &str) -> Result<()> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    if let Some(url) = raw.api.and_then(|a| a.url) {
        config.set_api_url(&url)?;
    }
    if let Some(dir) = raw.storage.and_then(|s| s.data_dir) {
        if !dir.trim().is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_parse_default_config() {
        let mut config = Config::default();
        apply_toml(&mut config, DEFAULT_CONFIG).unwrap();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.data_dir, default_data_dir());
    }

    #[test]
    fn test_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[api]\nurl = \"https://money.example.com/\"\n\n[storage]\ndata_dir = \"/tmp/nestegg-test\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.api_url, "https://money.example.com");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/nestegg-test"));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[storage]\ndata_dir = \"/srv/nestegg\"\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.data_dir, PathBuf::from("/srv/nestegg"));
    }

    #[test]
    fn test_missing_override_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.api_url, "http://localhost:5000");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://10.0.0.5:8080/"),
            (ENV_DATA_DIR, "/var/lib/nestegg"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.api_url, "http://10.0.0.5:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/nestegg"));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_api_url("localhost:5000"),
            Err(Error::Config(_))
        ));
        assert!(apply_toml(&mut config, "[api\nurl=").is_err());
    }
}
