//! Application configuration management.
//!
//! The configuration holds the backend URL and the last email used to log
//! in. It is stored at `~/.config/clinicdesk/config.json`; the
//! `CLINICDESK_BACKEND_URL` environment variable overrides the stored URL.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "clinicdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `backend_url`
pub const BACKEND_URL_ENV: &str = "CLINICDESK_BACKEND_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `~/.config/clinicdesk/config.json` or the platform equivalent.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Backend URL from the environment, then the config file.
    pub fn backend_url(&self) -> Result<String> {
        let env_value = std::env::var(BACKEND_URL_ENV).ok();
        Self::resolve_backend_url(env_value.as_deref(), self.backend_url.as_deref())
    }

    fn resolve_backend_url(env_value: Option<&str>, stored: Option<&str>) -> Result<String> {
        [env_value, stored]
            .into_iter()
            .flatten()
            .map(|url| url.trim().trim_end_matches('/'))
            .find(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No backend URL configured. Set {} or backend_url in the config file.",
                    BACKEND_URL_ENV
                )
            })
    }

    /// Directory holding persistent local storage (the token).
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Directory for log files.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
