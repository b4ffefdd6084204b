//! Configuration loading for the provider connection
//!
//! Supports loading provider settings from (in order of priority):
//! 1. An explicit JSON file passed by the caller
//! 2. JSON file in the Skylink config directory (provider.json)
//! 3. Runtime environment variables (fallback)

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::provider::BasicAuth;

/// Provider settings filename in the Skylink config directory
const PROVIDER_FILE: &str = "provider.json";

/// Transport timeout applied when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings and credentials for the messaging provider
///
/// Two credential pairs are involved: the Basic-Auth login sent in the
/// `Authorization` header, and the access id/password the provider expects
/// as request parameters.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the REST service, endpoint paths are appended to it
    pub base_url: String,
    pub access_id: String,
    pub access_password: String,
    /// Basic-Auth user
    pub username: String,
    /// Basic-Auth password
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ProviderConfig {
    /// Load settings using the following priority:
    /// 1. JSON file (~/.config/skylink/provider.json)
    /// 2. Runtime environment variables
    pub fn load() -> Result<Self> {
        if config::config_exists(PROVIDER_FILE) {
            let cfg: Self = config::load_json(PROVIDER_FILE)?;
            return cfg.validated();
        }

        Self::from_env()
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let cfg: Self = config::load_json_file(path)?;
        cfg.validated()
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json).context("Failed to parse provider settings")?;
        cfg.validated()
    }

    /// Load settings from `INMARSAT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("{} environment variable not set", key))
        };

        let timeout_secs = match lookup("INMARSAT_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("INMARSAT_TIMEOUT_SECS is not a number: {}", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let cfg = Self {
            base_url: require("INMARSAT_BASE_URL")?,
            access_id: require("INMARSAT_ACCESS_ID")?,
            access_password: require("INMARSAT_ACCESS_PASSWORD")?,
            username: require("INMARSAT_USERNAME")?,
            password: require("INMARSAT_PASSWORD")?,
            timeout_secs,
        };
        cfg.validated()
    }

    /// Get the default settings file path (~/.config/skylink/provider.json)
    pub fn default_config_path() -> Option<PathBuf> {
        config::config_path(PROVIDER_FILE)
    }

    /// Check if settings are available (config file or env vars)
    pub fn is_available() -> bool {
        if config::config_exists(PROVIDER_FILE) {
            return true;
        }
        std::env::var("INMARSAT_BASE_URL").is_ok() && std::env::var("INMARSAT_ACCESS_ID").is_ok()
    }

    /// Basic-Auth pair for the `Authorization` header
    pub fn basic_auth(&self) -> BasicAuth {
        BasicAuth::new(&self.username, &self.password)
    }

    fn validated(self) -> Result<Self> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid provider base URL: {}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("Provider base URL must be http or https: {}", self.base_url);
        }

        for (name, value) in [
            ("access_id", &self.access_id),
            ("access_password", &self.access_password),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                bail!("Provider setting '{}' is empty", name);
            }
        }

        if self.timeout_secs == 0 {
            bail!("Provider timeout must be at least one second");
        }

        Ok(self)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("access_id", &self.access_id)
            .field("access_password", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
