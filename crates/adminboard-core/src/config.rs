//! Dashboard configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use adminboard_session::DEFAULT_TOKEN_LIFETIME_MINS;

use crate::error::CoreError;
use crate::Result;

pub const ENV_API_URL: &str = "ADMINBOARD_API_URL";
pub const ENV_DATABASE: &str = "ADMINBOARD_DB";
pub const ENV_TIMEOUT_SECS: &str = "ADMINBOARD_TIMEOUT_SECS";
pub const ENV_TOKEN_LIFETIME_MINS: &str = "ADMINBOARD_TOKEN_LIFETIME_MINS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the identity service and user directory
    pub api_base_url: String,
    /// Path to the credential database
    pub database_path: PathBuf,
    /// Upper bound for a single remote call
    pub request_timeout_secs: u64,
    /// Lifetime requested for issued tokens
    pub token_lifetime_mins: u32,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            api_base_url: "https://dummyjson.com".to_string(),
            database_path: data_dir.join("adminboard.db"),
            request_timeout_secs: 30,
            token_lifetime_mins: DEFAULT_TOKEN_LIFETIME_MINS,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("adminboard"))
            .unwrap_or_else(|| PathBuf::from(".adminboard"))
    }

    /// Defaults, overridden by `ADMINBOARD_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, then validate
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }

        if let Some(path) = lookup(ENV_DATABASE) {
            self.database_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"))
            })?;
        }

        if let Some(raw) = lookup(ENV_TOKEN_LIFETIME_MINS) {
            self.token_lifetime_mins = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!("{ENV_TOKEN_LIFETIME_MINS} must be a whole number of minutes, got {raw:?}"))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_base_url)
            .map_err(|e| CoreError::Config(format!("invalid API URL {:?}: {e}", self.api_base_url)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CoreError::Config(format!(
                "API URL must be http or https, got {:?}",
                self.api_base_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config("request timeout must be positive".to_string()));
        }

        if self.token_lifetime_mins == 0 {
            return Err(CoreError::Config("token lifetime must be positive".to_string()));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
