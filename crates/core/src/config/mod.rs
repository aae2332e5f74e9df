//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PARCEP_*)
//! 2. TOML config file (if PARCEP_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::record::ProviderId;

mod validation;

pub use validation::ConfigError;

/// Default BrasilAPI base URL.
pub const DEFAULT_BRASILAPI_BASE_URL: &str = "https://brasilapi.com.br/api";

/// Default ViaCEP base URL.
pub const DEFAULT_VIACEP_BASE_URL: &str = "https://viacep.com.br";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PARCEP_*)
/// 2. TOML config file (if PARCEP_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache database. `None` keeps the cache in memory.
    ///
    /// Set via PARCEP_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: Option<PathBuf>,

    /// Cache entry lifetime in days.
    ///
    /// Set via PARCEP_CACHE_TTL_DAYS environment variable.
    #[serde(default = "default_cache_ttl_days")]
    pub cache_ttl_days: u64,

    /// Per-provider request timeout in milliseconds.
    ///
    /// Set via PARCEP_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via PARCEP_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Set via PARCEP_BRASILAPI_BASE_URL environment variable.
    #[serde(default = "default_brasilapi_base_url")]
    pub brasilapi_base_url: String,

    /// Set via PARCEP_VIACEP_BASE_URL environment variable.
    #[serde(default = "default_viacep_base_url")]
    pub viacep_base_url: String,

    /// Providers to query. Priority order is fixed regardless of list order.
    ///
    /// Set via PARCEP_PROVIDERS environment variable (e.g. `[brasilapi]`).
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderId>,
}

fn default_db_path() -> Option<PathBuf> {
    Some(PathBuf::from("./parcep-cache.sqlite"))
}

fn default_cache_ttl_days() -> u64 {
    15
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "parcep/0.1".into()
}

fn default_brasilapi_base_url() -> String {
    DEFAULT_BRASILAPI_BASE_URL.into()
}

fn default_viacep_base_url() -> String {
    DEFAULT_VIACEP_BASE_URL.into()
}

fn default_providers() -> Vec<ProviderId> {
    ProviderId::ALL.to_vec()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            cache_ttl_days: default_cache_ttl_days(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            brasilapi_base_url: default_brasilapi_base_url(),
            viacep_base_url: default_viacep_base_url(),
            providers: default_providers(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_days * 24 * 60 * 60)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PARCEP_`
    /// 2. TOML file from `PARCEP_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PARCEP_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PARCEP_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::from_figment(&figment)
    }

    /// Extract and validate from an already assembled figment.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
