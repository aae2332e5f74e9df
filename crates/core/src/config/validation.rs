//! Configuration validation rules.
//!
//! Checks `AppConfig` values after they have been loaded from environment,
//! files, or defaults.

use thiserror::Error;
use url::Url;

use crate::config::AppConfig;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err.to_string())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| invalid(field, e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(field, format!("unsupported scheme: {}", url.scheme())));
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `cache_ttl_days` is 0 or exceeds a year
    /// - `user_agent` is empty
    /// - a base URL is not an absolute http(s) URL
    /// - `providers` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.cache_ttl_days == 0 || self.cache_ttl_days > 365 {
            return Err(invalid("cache_ttl_days", "must be between 1 and 365"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        validate_base_url("brasilapi_base_url", &self.brasilapi_base_url)?;
        validate_base_url("viacep_base_url", &self.viacep_base_url)?;

        if self.providers.is_empty() {
            return Err(invalid("providers", "at least one provider is required"));
        }

        if self.db_path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            tracing::warn!("db_path is empty; cache will be kept in memory");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_ttl_bounds() {
        let zero = AppConfig { cache_ttl_days: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid { field, .. }) if field == "cache_ttl_days"));

        let too_long = AppConfig { cache_ttl_days: 366, ..Default::default() };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_base_urls() {
        let relative = AppConfig { viacep_base_url: "viacep.com.br".into(), ..Default::default() };
        assert!(matches!(relative.validate(), Err(ConfigError::Invalid { field, .. }) if field == "viacep_base_url"));

        let ftp = AppConfig { brasilapi_base_url: "ftp://brasilapi.com.br".into(), ..Default::default() };
        assert!(matches!(ftp.validate(), Err(ConfigError::Invalid { field, .. }) if field == "brasilapi_base_url"));

        let local = AppConfig { viacep_base_url: "http://127.0.0.1:8080".into(), ..Default::default() };
        assert!(local.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_providers() {
        let config = AppConfig { providers: Vec::new(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "providers"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { timeout_ms: 100, cache_ttl_days: 1, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { timeout_ms: 300_000, cache_ttl_days: 365, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_error_into_error() {
        let err: crate::Error = invalid("timeout_ms", "too small").into();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
