//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (USERDECK_*)
//! 2. TOML config file (if USERDECK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::CacheOptions;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (USERDECK_*)
/// 2. TOML config file (if USERDECK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Endpoint returning the JSON array of user records.
    ///
    /// Set via USERDECK_API_URL environment variable.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Records shown per page.
    ///
    /// Set via USERDECK_PAGE_SIZE environment variable.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via USERDECK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via USERDECK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum response body size in bytes.
    ///
    /// Set via USERDECK_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Whether a new subscription revalidates an already cached key.
    ///
    /// Set via USERDECK_REVALIDATE_ON_MOUNT environment variable.
    #[serde(default = "default_true")]
    pub revalidate_on_mount: bool,

    /// Honour HTTP(S)_PROXY settings from the environment.
    ///
    /// Set via USERDECK_SYSTEM_PROXY environment variable.
    #[serde(default = "default_true")]
    pub system_proxy: bool,
}

fn default_api_url() -> String {
    "https://jsonplaceholder.typicode.com/users".into()
}

fn default_page_size() -> usize {
    4
}

fn default_user_agent() -> String {
    "userdeck/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            page_size: default_page_size(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            revalidate_on_mount: true,
            system_proxy: true,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache behaviour derived from this configuration.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions { revalidate_on_mount: self.revalidate_on_mount }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `USERDECK_`
    /// 2. TOML file from `USERDECK_CONFIG_FILE` (if set)
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

        if let Ok(config_path) = std::env::var("USERDECK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("USERDECK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api_url, "https://jsonplaceholder.typicode.com/users");
        assert_eq!(config.page_size, 4);
        assert_eq!(config.user_agent, "userdeck/0.1");
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.max_bytes, 5_242_880);
        assert!(config.revalidate_on_mount);
        assert!(config.system_proxy);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_cache_options_follow_config() {
        let config = AppConfig { revalidate_on_mount: false, ..Default::default() };
        assert!(!config.cache_options().revalidate_on_mount);
    }

    #[test]
    fn test_figment_layers_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("userdeck.toml", "page_size = 10\napi_url = \"https://example.com/users\"")?;
            jail.set_env("USERDECK_CONFIG_FILE", "userdeck.toml");
            jail.set_env("USERDECK_PAGE_SIZE", "6");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.page_size, 6);
            assert_eq!(config.api_url, "https://example.com/users");
            assert_eq!(config.user_agent, "userdeck/0.1");
            Ok(())
        });
    }

    #[test]
    fn test_system_proxy_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("USERDECK_SYSTEM_PROXY", "false");
            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert!(!config.system_proxy);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("USERDECK_PAGE_SIZE", "0");
            assert!(matches!(AppConfig::load(), Err(ConfigError::Invalid { field, .. }) if field == "page_size"));
            Ok(())
        });
    }
}
