//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `HALLTEK_API_BASE_URL` - Backend origin (default: `http://127.0.0.1:5000`)
//! - `HALLTEK_CART_STORAGE_KEY` - Storage key for the cart (default: `halltek_cart`)
//! - `HALLTEK_STORAGE_PATH` - File used for durable storage (default: `.halltek/storage.json`)
//! - `HALLTEK_LOGIN_PATH` - Login entry point (default: `login.html`)
//! - `HALLTEK_REWARDS_PATH` - Gated rewards destination (default: `rewards.html`)
//! - `HALLTEK_CURRENCY` - Display currency (default: `INR`)
//! - `HALLTEK_CATALOG_CACHE_SECS` - Product listing cache TTL (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use halltek_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_CART_STORAGE_KEY: &str = "halltek_cart";
const DEFAULT_STORAGE_PATH: &str = ".halltek/storage.json";
const DEFAULT_LOGIN_PATH: &str = "login.html";
const DEFAULT_REWARDS_PATH: &str = "rewards.html";
const DEFAULT_CATALOG_CACHE_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend origin for `/api/*` and `/logout`
    pub api_base_url: Url,
    /// Durable storage key holding the serialized cart
    pub cart_storage_key: String,
    /// File backing durable storage when the host has nothing better
    pub storage_path: PathBuf,
    /// Login entry point; receives the intended destination as `next=`
    pub login_path: String,
    /// Destination that requires an authenticated session
    pub rewards_path: String,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// How long product listings stay cached
    pub catalog_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Create a configuration for `api_base_url` with every other setting at
    /// its default.
    #[must_use]
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            cart_storage_key: DEFAULT_CART_STORAGE_KEY.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            rewards_path: DEFAULT_REWARDS_PATH.to_string(),
            currency: CurrencyCode::default(),
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CATALOG_CACHE_SECS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(
            "HALLTEK_API_BASE_URL",
            &get_env_or_default("HALLTEK_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let cart_storage_key =
            get_non_empty_env_or_default("HALLTEK_CART_STORAGE_KEY", DEFAULT_CART_STORAGE_KEY)?;
        let storage_path = PathBuf::from(get_env_or_default(
            "HALLTEK_STORAGE_PATH",
            DEFAULT_STORAGE_PATH,
        ));
        let login_path = get_non_empty_env_or_default("HALLTEK_LOGIN_PATH", DEFAULT_LOGIN_PATH)?;
        let rewards_path =
            get_non_empty_env_or_default("HALLTEK_REWARDS_PATH", DEFAULT_REWARDS_PATH)?;
        let currency = get_env_or_default("HALLTEK_CURRENCY", CurrencyCode::default().code())
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("HALLTEK_CURRENCY".to_string(), e.to_string()))?;
        let catalog_cache_secs = get_env_or_default(
            "HALLTEK_CATALOG_CACHE_SECS",
            &DEFAULT_CATALOG_CACHE_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("HALLTEK_CATALOG_CACHE_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            cart_storage_key,
            storage_path,
            login_path,
            rewards_path,
            currency,
            catalog_cache_ttl: Duration::from_secs(catalog_cache_secs),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL, requiring an HTTP(S) scheme.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable with a default, rejecting a blank value.
fn get_non_empty_env_or_default(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = get_env_or_default(key, default);
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn default_config() -> StorefrontConfig {
        StorefrontConfig::new(Url::parse(DEFAULT_API_BASE_URL).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = default_config();
        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.cart_storage_key, "halltek_cart");
        assert_eq!(config.login_path, "login.html");
        assert_eq!(config.rewards_path, "rewards.html");
        assert_eq!(config.currency, CurrencyCode::INR);
        assert_eq!(config.catalog_cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_parse_base_url_rejects_non_http() {
        let err = parse_base_url("TEST_URL", "ftp://example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
        assert!(parse_base_url("TEST_URL", "not a url").is_err());
        assert!(parse_base_url("TEST_URL", "https://shop.example.com").is_ok());
    }

    #[test]
    fn test_non_empty_default_used_when_unset() {
        let value =
            get_non_empty_env_or_default("HALLTEK_TEST_SURELY_UNSET_VAR", "fallback").unwrap();
        assert_eq!(value, "fallback");
    }
}
