//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Currency configuration.
    #[serde(default)]
    pub currencies: CurrencyConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration as loaded from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in minutes.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expires_minutes: i64,
}

fn default_access_token_expiry() -> i64 {
    60 * 24 // 24 hours
}

/// Currency allow-list configuration.
///
/// Passed explicitly into validation and report code; there is no
/// process-wide currency singleton.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    /// Currency codes accepted by the API.
    #[serde(default = "default_available")]
    pub available: Vec<String>,
    /// Currency used when a request does not specify one.
    #[serde(default = "default_currency")]
    pub default: String,
}

fn default_available() -> Vec<String> {
    ["USD", "EUR", "ZAR", "INR"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            available: default_available(),
            default: default_currency(),
        }
    }
}

impl CurrencyConfig {
    /// Returns true when the given code is in the allow-list.
    #[must_use]
    pub fn is_allowed(&self, code: &str) -> bool {
        self.available.iter().any(|c| c == code)
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MONETA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_currency_config() {
        let config = CurrencyConfig::default();
        assert_eq!(config.default, "USD");
        assert!(config.is_allowed("USD"));
        assert!(config.is_allowed("ZAR"));
        assert!(!config.is_allowed("JPY"));
    }

    #[test]
    fn test_default_currency_is_allowed() {
        let config = CurrencyConfig::default();
        assert!(config.is_allowed(&config.default));
    }
}
