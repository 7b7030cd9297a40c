//! API configuration
//!
//! Read from an optional `config/insurance.toml` and then from `API_`
//! environment variables, nested keys separated by `__`:
//!
//! ```text
//! API_SERVER__PORT=8080
//! API_DATABASE__URL=postgres://localhost/insurance
//! API_PEERS__PRODUCT_URL=http://product-service:8081
//! API_RESILIENCE__FAILURE_THRESHOLD=5
//! ```

use std::time::Duration;

use core_kernel::CircuitBreakerConfig;
use infra_cache::CacheConfig;
use infra_db::DatabaseConfig;
use serde::{Deserialize, Serialize};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Listener and logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Where the peer services live
///
/// A missing URL means the peer runs in this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeersConfig {
    pub product_url: Option<String>,
    pub policy_url: Option<String>,
    pub payment_url: Option<String>,
    /// Per-request HTTP timeout
    pub timeout_ms: u64,
}

impl PeersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for PeersConfig {
    fn default() -> Self {
        Self {
            product_url: None,
            policy_url: None,
            payment_url: None,
            timeout_ms: 3_000,
        }
    }
}

/// API configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    /// PostgreSQL settings; in-memory repositories are used when absent
    pub database: Option<DatabaseConfig>,
    pub peers: PeersConfig,
    /// Breaker settings applied to every peer
    pub resilience: CircuitBreakerConfig,
    pub cache: CacheConfig,
}

impl ApiConfig {
    /// Loads configuration from `config/insurance.toml` and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config/insurance")
    }

    /// Loads configuration from the given file stem and the environment
    ///
    /// The file is optional; any format the `config` crate recognises works.
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("API")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
