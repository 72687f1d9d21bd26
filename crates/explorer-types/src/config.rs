//! Configuration types for Axum Explorer.
//!
//! `ExplorerConfig` represents the top-level `config.toml` in the data
//! directory. Every section and field has a default, so an empty or partial
//! file is valid.

use serde::{Deserialize, Serialize};

use crate::commission::CommissionRates;
use crate::error::ConfigError;
use crate::provider::ServiceType;

/// Signing secret used when none is configured. Fine for local use only.
pub const DEFAULT_TOKEN_SECRET: &str = "axum-explorer-dev-secret-change-me";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Platform commission rate per service type.
    #[serde(default)]
    pub commission: CommissionRates,

    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origin. `*` allows any origin.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Database location and pool sizing. When `url` is unset the database
/// lives at `{data_dir}/explorer.db`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,

    /// Connections in the read-only pool. Writes always use one connection.
    #[serde(default = "default_max_readers")]
    pub max_readers: u32,

    /// How long a connection waits on a locked database.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

fn default_max_readers() -> u32 {
    8
}

fn default_busy_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_readers: default_max_readers(),
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_token_secret")]
    pub token_secret: String,

    /// Session token lifetime. Defaults to seven days.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,

    /// Mark newly registered accounts verified immediately.
    #[serde(default)]
    pub auto_verify_users: bool,
}

fn default_token_secret() -> String {
    DEFAULT_TOKEN_SECRET.to_string()
}

fn default_token_ttl_hours() -> u64 {
    168
}

/// Shortest accepted token signing secret, in bytes.
pub const MIN_TOKEN_SECRET_LEN: usize = 32;

impl AuthConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }

    pub fn validate_secret(&self) -> Result<(), ConfigError> {
        let len = self.token_secret.len();
        if len < MIN_TOKEN_SECRET_LEN {
            return Err(ConfigError::WeakTokenSecret {
                len,
                min: MIN_TOKEN_SECRET_LEN,
            });
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_ttl_hours: default_token_ttl_hours(),
            auto_verify_users: false,
        }
    }
}

/// Fallback daily rates for package bookings whose details carry no rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_hotel_nightly")]
    pub hotel_nightly: f64,

    #[serde(default = "default_car_rental_daily")]
    pub car_rental_daily: f64,

    #[serde(default = "default_guide_daily")]
    pub guide_daily: f64,
}

fn default_hotel_nightly() -> f64 {
    5000.0
}

fn default_car_rental_daily() -> f64 {
    2000.0
}

fn default_guide_daily() -> f64 {
    1500.0
}

impl PricingConfig {
    pub fn default_rate(&self, service_type: ServiceType) -> f64 {
        match service_type {
            ServiceType::Hotel => self.hotel_nightly,
            ServiceType::CarRental => self.car_rental_daily,
            ServiceType::Guide => self.guide_daily,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            hotel_nightly: default_hotel_nightly(),
            car_rental_daily: default_car_rental_daily(),
            guide_daily: default_guide_daily(),
        }
    }
}
