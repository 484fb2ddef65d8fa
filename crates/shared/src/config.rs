//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Settlement scheduler configuration.
    #[serde(default)]
    pub settlement: SettlementConfig,
    /// Payment gateway configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Settlement scheduler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Days a completed order stays inside the return window before its
    /// escrowed funds are released to the seller.
    #[serde(default = "default_return_period_days")]
    pub return_period_days: i64,
    /// Seconds between settlement batch runs.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            return_period_days: default_return_period_days(),
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_return_period_days() -> i64 {
    7
}

fn default_interval_secs() -> u64 {
    3600
}

/// Payment gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Upper bound on a single gateway refund call, in milliseconds.
    #[serde(default = "default_refund_timeout_ms")]
    pub refund_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            refund_timeout_ms: default_refund_timeout_ms(),
        }
    }
}

fn default_refund_timeout_ms() -> u64 {
    5000
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
            .add_source(config::Environment::with_prefix("VENDRA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
