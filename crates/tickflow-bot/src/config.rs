//! Application configuration.
//!
//! Endpoints, symbol, and loop tuning come from a TOML file with
//! defaults pointing at the futures testnet. Credentials never live in
//! the config file; they are read from the environment only.

use crate::error::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Traded symbol.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// REST base URL.
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    /// Stream base URL.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Streaming connection settings.
    #[serde(default)]
    pub stream: StreamConfig,
    /// Trading loop settings.
    #[serde(default)]
    pub trading: TradingConfig,
}

fn default_symbol() -> String {
    "SOLUSDT".to_string()
}

fn default_rest_url() -> String {
    "https://testnet.binancefuture.com".to_string()
}

fn default_ws_url() -> String {
    "wss://stream.binancefuture.com/ws".to_string()
}

/// Streaming connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Delay between reconnection attempts (ms).
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_reconnect_delay_ms() -> u64 {
    5_000
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

/// Trading loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Lower bound of the randomized cycle interval (ms).
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Upper bound of the randomized cycle interval (ms).
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
    /// Cancel all open orders after this many placements.
    #[serde(default = "default_cleanup_every")]
    pub cleanup_every: u32,
    /// Target notional per order, in quote currency.
    #[serde(default = "default_target_notional", with = "rust_decimal::serde::str")]
    pub target_notional: Decimal,
    /// Price offset from mid, as a fraction (0.05 = 5%).
    #[serde(default = "default_price_offset_pct", with = "rust_decimal::serde::str")]
    pub price_offset_pct: Decimal,
}

fn default_min_interval_ms() -> u64 {
    3_000
}

fn default_max_interval_ms() -> u64 {
    7_000
}

fn default_cleanup_every() -> u32 {
    5
}

fn default_target_notional() -> Decimal {
    Decimal::from(50)
}

fn default_price_offset_pct() -> Decimal {
    Decimal::new(5, 2)
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
            cleanup_every: default_cleanup_every(),
            target_notional: default_target_notional(),
            price_offset_pct: default_price_offset_pct(),
        }
    }
}

impl TradingConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }
}

impl AppConfig {
    /// Load configuration: explicit path > `TICKFLOW_CONFIG` env var >
    /// `config/default.toml` if present > built-in defaults.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let config_path =
            std::env::var("TICKFLOW_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Self::default()
        };

        // Symbol can be overridden without touching the file.
        if let Ok(symbol) = std::env::var("TRADING_SYMBOL") {
            config.symbol = symbol;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the loop tuning invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.symbol.is_empty() {
            return Err(AppError::Config("symbol must not be empty".to_string()));
        }
        if self.trading.max_interval_ms < self.trading.min_interval_ms {
            return Err(AppError::Config(
                "trading.max_interval_ms must be >= trading.min_interval_ms".to_string(),
            ));
        }
        if self.trading.cleanup_every == 0 {
            return Err(AppError::Config(
                "trading.cleanup_every must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            rest_url: default_rest_url(),
            ws_url: default_ws_url(),
            stream: StreamConfig::default(),
            trading: TradingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.symbol, "SOLUSDT");
        assert_eq!(config.trading.cleanup_every, 5);
        assert_eq!(config.trading.target_notional, dec!(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            symbol = "BTCUSDT"

            [trading]
            min_interval_ms = 1000
            max_interval_ms = 2000
            "#,
        )
        .unwrap();
        assert_eq!(config.symbol, "BTCUSDT");
        assert_eq!(config.trading.min_interval(), Duration::from_secs(1));
        // Untouched sections keep their defaults.
        assert_eq!(config.trading.cleanup_every, 5);
        assert_eq!(config.stream.reconnect_delay_ms, 5_000);
    }

    #[test]
    fn test_decimal_fields_parse_from_strings() {
        let config: AppConfig = toml::from_str(
            r#"
            [trading]
            target_notional = "75"
            price_offset_pct = "0.02"
            "#,
        )
        .unwrap();
        assert_eq!(config.trading.target_notional, dec!(75));
        assert_eq!(config.trading.price_offset_pct, dec!(0.02));
    }

    #[test]
    fn test_validate_rejects_inverted_interval() {
        let mut config = AppConfig::default();
        config.trading.min_interval_ms = 5_000;
        config.trading.max_interval_ms = 1_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.symbol, config.symbol);
        assert_eq!(parsed.trading.target_notional, config.trading.target_notional);
    }
}
