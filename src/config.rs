//! Configuration management for the dashboard

use std::env;

use crate::error::{DashboardError, Result};
use crate::types::Timeframe;

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// CoinGecko asset id, e.g. "ethereum"
    pub asset_id: String,

    /// Base URL of the quote provider API
    pub api_base_url: String,

    /// Quote refresh period in seconds
    pub quote_poll_seconds: u64,

    /// Window of the one-shot historical fetch, in days
    pub historical_window_days: u32,

    /// Keep every Nth historical point to bound chart density
    pub downsample_stride: usize,

    /// Timeframe selected at startup
    pub default_timeframe: Timeframe,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_id: "ethereum".to_string(),
            api_base_url: "https://api.coingecko.com/api/v3".to_string(),
            quote_poll_seconds: 15,
            historical_window_days: 3650,
            downsample_stride: 30,
            default_timeframe: Timeframe::Day,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            asset_id: env::var("COINWATCH_ASSET_ID").unwrap_or(defaults.asset_id),

            api_base_url: env::var("COINWATCH_API_BASE_URL").unwrap_or(defaults.api_base_url),

            quote_poll_seconds: env::var("COINWATCH_QUOTE_POLL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.quote_poll_seconds),

            historical_window_days: env::var("COINWATCH_HISTORICAL_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.historical_window_days),

            downsample_stride: env::var("COINWATCH_DOWNSAMPLE_STRIDE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.downsample_stride),

            default_timeframe: env::var("COINWATCH_DEFAULT_TIMEFRAME")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_timeframe),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.asset_id.is_empty() {
            return Err(DashboardError::Config("asset_id must not be empty".into()));
        }
        if self.api_base_url.is_empty() {
            return Err(DashboardError::Config(
                "api_base_url must not be empty".into(),
            ));
        }
        if self.quote_poll_seconds == 0 {
            return Err(DashboardError::Config(
                "quote_poll_seconds must be positive".into(),
            ));
        }
        if self.historical_window_days == 0 {
            return Err(DashboardError::Config(
                "historical_window_days must be positive".into(),
            ));
        }
        if self.downsample_stride == 0 {
            return Err(DashboardError::Config(
                "downsample_stride must be positive".into(),
            ));
        }
        Ok(())
    }
}
