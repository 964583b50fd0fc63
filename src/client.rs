//! CoinGecko API client
//!
//! Implements the three read-only endpoints the dashboard needs:
//! - Simple price (spot + 24h change)
//! - Market chart over a short window (1/7/30 days)
//! - Market chart over the ~10-year historical window
//!
//! No authentication, no API key. Public endpoints only.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{DashboardError, Result};
use crate::types::PricePoint;

/// Spot price and 24h change as returned by the simple-price endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotQuote {
    pub price: f64,
    pub change_24h_percent: f64,
}

/// Source of market data for one asset.
///
/// Seam between the refresh engine and the network; tests substitute a fake.
#[async_trait]
pub trait MarketData {
    /// Current spot price and 24h percent change
    async fn spot_quote(&self) -> Result<SpotQuote>;

    /// Price series over the trailing `days` window
    async fn price_series(&self, days: u32) -> Result<Vec<PricePoint>>;
}

/// Per-currency entry of the simple-price response
#[derive(Debug, Deserialize)]
struct SimplePriceEntry {
    usd: f64,
    #[serde(default)]
    usd_24h_change: f64,
}

/// Market chart response: `prices` is an array of [epochMillis, price] pairs
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Vec<(f64, f64)>,
}

/// CoinGecko API client for a single asset
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
    asset_id: String,
}

impl CoinGeckoClient {
    /// Create a new client for the given asset
    pub fn new(base_url: impl Into<String>, asset_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            asset_id: asset_id.into(),
        }
    }

    /// GET the simple-price endpoint and extract this asset's entry
    async fn simple_price(&self) -> Result<SpotQuote> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true",
            self.base_url, self.asset_id
        );
        let entries: HashMap<String, SimplePriceEntry> = self.get_json(&url).await?;

        let entry = entries.get(&self.asset_id).ok_or_else(|| {
            DashboardError::Payload(format!("asset '{}' missing from response", self.asset_id))
        })?;

        Ok(SpotQuote {
            price: entry.usd,
            change_24h_percent: entry.usd_24h_change,
        })
    }

    /// GET the market-chart endpoint for the trailing `days` window
    async fn market_chart(&self, days: u32) -> Result<Vec<PricePoint>> {
        let url = format!(
            "{}/coins/{}/market_chart?vs_currency=usd&days={}",
            self.base_url, self.asset_id, days
        );
        let response: MarketChartResponse = self.get_json(&url).await?;

        Ok(response
            .prices
            .into_iter()
            .map(|(timestamp, price)| PricePoint {
                timestamp_millis: timestamp as i64,
                price,
            })
            .collect())
    }

    /// Perform a GET request and decode the JSON response
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle API response, classifying errors by status
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status == 429 {
            // Rate limited
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            return Err(DashboardError::RateLimit(retry_after));
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            return Err(DashboardError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(DashboardError::from)
    }
}

#[async_trait]
impl MarketData for CoinGeckoClient {
    async fn spot_quote(&self) -> Result<SpotQuote> {
        self.simple_price().await
    }

    async fn price_series(&self, days: u32) -> Result<Vec<PricePoint>> {
        self.market_chart(days).await
    }
}
