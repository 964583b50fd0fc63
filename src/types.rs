//! Common types for the dashboard
//!
//! All shared data structures used across modules.

use chrono::{DateTime, Utc};

/// Current spot price and 24h percent change for the tracked asset.
///
/// Replaced wholesale on each successful fetch; never partially updated.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub price: f64,
    pub change_24h_percent: f64,
    /// When this quote was accepted into state
    pub observed_at: DateTime<Utc>,
}

/// One observation in a price series, ordered ascending by time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp_millis: i64,
    pub price: f64,
}

/// One downsampled point of the long-term history
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalPoint {
    /// Pre-formatted month + 2-digit year, e.g. "Nov 23"
    pub label: String,
    /// Price rounded to cents
    pub price: f64,
}

/// User-selected window for the short-term chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    #[default]
    Day,
    Week,
    Month,
}

impl Timeframe {
    /// All selectable timeframes, in display order
    pub const ALL: [Timeframe; 3] = [Timeframe::Day, Timeframe::Week, Timeframe::Month];

    /// Day-count parameter for the market-chart endpoint.
    /// Exhaustive mapping, no fallback.
    pub fn days(self) -> u32 {
        match self {
            Timeframe::Day => 1,
            Timeframe::Week => 7,
            Timeframe::Month => 30,
        }
    }

    /// Display label matching the selector UI
    pub fn label(self) -> &'static str {
        match self {
            Timeframe::Day => "24h",
            Timeframe::Week => "7d",
            Timeframe::Month => "30d",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "24h" => Ok(Timeframe::Day),
            "7d" => Ok(Timeframe::Week),
            "30d" => Ok(Timeframe::Month),
            _ => Err(format!("Unknown timeframe: '{s}'. Supported: 24h, 7d, 30d")),
        }
    }
}

/// Derived statistics over the current short-term series.
///
/// Recomputed on every render, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}
