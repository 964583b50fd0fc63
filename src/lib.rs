//! coinwatch - single-asset price dashboard over the CoinGecko API
//!
//! Polls a public quote API and renders current value, short-term trend,
//! and long-term history for one asset.
//!
//! # Architecture
//! - Three independent fetchers (quote, short-term series, historical
//!   series) with different cadences, declared as data in `tasks`
//! - One state record updated via discrete transitions in `state`
//! - A refresh engine in `app` that sequences startup, guards against
//!   out-of-order responses, and swallows per-fetch failures
//! - A plain-text view in `view` deriving all display values from state
//!
//! # Failure semantics
//! Nothing is fatal: a failed fetch logs a diagnostic and leaves the last
//! known data in place. Worst case is stale or missing data on screen.

mod app;
mod client;
mod config;
mod error;
mod state;
mod stats;
mod tasks;
mod types;
mod view;

pub use app::App;
pub use client::{CoinGeckoClient, MarketData, SpotQuote};
pub use config::Config;
pub use error::{DashboardError, Result};
pub use state::{DashboardState, RequestSeq, StateEvent};
pub use stats::{condense_history, downsample, month_year_label, series_stats};
pub use tasks::{interval_for, refresh_plan, Job, RefreshTimer, TaskSpec, Trigger};
pub use types::{HistoricalPoint, PricePoint, Quote, SeriesStats, Timeframe};
pub use view::render;
