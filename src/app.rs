//! Refresh and reconciliation engine
//!
//! Owns the state container and runs the three fetchers against a
//! [`MarketData`] source. Every fetch outcome becomes a state transition;
//! failures are logged and swallowed, never propagated. Each racy fetcher
//! carries a request sequence so a superseded response is discarded instead
//! of clobbering newer state.

use chrono::Utc;
use tracing::{debug, warn};

use crate::client::MarketData;
use crate::config::Config;
use crate::state::{DashboardState, RequestSeq, StateEvent};
use crate::stats;
use crate::types::{Quote, Timeframe};

/// The dashboard refresh engine
pub struct App<S> {
    source: S,
    state: DashboardState,
    quote_seq: RequestSeq,
    series_seq: RequestSeq,
    historical_window_days: u32,
    downsample_stride: usize,
    historical_loaded: bool,
}

impl<S: MarketData> App<S> {
    /// Create the engine with an empty state
    pub fn new(source: S, config: &Config) -> Self {
        Self {
            source,
            state: DashboardState::new(config.default_timeframe),
            quote_seq: RequestSeq::default(),
            series_seq: RequestSeq::default(),
            historical_window_days: config.historical_window_days,
            downsample_stride: config.downsample_stride,
            historical_loaded: false,
        }
    }

    /// Current render-ready state
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Startup sequence: quote, short-term series, then historical load,
    /// each awaited before the next so at most one request is in flight.
    /// Per-fetcher failures are swallowed; the loading flag clears only
    /// after all three complete.
    pub async fn startup(&mut self) {
        self.refresh_quote().await;
        self.refresh_series().await;
        self.load_historical().await;
        self.state.apply(StateEvent::StartupFinished);
    }

    /// Refresh the spot quote. Runs at startup, on every timer tick, and
    /// on manual retry; all three paths perform the identical fetch.
    pub async fn refresh_quote(&mut self) {
        let request = self.quote_seq.begin();

        match self.source.spot_quote().await {
            Ok(spot) if self.quote_seq.is_current(request) => {
                debug!(price = spot.price, "quote refreshed");
                self.state.apply(StateEvent::QuoteFetched(Quote {
                    price: spot.price,
                    change_24h_percent: spot.change_24h_percent,
                    observed_at: Utc::now(),
                }));
            }
            Ok(_) => debug!("discarding superseded quote response"),
            Err(err) => {
                warn!(error = %err, "quote fetch failed");
                if self.quote_seq.is_current(request) {
                    self.state.apply(StateEvent::QuoteFailed {
                        detail: err.to_string(),
                    });
                }
            }
        }
    }

    /// Manual retry affordance; same fetch as the timer path
    pub async fn retry_quote(&mut self) {
        self.refresh_quote().await;
    }

    /// Refresh the short-term series for the current timeframe.
    /// On failure the prior series stays as-is and no user-facing error is
    /// surfaced; the quote path is deliberately the louder one.
    pub async fn refresh_series(&mut self) {
        let request = self.series_seq.begin();
        let days = self.state.timeframe.days();

        match self.source.price_series(days).await {
            Ok(points) if self.series_seq.is_current(request) => {
                debug!(days, points = points.len(), "short-term series refreshed");
                self.state.apply(StateEvent::SeriesFetched(points));
            }
            Ok(_) => debug!(days, "discarding superseded series response"),
            Err(err) => warn!(error = %err, days, "short-term series fetch failed"),
        }
    }

    /// Select a new timeframe and re-fetch the short-term series
    pub async fn select_timeframe(&mut self, timeframe: Timeframe) {
        if timeframe == self.state.timeframe {
            return;
        }
        self.state.apply(StateEvent::TimeframeSelected(timeframe));
        self.refresh_series().await;
    }

    /// One-shot historical load; never re-armed after the first attempt.
    /// On failure the series stays empty and the view shows an explicit
    /// failure message once the loading flag clears.
    pub async fn load_historical(&mut self) {
        if self.historical_loaded {
            return;
        }
        self.historical_loaded = true;

        self.state.apply(StateEvent::HistoricalStarted);
        match self.source.price_series(self.historical_window_days).await {
            Ok(points) => {
                let history = stats::condense_history(&points, self.downsample_stride);
                debug!(
                    raw = points.len(),
                    downsampled = history.len(),
                    "historical series loaded"
                );
                self.state.apply(StateEvent::HistoricalFetched(history));
            }
            Err(err) => {
                warn!(error = %err, "historical series fetch failed");
                self.state.apply(StateEvent::HistoricalFailed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SpotQuote;
    use crate::error::{DashboardError, Result};
    use crate::types::PricePoint;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    /// Fake source: serves canned data, flips to failure on demand
    #[derive(Default)]
    struct FakeSource {
        fail: AtomicBool,
        series_calls: AtomicU32,
        last_days: AtomicU32,
    }

    #[async_trait]
    impl MarketData for FakeSource {
        async fn spot_quote(&self) -> Result<SpotQuote> {
            if self.fail.load(Ordering::Relaxed) {
                return Err(DashboardError::Status {
                    status: 429,
                    body: "too many requests".to_string(),
                });
            }
            Ok(SpotQuote {
                price: 3000.5,
                change_24h_percent: -2.25,
            })
        }

        async fn price_series(&self, days: u32) -> Result<Vec<PricePoint>> {
            self.series_calls.fetch_add(1, Ordering::Relaxed);
            self.last_days.store(days, Ordering::Relaxed);
            if self.fail.load(Ordering::Relaxed) {
                return Err(DashboardError::Http("connection refused".to_string()));
            }
            if days == 3650 {
                return Ok((0..3650)
                    .map(|i| PricePoint {
                        timestamp_millis: 1_400_000_000_000 + i64::from(i) * 86_400_000,
                        price: 1000.0 + f64::from(i % 100),
                    })
                    .collect());
            }
            Ok(vec![
                PricePoint {
                    timestamp_millis: 1_700_000_000_000,
                    price: 100.0,
                },
                PricePoint {
                    timestamp_millis: 1_700_003_600_000,
                    price: 110.0,
                },
            ])
        }
    }

    fn app(source: FakeSource) -> App<FakeSource> {
        App::new(source, &Config::default())
    }

    #[tokio::test]
    async fn test_startup_populates_state() {
        let mut app = app(FakeSource::default());
        app.startup().await;

        let state = app.state();
        assert!(!state.starting_up);
        assert_eq!(state.quote.as_ref().unwrap().price, 3000.5);
        assert!(state.quote_error.is_none());
        assert_eq!(state.short_term.len(), 2);
        assert_eq!(state.historical.len(), 122);
        assert!(!state.historical_loading);
    }

    #[tokio::test]
    async fn test_startup_swallows_failures() {
        let source = FakeSource::default();
        source.fail.store(true, Ordering::Relaxed);
        let mut app = app(source);
        app.startup().await;

        let state = app.state();
        assert!(!state.starting_up);
        assert!(state.quote.is_none());
        assert!(state.quote_error.as_deref().unwrap().contains("Retrying"));
        assert!(state.short_term.is_empty());
        assert!(state.historical.is_empty());
        assert!(!state.historical_loading);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_displayed_quote() {
        let mut app = app(FakeSource::default());
        app.startup().await;
        assert_eq!(app.state().quote.as_ref().unwrap().price, 3000.5);

        app.source.fail.store(true, Ordering::Relaxed);
        app.refresh_quote().await;

        let state = app.state();
        assert_eq!(state.quote.as_ref().unwrap().price, 3000.5);
        assert!(state.quote_error.as_deref().unwrap().contains("Retrying"));
    }

    #[tokio::test]
    async fn test_timeframe_change_refetches_series() {
        let mut app = app(FakeSource::default());
        app.startup().await;
        assert_eq!(app.source.last_days.load(Ordering::Relaxed), 3650);

        app.select_timeframe(Timeframe::Week).await;
        assert_eq!(app.state().timeframe, Timeframe::Week);
        assert_eq!(app.source.last_days.load(Ordering::Relaxed), 7);

        // Re-selecting the current timeframe is a no-op.
        let calls = app.source.series_calls.load(Ordering::Relaxed);
        app.select_timeframe(Timeframe::Week).await;
        assert_eq!(app.source.series_calls.load(Ordering::Relaxed), calls);
    }

    #[tokio::test]
    async fn test_historical_loads_exactly_once() {
        let mut app = app(FakeSource::default());
        app.startup().await;
        let calls = app.source.series_calls.load(Ordering::Relaxed);

        app.load_historical().await;
        assert_eq!(app.source.series_calls.load(Ordering::Relaxed), calls);
    }

    #[tokio::test]
    async fn test_failed_historical_is_not_retried() {
        let source = FakeSource::default();
        source.fail.store(true, Ordering::Relaxed);
        let mut app = app(source);
        app.startup().await;

        app.source.fail.store(false, Ordering::Relaxed);
        let calls = app.source.series_calls.load(Ordering::Relaxed);
        app.load_historical().await;
        assert_eq!(app.source.series_calls.load(Ordering::Relaxed), calls);
        assert!(app.state().historical.is_empty());
    }
}
