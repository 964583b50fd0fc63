//! Dashboard state container
//!
//! All view-facing state lives in a single record mutated only through
//! discrete [`StateEvent`] transitions, one per fetch outcome. This keeps
//! the reconciliation logic unit-testable without a rendering environment.

use crate::types::{HistoricalPoint, PricePoint, Quote, Timeframe};

/// Render-ready state shared by all fetchers.
///
/// Each fetcher owns a disjoint slice; mutation happens only on the single
/// event-loop thread, so no locking is needed.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Last accepted quote; kept across failed refreshes
    pub quote: Option<Quote>,

    /// User-visible quote refresh error, cleared on the next success
    pub quote_error: Option<String>,

    /// Short-term series for the selected timeframe, replaced atomically
    pub short_term: Vec<PricePoint>,

    /// Current short-term window selection
    pub timeframe: Timeframe,

    /// Downsampled ~10-year history; empty after a failed load
    pub historical: Vec<HistoricalPoint>,

    /// True while the one-shot historical fetch is in flight
    pub historical_loading: bool,

    /// True until the startup sequence has run all three fetchers
    pub starting_up: bool,
}

impl DashboardState {
    /// Initial state before any fetch has run
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            quote: None,
            quote_error: None,
            short_term: Vec::new(),
            timeframe,
            historical: Vec::new(),
            historical_loading: false,
            starting_up: true,
        }
    }

    /// Apply one state transition
    pub fn apply(&mut self, event: StateEvent) {
        match event {
            StateEvent::QuoteFetched(quote) => {
                self.quote = Some(quote);
                self.quote_error = None;
            }
            StateEvent::QuoteFailed { detail } => {
                // Keep the last-known quote; only the error message changes.
                self.quote_error = Some(format!("Price update failed: {detail}. Retrying..."));
            }
            StateEvent::SeriesFetched(points) => {
                self.short_term = points;
            }
            StateEvent::TimeframeSelected(timeframe) => {
                self.timeframe = timeframe;
            }
            StateEvent::HistoricalStarted => {
                self.historical_loading = true;
            }
            StateEvent::HistoricalFetched(points) => {
                self.historical = points;
                self.historical_loading = false;
            }
            StateEvent::HistoricalFailed => {
                // Series stays empty; the view shows an explicit failure
                // message once loading clears.
                self.historical_loading = false;
            }
            StateEvent::StartupFinished => {
                self.starting_up = false;
            }
        }
    }
}

/// One transition per fetch outcome or user action
#[derive(Debug, Clone)]
pub enum StateEvent {
    QuoteFetched(Quote),
    QuoteFailed { detail: String },
    SeriesFetched(Vec<PricePoint>),
    TimeframeSelected(Timeframe),
    HistoricalStarted,
    HistoricalFetched(Vec<HistoricalPoint>),
    HistoricalFailed,
    StartupFinished,
}

/// Monotonically increasing request sequence for one fetcher.
///
/// A completing fetch commits its result only if no newer request was
/// issued since it began, so a late-arriving response can never clobber
/// a more recent one.
#[derive(Debug, Default)]
pub struct RequestSeq {
    issued: u64,
}

impl RequestSeq {
    /// Start a new request, superseding any in flight
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether a request is still the newest one issued
    pub fn is_current(&self, id: u64) -> bool {
        id == self.issued
    }
}
