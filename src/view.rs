//! Text rendering of the dashboard state
//!
//! Thin presentation layer: derives every display value from
//! [`DashboardState`] and returns a plain string. No terminal control, no
//! chart library; the charts are unicode sparklines.

use crate::state::DashboardState;
use crate::stats;
use crate::types::Timeframe;

const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const MAX_CHART_COLUMNS: usize = 100;

/// Render the full dashboard for the current state
pub fn render(state: &DashboardState, asset_id: &str) -> String {
    if state.starting_up {
        return format!("{asset_id}: loading dashboard...\n");
    }

    let mut out = String::new();
    out.push_str(&format!("── {asset_id} ──\n"));

    match &state.quote {
        Some(quote) => {
            out.push_str(&format!(
                "{}  {}  (as of {})\n",
                format_usd(quote.price),
                format_change(quote.change_24h_percent),
                quote.observed_at.format("%H:%M:%S UTC")
            ));
        }
        None => out.push_str("No price data yet.\n"),
    }

    if let Some(error) = &state.quote_error {
        out.push_str(&format!("! {error}\n"));
    }

    out.push_str(&format!("{}\n", timeframe_selector(state.timeframe)));

    let series_stats = stats::series_stats(&state.short_term);
    out.push_str(&format!(
        "min {}  max {}  mean {}\n",
        format_usd(series_stats.min),
        format_usd(series_stats.max),
        format_usd(series_stats.mean)
    ));

    let prices: Vec<f64> = state.short_term.iter().map(|p| p.price).collect();
    out.push_str(&format!("{}\n", sparkline(&prices)));

    out.push_str("── history (10y) ──\n");
    if state.historical_loading {
        out.push_str("Loading price history...\n");
    } else if state.historical.is_empty() {
        out.push_str("Failed to load price history.\n");
    } else {
        let prices: Vec<f64> = state.historical.iter().map(|p| p.price).collect();
        out.push_str(&format!("{}\n", sparkline(&prices)));
        // First and last labels anchor the x axis.
        let first = &state.historical[0];
        let last = &state.historical[state.historical.len() - 1];
        out.push_str(&format!(
            "{} ({})  …  {} ({})\n",
            first.label,
            format_usd(first.price),
            last.label,
            format_usd(last.price)
        ));
    }

    out
}

/// Timeframe row with the current selection bracketed, e.g. "[24h]  7d  30d"
fn timeframe_selector(selected: Timeframe) -> String {
    Timeframe::ALL
        .iter()
        .map(|tf| {
            if *tf == selected {
                format!("[{}]", tf.label())
            } else {
                format!(" {} ", tf.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a USD amount with thousands separators, e.g. "$3,000.50"
pub fn format_usd(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}${grouped}.{frac:02}")
}

/// Format a 24h percent change with a direction glyph, e.g. "▼ 2.25% (24h)"
pub fn format_change(percent: f64) -> String {
    let arrow = if percent < 0.0 { '▼' } else { '▲' };
    format!("{arrow} {:.2}% (24h)", percent.abs())
}

/// Scale a price series into a one-line unicode sparkline
fn sparkline(prices: &[f64]) -> String {
    if prices.is_empty() {
        return "(no data)".to_string();
    }

    // Bound chart width; strided points keep the overall shape.
    let stride = prices.len().div_ceil(MAX_CHART_COLUMNS).max(1);
    let visible = stats::downsample(prices, stride);

    let min = visible.iter().copied().fold(f64::INFINITY, f64::min);
    let max = visible.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    visible
        .iter()
        .map(|price| {
            if span <= f64::EPSILON {
                SPARK_BARS[3]
            } else {
                let level = ((price - min) / span * 7.0).round() as usize;
                SPARK_BARS[level.min(7)]
            }
        })
        .collect()
}
