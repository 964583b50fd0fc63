//! Pure computations over price series
//!
//! Derived statistics, downsampling, and historical label formatting.
//! Everything here is O(n) over at most a few thousand points, so results
//! are recomputed on demand rather than cached.

use chrono::DateTime;

use crate::types::{HistoricalPoint, PricePoint, SeriesStats};

/// Min/max/mean over the price field of a series.
///
/// An empty series yields all zeros (not an error).
pub fn series_stats(points: &[PricePoint]) -> SeriesStats {
    if points.is_empty() {
        return SeriesStats::default();
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for point in points {
        min = min.min(point.price);
        max = max.max(point.price);
        sum += point.price;
    }

    SeriesStats {
        min,
        max,
        mean: sum / points.len() as f64,
    }
}

/// Keep every `stride`-th element (indices 0, stride, 2*stride, ...).
///
/// A series of length N yields ceil(N / stride) points.
pub fn downsample<T: Clone>(points: &[T], stride: usize) -> Vec<T> {
    if stride <= 1 {
        return points.to_vec();
    }
    points.iter().step_by(stride).cloned().collect()
}

/// Format an epoch-milliseconds timestamp as month + 2-digit year, e.g. "Nov 23"
pub fn month_year_label(timestamp_millis: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_millis)
        .map(|dt| dt.format("%b %y").to_string())
        .unwrap_or_else(|| "?".to_string())
}

/// Round a price to cents
pub fn round_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Transform a dense daily series into the downsampled historical series:
/// label each point, round to cents, then keep every `stride`-th point.
pub fn condense_history(points: &[PricePoint], stride: usize) -> Vec<HistoricalPoint> {
    let labeled: Vec<HistoricalPoint> = points
        .iter()
        .map(|p| HistoricalPoint {
            label: month_year_label(p.timestamp_millis),
            price: round_cents(p.price),
        })
        .collect();

    downsample(&labeled, stride)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(timestamp_millis: i64, price: f64) -> PricePoint {
        PricePoint {
            timestamp_millis,
            price,
        }
    }

    #[test]
    fn test_stats_empty_series() {
        let stats = series_stats(&[]);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.mean, 0.0);
    }

    #[test]
    fn test_stats_two_points() {
        // Short-term scenario: [[1700000000000, 100], [1700003600000, 110]]
        let series = vec![point(1_700_000_000_000, 100.0), point(1_700_003_600_000, 110.0)];
        let stats = series_stats(&series);
        assert_eq!(stats.min, 100.0);
        assert_eq!(stats.max, 110.0);
        assert_eq!(stats.mean, 105.0);
    }

    #[test]
    fn test_stats_ordering_invariant() {
        let series: Vec<PricePoint> = (0..250)
            .map(|i| point(i64::from(i) * 3_600_000, 90.0 + f64::from(i % 37) * 1.5))
            .collect();
        let stats = series_stats(&series);
        assert!(stats.min <= stats.mean);
        assert!(stats.mean <= stats.max);

        let min = series.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
        let max = series
            .iter()
            .map(|p| p.price)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(stats.min, min);
        assert_eq!(stats.max, max);
    }

    #[test]
    fn test_downsample_keeps_stride_indices() {
        let input: Vec<u32> = (0..100).collect();
        let output = downsample(&input, 30);
        assert_eq!(output, vec![0, 30, 60, 90]);
    }

    #[test]
    fn test_downsample_length_is_ceil() {
        for n in [0usize, 1, 29, 30, 31, 3650] {
            let input: Vec<usize> = (0..n).collect();
            let output = downsample(&input, 30);
            assert_eq!(output.len(), n.div_ceil(30));
        }
    }

    #[test]
    fn test_downsample_ten_years() {
        // 3650 daily points -> 122 chart points (indices 0, 30, ..., 3630)
        let input: Vec<usize> = (0..3650).collect();
        let output = downsample(&input, 30);
        assert_eq!(output.len(), 122);
        assert_eq!(*output.first().unwrap(), 0);
        assert_eq!(*output.last().unwrap(), 3630);
    }

    #[test]
    fn test_month_year_label() {
        // 2023-11-14T22:13:20Z
        assert_eq!(month_year_label(1_700_000_000_000), "Nov 23");
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(3000.504), 3000.5);
        assert_eq!(round_cents(3000.505), 3000.51);
        assert_eq!(round_cents(100.0), 100.0);
    }

    #[test]
    fn test_condense_history() {
        let points: Vec<PricePoint> = (0..90)
            .map(|i| point(1_700_000_000_000 + i64::from(i) * 86_400_000, 100.123 + f64::from(i)))
            .collect();
        let history = condense_history(&points, 30);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].price, 100.12);
        assert_eq!(history[0].label, "Nov 23");
    }
}
