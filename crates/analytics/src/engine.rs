use crate::frame::{Analysis, MetricsFrame, MetricsRow};
use crate::{TRADING_DAYS_PER_YEAR, VOLATILITY_WINDOW};
use core_types::PriceSeries;

/// A stateless calculator deriving per-row analytics from a daily price series.
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine {
    volatility_window: usize,
    periods_per_year: u32,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            volatility_window: VOLATILITY_WINDOW,
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volatility_window(mut self, window: usize) -> Self {
        self.volatility_window = window;
        self
    }

    pub fn volatility_window(&self) -> usize {
        self.volatility_window
    }

    /// Derives the full metrics frame.
    ///
    /// An empty series gives an empty frame. Closes must be positive, which
    /// `PriceSeries` guarantees at construction.
    ///
    /// # Arguments
    ///
    /// * `series` - The daily closes of one ticker.
    /// * `sma_window` - Trailing window of the moving average, in rows.
    pub fn derive(&self, series: &PriceSeries, sma_window: usize) -> MetricsFrame {
        let points = series.points();
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        let daily_returns = daily_returns(&closes);
        let annualizer = f64::from(self.periods_per_year).sqrt();

        let mut rows = Vec::with_capacity(points.len());
        let mut cumulative = 1.0;
        let mut peak = f64::NEG_INFINITY;

        for (i, point) in points.iter().enumerate() {
            let daily_return = daily_returns[i];
            // The first row has no return; it seeds the product at exactly 1.
            if let Some(r) = daily_return {
                cumulative *= 1.0 + r;
            }
            peak = peak.max(cumulative);

            rows.push(MetricsRow {
                date: point.date,
                close: point.close,
                daily_return,
                cumulative_return: cumulative,
                running_peak: peak,
                drawdown: cumulative / peak - 1.0,
                moving_average: trailing_mean(&closes, i, sma_window),
                rolling_volatility: self
                    .trailing_volatility(&daily_returns, i)
                    .map(|sd| sd * annualizer),
            });
        }

        MetricsFrame::new(series.ticker().to_string(), sma_window, rows)
    }

    /// Derives the frame, tagging series with fewer than two closes as `Empty`.
    pub fn analyze(&self, series: &PriceSeries, sma_window: usize) -> Analysis {
        if series.valid_len() < 2 {
            tracing::debug!(
                ticker = series.ticker(),
                valid_points = series.valid_len(),
                "Not enough prices to analyze."
            );
            return Analysis::Empty {
                ticker: series.ticker().to_string(),
                valid_points: series.valid_len(),
            };
        }
        Analysis::Ready(self.derive(series, sma_window))
    }

    /// Sample deviation of the `volatility_window` returns ending at row `i`.
    ///
    /// Row 0 has no return, so the first defined value is at `i == window`.
    fn trailing_volatility(&self, returns: &[Option<f64>], i: usize) -> Option<f64> {
        let window = self.volatility_window;
        if window < 2 || i < window {
            return None;
        }
        let values: Option<Vec<f64>> = returns[i + 1 - window..=i].iter().copied().collect();
        sample_std(&values?)
    }
}

/// `close[i] / close[i-1] - 1`, with `None` for the first row.
fn daily_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return returns;
    }
    returns.push(None);
    returns.extend(closes.windows(2).map(|w| Some(w[1] / w[0] - 1.0)));
    returns
}

/// Arithmetic mean of the `window` closes ending at row `i`.
fn trailing_mean(closes: &[f64], i: usize, window: usize) -> Option<f64> {
    if window == 0 || i + 1 < window {
        return None;
    }
    Some(mean(&closes[i + 1 - window..=i]))
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with the n - 1 denominator. `None` below two values.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    const EPS: f64 = 1e-12;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        PriceSeries::from_raw(
            "TEST",
            closes
                .iter()
                .enumerate()
                .map(|(i, c)| (start + Duration::days(i as i64), Some(*c))),
        )
    }

    /// A deterministic, wiggly price path.
    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 10.0 * (i as f64 * 0.37).sin() + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn worked_example_matches_hand_calculation() {
        let frame = MetricsEngine::new().derive(&series(&[100.0, 110.0, 99.0]), 2);
        let rows = frame.rows();

        assert_eq!(rows[0].daily_return, None);
        assert!((rows[1].daily_return.unwrap() - 0.1).abs() < EPS);
        assert!((rows[2].daily_return.unwrap() + 0.1).abs() < EPS);

        let cumulative: Vec<f64> = rows.iter().map(|r| r.cumulative_return).collect();
        assert_eq!(cumulative[0], 1.0);
        assert!((cumulative[1] - 1.1).abs() < EPS);
        assert!((cumulative[2] - 0.99).abs() < EPS);

        assert!((rows[2].running_peak - 1.1).abs() < EPS);
        assert_eq!(rows[0].drawdown, 0.0);
        assert_eq!(rows[1].drawdown, 0.0);
        assert!((rows[2].drawdown + 0.1).abs() < EPS);
    }

    #[test]
    fn frame_is_aligned_with_source() {
        let source = series(&wave(75));
        let frame = MetricsEngine::new().derive(&source, 20);

        assert_eq!(frame.len(), source.valid_len());
        for (row, point) in frame.rows().iter().zip(source.points()) {
            assert_eq!(row.date, point.date);
            assert_eq!(row.close, point.close);
        }
    }

    #[test]
    fn first_cumulative_return_is_one_regardless_of_price() {
        for first in [0.01, 1.0, 37_000.0] {
            let frame = MetricsEngine::new().derive(&series(&[first, first * 2.0]), 10);
            assert_eq!(frame.rows()[0].cumulative_return, 1.0);
        }
    }

    #[test]
    fn drawdown_never_positive() {
        let frame = MetricsEngine::new().derive(&series(&wave(120)), 10);
        assert!(frame.rows().iter().all(|r| r.drawdown <= 0.0));
        assert!(frame.rows().iter().any(|r| r.drawdown < 0.0));
    }

    #[test]
    fn moving_average_defined_from_window_minus_one() {
        let closes = wave(40);
        let w = 10;
        let frame = MetricsEngine::new().derive(&series(&closes), w);

        for (i, row) in frame.rows().iter().enumerate() {
            if i + 1 < w {
                assert_eq!(row.moving_average, None, "row {i}");
            } else {
                let expected = closes[i + 1 - w..=i].iter().sum::<f64>() / w as f64;
                assert!((row.moving_average.unwrap() - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn moving_average_longer_than_series_is_undefined_everywhere() {
        let frame = MetricsEngine::new().derive(&series(&wave(15)), 200);
        assert!(frame.rows().iter().all(|r| r.moving_average.is_none()));
    }

    #[test]
    fn rolling_volatility_starts_at_row_thirty() {
        let closes = wave(60);
        let frame = MetricsEngine::new().derive(&series(&closes), 10);
        let rows = frame.rows();

        assert!(rows[..30].iter().all(|r| r.rolling_volatility.is_none()));

        for i in 30..rows.len() {
            let window: Vec<f64> = (i - 29..=i)
                .map(|k| closes[k] / closes[k - 1] - 1.0)
                .collect();
            let m = window.iter().sum::<f64>() / 30.0;
            let var = window.iter().map(|r| (r - m).powi(2)).sum::<f64>() / 29.0;
            let expected = var.sqrt() * 252f64.sqrt();
            assert!((rows[i].rolling_volatility.unwrap() - expected).abs() < 1e-9, "row {i}");
        }
    }

    #[test]
    fn flat_prices_have_zero_volatility() {
        let frame = MetricsEngine::new().derive(&series(&[50.0; 40]), 10);
        assert_eq!(frame.last().unwrap().rolling_volatility, Some(0.0));
    }

    #[test]
    fn metrics_do_not_look_ahead() {
        let closes = wave(80);
        let engine = MetricsEngine::new();
        let full = engine.derive(&series(&closes), 20);
        let prefix = engine.derive(&series(&closes[..50]), 20);

        assert_eq!(&full.rows()[..50], prefix.rows());
    }

    #[test]
    fn empty_series_gives_empty_frame() {
        let engine = MetricsEngine::new();
        let empty = PriceSeries::empty("NONE");

        assert!(engine.derive(&empty, 200).is_empty());
        assert_eq!(
            engine.analyze(&empty, 200),
            Analysis::Empty {
                ticker: "NONE".to_string(),
                valid_points: 0
            }
        );
    }

    #[test]
    fn single_price_is_tagged_empty() {
        let analysis = MetricsEngine::new().analyze(&series(&[10.0]), 10);
        assert!(analysis.frame().is_none());
        assert_eq!(analysis.ticker(), "TEST");
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        assert_eq!(sample_std(&[1.0]), None);
        let sd = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < EPS);
    }
}
