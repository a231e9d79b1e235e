use chrono::NaiveDate;
use serde::Serialize;

/// The derived analytics for a single trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsRow {
    pub date: NaiveDate,
    pub close: f64,
    /// Change against the previous close. `None` on the first row.
    pub daily_return: Option<f64>,
    /// Growth of one unit invested at the first close. Exactly 1 on the first row.
    pub cumulative_return: f64,
    pub running_peak: f64,
    /// Decline from the running peak, always <= 0.
    pub drawdown: f64,
    pub moving_average: Option<f64>,
    /// Annualized sample deviation of the trailing daily returns.
    pub rolling_volatility: Option<f64>,
}

/// One `MetricsRow` per point of the source series, same order and dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsFrame {
    ticker: String,
    sma_window: usize,
    rows: Vec<MetricsRow>,
}

impl MetricsFrame {
    pub(crate) fn new(ticker: String, sma_window: usize, rows: Vec<MetricsRow>) -> Self {
        Self {
            ticker,
            sma_window,
            rows,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// The moving-average window the frame was derived with.
    pub fn sma_window(&self) -> usize {
        self.sma_window
    }

    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&MetricsRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&MetricsRow> {
        self.rows.last()
    }

    /// Number of rows carrying a usable close.
    pub fn valid_price_count(&self) -> usize {
        self.rows.iter().filter(|r| r.close.is_finite()).count()
    }

    /// The defined daily returns, in date order.
    pub fn daily_returns(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(|r| r.daily_return)
    }

    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first()?.date, self.last()?.date))
    }
}

/// Outcome of running the engine on one ticker.
///
/// `Empty` is the "nothing to show" case: the ticker is skipped with a warning
/// and the rest of the render pass carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Ready(MetricsFrame),
    Empty { ticker: String, valid_points: usize },
}

impl Analysis {
    pub fn ticker(&self) -> &str {
        match self {
            Analysis::Ready(frame) => frame.ticker(),
            Analysis::Empty { ticker, .. } => ticker,
        }
    }

    pub fn frame(&self) -> Option<&MetricsFrame> {
        match self {
            Analysis::Ready(frame) => Some(frame),
            Analysis::Empty { .. } => None,
        }
    }

    pub fn into_frame(self) -> Option<MetricsFrame> {
        match self {
            Analysis::Ready(frame) => Some(frame),
            Analysis::Empty { .. } => None,
        }
    }
}
