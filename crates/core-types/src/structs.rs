use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily close for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// An ordered series of daily closes for a single ticker.
///
/// Dates are strictly increasing and every close is finite and positive.
/// Non-trading days are simply absent. Once built the series is never mutated;
/// a new range or symbol means a new fetch and a new series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from raw provider rows.
    ///
    /// Rows with a missing, non-finite or non-positive close are dropped, the
    /// remainder is sorted by date and, for a repeated date, the last row wins.
    pub fn from_raw<I>(ticker: impl Into<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let ticker = ticker.into();
        let mut dropped = 0usize;
        let mut points: Vec<PricePoint> = rows
            .into_iter()
            .filter_map(|(date, close)| match close {
                Some(close) if close.is_finite() && close > 0.0 => Some(PricePoint { date, close }),
                _ => {
                    dropped += 1;
                    None
                }
            })
            .collect();

        // Stable sort keeps provider order within a date, so `dedup` below
        // can keep the last occurrence.
        points.sort_by_key(|p| p.date);
        points.reverse();
        points.dedup_by_key(|p| p.date);
        points.reverse();

        if dropped > 0 {
            tracing::debug!(ticker = %ticker, dropped, "Dropped rows without a usable close.");
        }

        Self { ticker, points }
    }

    /// Creates an empty series, the "no data" result of a fetch.
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            points: Vec::new(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of valid closes in the series.
    pub fn valid_len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// The first and last date covered by the series.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first()?.date, self.last()?.date))
    }
}

/// A requested window of daily data. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidInput(
                "date range".to_string(),
                format!("start {} is after end {}", start, end),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Normalizes a user-supplied ticker symbol (trimmed, upper-cased).
pub fn normalize_ticker(raw: &str) -> Result<String, CoreError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(CoreError::InvalidInput(
            "ticker".to_string(),
            "symbol must not be empty".to_string(),
        ));
    }
    if ticker.chars().any(char::is_whitespace) {
        return Err(CoreError::InvalidInput(
            "ticker".to_string(),
            format!("'{}' contains whitespace", raw),
        ));
    }
    Ok(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn from_raw_drops_unusable_closes_and_sorts() {
        let series = PriceSeries::from_raw(
            "PLTR",
            vec![
                (d(2024, 1, 3), Some(12.0)),
                (d(2024, 1, 2), Some(10.0)),
                (d(2024, 1, 4), None),
                (d(2024, 1, 5), Some(f64::NAN)),
                (d(2024, 1, 8), Some(0.0)),
                (d(2024, 1, 9), Some(11.0)),
            ],
        );

        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 9)]);
        assert_eq!(series.valid_len(), 3);
        assert_eq!(series.date_span(), Some((d(2024, 1, 2), d(2024, 1, 9))));
    }

    #[test]
    fn from_raw_keeps_last_row_for_repeated_date() {
        let series = PriceSeries::from_raw(
            "ESE.PA",
            vec![
                (d(2024, 1, 2), Some(10.0)),
                (d(2024, 1, 2), Some(10.5)),
                (d(2024, 1, 3), Some(11.0)),
            ],
        );

        assert_eq!(series.valid_len(), 2);
        assert_eq!(series.points()[0].close, 10.5);
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(d(2024, 2, 1), d(2024, 1, 1)).is_err());
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 1)).unwrap();
        assert!(!range.contains(d(2024, 1, 1)));
    }

    #[test]
    fn tickers_are_upper_cased() {
        assert_eq!(normalize_ticker(" btc-eur ").unwrap(), "BTC-EUR");
        assert!(normalize_ticker("   ").is_err());
        assert!(normalize_ticker("BTC EUR").is_err());
    }
}
