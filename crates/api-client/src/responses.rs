use crate::error::ApiError;
use chrono::{DateTime, NaiveDate};
use core_types::{DateRange, PriceSeries};
use serde::Deserialize;

// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.

/// The envelope of a `GET /v8/finance/chart/{symbol}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    // Absent when the range holds no trading days.
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub first_trade_date: Option<i64>,
    /// Seconds east of UTC for the listing exchange.
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    pub adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

impl ChartResponse {
    /// Surfaces a provider-side error and returns the single result, if any.
    fn into_result(self) -> Result<Option<ChartResult>, ApiError> {
        if let Some(error) = self.chart.error {
            return Err(ApiError::Provider {
                code: error.code,
                description: error.description,
            });
        }
        Ok(self.chart.result.and_then(|r| r.into_iter().next()))
    }

    /// Converts the response into a daily series of adjusted closes within `range`.
    ///
    /// Adjusted closes are used when present, raw closes otherwise. Timestamps are
    /// shifted into the exchange's local time before taking the calendar date.
    pub fn into_price_series(self, ticker: &str, range: &DateRange) -> Result<PriceSeries, ApiError> {
        let Some(result) = self.into_result()? else {
            return Ok(PriceSeries::empty(ticker));
        };
        let Some(timestamps) = result.timestamp else {
            return Ok(PriceSeries::empty(ticker));
        };

        let closes = match result.indicators.adjclose.and_then(|a| a.into_iter().next()) {
            Some(adj) => adj.adjclose,
            None => result
                .indicators
                .quote
                .into_iter()
                .next()
                .map(|q| q.close)
                .unwrap_or_default(),
        };

        if closes.len() != timestamps.len() {
            return Err(ApiError::InvalidData(format!(
                "{}: {} timestamps but {} closes",
                ticker,
                timestamps.len(),
                closes.len()
            )));
        }

        let offset = result.meta.gmtoffset;
        let rows = timestamps
            .into_iter()
            .zip(closes)
            .map(|(ts, close)| Ok((local_date(ts, offset)?, close)))
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(PriceSeries::from_raw(
            ticker,
            rows.into_iter().filter(|(date, _)| range.contains(*date)),
        ))
    }

    /// The first trading date reported by the provider.
    pub fn first_trade_date(self) -> Result<Option<NaiveDate>, ApiError> {
        let Some(result) = self.into_result()? else {
            return Ok(None);
        };
        let offset = result.meta.gmtoffset;
        let first = result
            .meta
            .first_trade_date
            .or_else(|| result.timestamp.as_ref().and_then(|t| t.first().copied()));
        first.map(|ts| local_date(ts, offset)).transpose()
    }
}

fn local_date(timestamp: i64, gmtoffset: i64) -> Result<NaiveDate, ApiError> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| ApiError::InvalidData(format!("Invalid timestamp: {}", timestamp)))
}
