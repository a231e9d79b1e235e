use crate::MarketDataFetcher;
use crate::error::ApiError;
use crate::responses::ChartResponse;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use configuration::Provider;
use core_types::{DateRange, PriceSeries};
use reqwest::StatusCode;
use std::time::Duration;

/// A concrete implementation of `MarketDataFetcher` backed by the Yahoo chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(provider: &Provider) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(provider.user_agent.clone())
            .timeout(Duration::from_secs(provider.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: provider.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_chart(&self, ticker: &str, query: &[(&str, String)]) -> Result<ChartResponse, ApiError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;
        parse_chart(status, &text)
    }
}

/// The error envelope is returned with a 4xx status, so the body is parsed
/// before the status is checked.
fn parse_chart(status: StatusCode, text: &str) -> Result<ChartResponse, ApiError> {
    match serde_json::from_str::<ChartResponse>(text) {
        Ok(chart) => Ok(chart),
        Err(e) if status.is_success() => Err(ApiError::Deserialization(e.to_string())),
        Err(_) => Err(ApiError::Provider {
            code: status.as_u16().to_string(),
            description: text.chars().take(200).collect(),
        }),
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[async_trait]
impl MarketDataFetcher for YahooClient {
    async fn fetch_prices(&self, ticker: &str, range: &DateRange) -> Result<PriceSeries, ApiError> {
        tracing::debug!(ticker, start = %range.start(), end = %range.end(), "Requesting daily chart.");

        let query = [
            ("period1", unix_midnight(range.start()).to_string()),
            ("period2", unix_midnight(range.end()).to_string()),
            ("interval", "1d".to_string()),
            ("events", "div,split".to_string()),
        ];
        let chart = self.get_chart(ticker, &query).await?;
        chart.into_price_series(ticker, range)
    }

    async fn earliest_date(&self, ticker: &str) -> Result<NaiveDate, ApiError> {
        let query = [("range", "max".to_string()), ("interval", "3mo".to_string())];
        let chart = self.get_chart(ticker, &query).await?;
        chart
            .first_trade_date()?
            .ok_or_else(|| ApiError::InvalidData(format!("{}: no first trade date", ticker)))
    }
}
