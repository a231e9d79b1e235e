use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{DateRange, PriceSeries};

pub mod cache;
pub mod error;
pub mod file_source;
pub mod responses;
pub mod yahoo;
// --- Public API ---
pub use cache::{EmptyReason, FetchOutcome, MarketData};
pub use file_source::FileSource;
pub use yahoo::YahooClient;

/// The generic, abstract interface for a source of daily price history.
/// The dashboard only talks to this trait, allowing the underlying
/// implementation (remote provider, local files or a mock) to be swapped out.
#[async_trait]
pub trait MarketDataFetcher: Send + Sync {
    /// Fetches daily adjusted closes for `ticker` within `range` (end exclusive).
    ///
    /// "No data" is an empty series, not an error.
    async fn fetch_prices(&self, ticker: &str, range: &DateRange) -> Result<PriceSeries, ApiError>;

    /// The earliest date for which the source has data for `ticker`.
    async fn earliest_date(&self, ticker: &str) -> Result<NaiveDate, ApiError>;
}

#[async_trait]
impl<F: MarketDataFetcher + ?Sized> MarketDataFetcher for Box<F> {
    async fn fetch_prices(&self, ticker: &str, range: &DateRange) -> Result<PriceSeries, ApiError> {
        (**self).fetch_prices(ticker, range).await
    }

    async fn earliest_date(&self, ticker: &str) -> Result<NaiveDate, ApiError> {
        (**self).earliest_date(ticker).await
    }
}
