use crate::MarketDataFetcher;
use chrono::NaiveDate;
use core_types::{DateRange, PriceSeries};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Why a fetch produced nothing to show.
#[derive(Debug, Clone, PartialEq)]
pub enum EmptyReason {
    /// The source has no prices for the ticker in the range.
    NoData,
    /// The request failed; the message is kept for the warning line.
    Failed(String),
}

/// The tagged result of a fetch as seen by the render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Data(Arc<PriceSeries>),
    Empty(EmptyReason),
}

impl FetchOutcome {
    pub fn series(&self) -> Option<&Arc<PriceSeries>> {
        match self {
            FetchOutcome::Data(series) => Some(series),
            FetchOutcome::Empty(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    ticker: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl CacheKey {
    fn new(ticker: &str, range: &DateRange) -> Self {
        Self {
            ticker: ticker.to_string(),
            start: range.start(),
            end: range.end(),
        }
    }
}

/// Session-scoped front for a `MarketDataFetcher`.
///
/// Fetches are memoized by `(ticker, start, end)` for the life of the value,
/// without eviction. Errors never escape: a failed fetch becomes
/// `FetchOutcome::Empty` and is not cached, so the next render retries it.
pub struct MarketData<F> {
    fetcher: F,
    fallback_start: NaiveDate,
    prices: Mutex<HashMap<CacheKey, Arc<PriceSeries>>>,
    earliest: Mutex<HashMap<String, NaiveDate>>,
}

impl<F: MarketDataFetcher> MarketData<F> {
    /// `fallback_start` is returned by `earliest_date` when the lookup fails.
    pub fn new(fetcher: F, fallback_start: NaiveDate) -> Self {
        Self {
            fetcher,
            fallback_start,
            prices: Mutex::new(HashMap::new()),
            earliest: Mutex::new(HashMap::new()),
        }
    }

    pub async fn fetch(&self, ticker: &str, range: &DateRange) -> FetchOutcome {
        let key = CacheKey::new(ticker, range);

        let cached = self.prices.lock().await.get(&key).cloned();
        let series = match cached {
            Some(series) => {
                tracing::trace!(ticker, "Price cache hit.");
                series
            }
            None => match self.fetcher.fetch_prices(ticker, range).await {
                Ok(series) => {
                    let series = Arc::new(series);
                    self.prices.lock().await.insert(key, Arc::clone(&series));
                    series
                }
                Err(e) => {
                    tracing::warn!(ticker, error = %e, "Price fetch failed.");
                    return FetchOutcome::Empty(EmptyReason::Failed(e.to_string()));
                }
            },
        };

        if series.is_empty() {
            FetchOutcome::Empty(EmptyReason::NoData)
        } else {
            FetchOutcome::Data(series)
        }
    }

    /// Earliest available date for `ticker`, or the fallback when the lookup fails.
    pub async fn earliest_date(&self, ticker: &str) -> NaiveDate {
        if let Some(date) = self.earliest.lock().await.get(ticker).copied() {
            return date;
        }
        match self.fetcher.earliest_date(ticker).await {
            Ok(date) => {
                self.earliest.lock().await.insert(ticker.to_string(), date);
                date
            }
            Err(e) => {
                tracing::warn!(
                    ticker,
                    error = %e,
                    fallback = %self.fallback_start,
                    "Earliest-date lookup failed; using fallback."
                );
                self.fallback_start
            }
        }
    }

    /// Number of memoized price requests.
    pub async fn cached_requests(&self) -> usize {
        self.prices.lock().await.len()
    }
}
