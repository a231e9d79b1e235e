use crate::error::ConfigError;
use crate::settings::{Config, MAX_SMA_WINDOW, MIN_SMA_WINDOW, ViewToggles};
use chrono::NaiveDate;
use core_types::{DateRange, normalize_ticker};
use rust_decimal::Decimal;

/// Everything one render pass needs, fixed before any data is fetched.
///
/// The analytics code only ever reads this; a new interaction builds a new request.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub tickers: Vec<String>,
    pub range: DateRange,
    pub initial_investment: Decimal,
    pub sma_window: usize,
    pub views: ViewToggles,
}

/// Combines the loaded configuration with per-invocation overrides.
#[derive(Debug, Clone)]
pub struct RenderRequestBuilder<'a> {
    config: &'a Config,
    tickers: Vec<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    earliest_available: Option<NaiveDate>,
    initial_investment: Option<Decimal>,
    sma_window: Option<usize>,
    views: Option<ViewToggles>,
}

impl RenderRequest {
    pub fn builder(config: &Config) -> RenderRequestBuilder<'_> {
        RenderRequestBuilder {
            config,
            tickers: Vec::new(),
            start: None,
            end: None,
            earliest_available: None,
            initial_investment: None,
            sma_window: None,
            views: None,
        }
    }
}

impl<'a> RenderRequestBuilder<'a> {
    pub fn tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tickers = tickers.into_iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    pub fn start(mut self, start: Option<NaiveDate>) -> Self {
        self.start = start;
        self
    }

    pub fn end(mut self, end: Option<NaiveDate>) -> Self {
        self.end = end;
        self
    }

    /// Earliest date with data for the first ticker, used when no start is given.
    pub fn earliest_available(mut self, date: NaiveDate) -> Self {
        self.earliest_available = Some(date);
        self
    }

    pub fn initial_investment(mut self, amount: Option<Decimal>) -> Self {
        self.initial_investment = amount;
        self
    }

    pub fn sma_window(mut self, window: Option<usize>) -> Self {
        self.sma_window = window;
        self
    }

    pub fn views(mut self, views: ViewToggles) -> Self {
        self.views = Some(views);
        self
    }

    /// Tickers after normalization and de-duplication, in the order given.
    ///
    /// Falls back to the configured base list when no tickers were supplied.
    pub fn resolved_tickers(&self) -> Result<Vec<String>, ConfigError> {
        let source = if self.tickers.is_empty() {
            &self.config.tickers.base
        } else {
            &self.tickers
        };

        let mut resolved: Vec<String> = Vec::with_capacity(source.len());
        for raw in source {
            let ticker = normalize_ticker(raw)?;
            if !resolved.contains(&ticker) {
                resolved.push(ticker);
            }
        }
        if resolved.is_empty() {
            return Err(ConfigError::ValidationError("no tickers selected".to_string()));
        }
        Ok(resolved)
    }

    /// Validates every field and produces the immutable request.
    pub fn build(self, today: NaiveDate) -> Result<RenderRequest, ConfigError> {
        let tickers = self.resolved_tickers()?;

        let initial_investment = self
            .initial_investment
            .unwrap_or(self.config.defaults.initial_investment);
        if initial_investment <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "initial investment must be positive, got {}",
                initial_investment
            )));
        }

        let sma_window = self.sma_window.unwrap_or(self.config.defaults.sma_window);
        if !(MIN_SMA_WINDOW..=MAX_SMA_WINDOW).contains(&sma_window) {
            return Err(ConfigError::ValidationError(format!(
                "sma window must be between {} and {}, got {}",
                MIN_SMA_WINDOW, MAX_SMA_WINDOW, sma_window
            )));
        }

        let mut end = self.end.unwrap_or(today);
        if end > today {
            tracing::warn!(requested = %end, %today, "End date is in the future; using today.");
            end = today;
        }
        let start = self
            .start
            .or(self.earliest_available)
            .unwrap_or(self.config.defaults.fallback_start_date);
        let range = DateRange::new(start, end)?;

        Ok(RenderRequest {
            tickers,
            range,
            initial_investment,
            sma_window,
            views: self.views.unwrap_or(self.config.views),
        })
    }
}
