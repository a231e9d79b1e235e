use crate::cli::SelectionArgs;
use analytics::{Analysis, MetricsEngine, MetricsFrame};
use api_client::{EmptyReason, FetchOutcome, MarketData, MarketDataFetcher};
use chrono::NaiveDate;
use configuration::{Config, RenderRequest, ViewToggles};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};

/// Per-ticker result of a render pass.
#[derive(Debug, Clone)]
pub enum TickerStatus {
    Ready(MetricsFrame),
    /// Nothing to show; the text is the warning printed in place of the ticker.
    Skipped(String),
}

/// One fetch-and-derive cycle over every selected ticker.
#[derive(Debug, Clone)]
pub struct RenderPass {
    pub request: RenderRequest,
    pub tickers: Vec<(String, TickerStatus)>,
}

impl RenderPass {
    /// Builds the request, fetches every ticker concurrently and derives its metrics.
    ///
    /// Tickers without data are recorded as skipped; they never fail the pass.
    pub async fn run<F: MarketDataFetcher>(
        market: &MarketData<F>,
        config: &Config,
        selection: &SelectionArgs,
        views: Option<ViewToggles>,
        today: NaiveDate,
    ) -> anyhow::Result<Self> {
        let mut builder = RenderRequest::builder(config)
            .tickers(&selection.tickers)
            .start(selection.from)
            .end(selection.to)
            .initial_investment(selection.investment)
            .sma_window(selection.sma_window);
        if let Some(views) = views {
            builder = builder.views(views);
        }
        if selection.from.is_none() {
            let tickers = builder.resolved_tickers()?;
            let earliest = market.earliest_date(&tickers[0]).await;
            builder = builder.earliest_available(earliest);
        }
        let request = builder.build(today)?;

        tracing::info!(
            tickers = request.tickers.len(),
            start = %request.range.start(),
            end = %request.range.end(),
            sma_window = request.sma_window,
            "Starting render pass."
        );

        let progress_bar = ProgressBar::new(request.tickers.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );

        let range = request.range;
        let outcomes = join_all(request.tickers.iter().map(|ticker| {
            let pb = progress_bar.clone();
            async move {
                pb.set_message(format!("Fetching {}...", ticker));
                let outcome = market.fetch(ticker, &range).await;
                pb.inc(1);
                outcome
            }
        }))
        .await;
        progress_bar.finish_and_clear();

        let engine = MetricsEngine::new();
        let tickers = request
            .tickers
            .iter()
            .cloned()
            .zip(outcomes)
            .map(|(ticker, outcome)| {
                let status = derive(&engine, &ticker, outcome, request.sma_window);
                (ticker, status)
            })
            .collect();

        Ok(Self { request, tickers })
    }

    /// Frames of the tickers that have data, in selection order.
    pub fn frames(&self) -> Vec<MetricsFrame> {
        self.tickers
            .iter()
            .filter_map(|(_, status)| match status {
                TickerStatus::Ready(frame) => Some(frame.clone()),
                TickerStatus::Skipped(_) => None,
            })
            .collect()
    }
}

fn derive(engine: &MetricsEngine, ticker: &str, outcome: FetchOutcome, sma_window: usize) -> TickerStatus {
    match outcome {
        FetchOutcome::Data(series) => match engine.analyze(&series, sma_window) {
            Analysis::Ready(frame) => TickerStatus::Ready(frame),
            Analysis::Empty { valid_points, .. } => {
                tracing::warn!(ticker, valid_points, "Not enough prices; skipping.");
                TickerStatus::Skipped(format!("No valid data for {}.", ticker))
            }
        },
        FetchOutcome::Empty(EmptyReason::NoData) => {
            tracing::warn!(ticker, "No data in range; skipping.");
            TickerStatus::Skipped(format!("No valid data for {}.", ticker))
        }
        FetchOutcome::Empty(EmptyReason::Failed(reason)) => {
            TickerStatus::Skipped(format!("No valid data for {} ({}).", ticker, reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::FileSource;
    use std::path::Path;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn write_prices(dir: &Path, ticker: &str, closes: &[f64]) {
        let mut body = String::from("date,close\n");
        let start = d(2024, 1, 1);
        for (i, close) in closes.iter().enumerate() {
            let date = start + chrono::Duration::days(i as i64);
            body.push_str(&format!("{},{}\n", date, close));
        }
        std::fs::write(dir.join(format!("{ticker}.csv")), body).unwrap();
    }

    #[tokio::test]
    async fn skipped_tickers_do_not_stop_the_pass() {
        let dir = tempfile::tempdir().unwrap();
        write_prices(dir.path(), "AAA", &[10.0, 11.0, 12.0, 11.5]);
        write_prices(dir.path(), "ONE", &[5.0]);

        let market = MarketData::new(FileSource::new(dir.path()), d(2012, 1, 1));
        let selection = SelectionArgs {
            tickers: vec!["aaa".to_string(), "missing".to_string(), "one".to_string()],
            ..SelectionArgs::default()
        };

        let pass = RenderPass::run(&market, &Config::default(), &selection, None, d(2024, 6, 1))
            .await
            .unwrap();

        // The first ticker's file decides the default start date.
        assert_eq!(pass.request.range.start(), d(2024, 1, 1));
        assert_eq!(pass.tickers.len(), 3);
        assert!(matches!(pass.tickers[0].1, TickerStatus::Ready(ref f) if f.len() == 4));
        assert!(matches!(pass.tickers[1].1, TickerStatus::Skipped(_)));
        assert!(matches!(pass.tickers[2].1, TickerStatus::Skipped(_)));
        assert_eq!(pass.frames().len(), 1);
    }

    #[tokio::test]
    async fn invalid_selection_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let market = MarketData::new(FileSource::new(dir.path()), d(2012, 1, 1));
        let selection = SelectionArgs {
            tickers: vec!["AAA".to_string()],
            sma_window: Some(3),
            from: Some(d(2024, 1, 1)),
            ..SelectionArgs::default()
        };

        let result = RenderPass::run(&market, &Config::default(), &selection, None, d(2024, 6, 1)).await;
        assert!(result.is_err());
    }
}
