use crate::MarketDataFetcher;
use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{DateRange, PriceSeries};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads daily closes from `<dir>/<TICKER>.csv` files with a `date,close` header.
///
/// A missing file means "no data" for that ticker.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    close: Option<f64>,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }

    /// All rows of the ticker's file, or `None` when the file does not exist.
    async fn read_rows(&self, ticker: &str) -> Result<Option<Vec<(NaiveDate, Option<f64>)>>, ApiError> {
        let path = self.path_for(ticker);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No price file for ticker.");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        parse_rows(&bytes, &path).map(Some)
    }
}

fn parse_rows(bytes: &[u8], path: &Path) -> Result<Vec<(NaiveDate, Option<f64>)>, ApiError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(bytes);
    let mut rows = Vec::new();
    for record in reader.deserialize::<CsvRow>() {
        let row = record?;
        rows.push((row.date, row.close));
    }
    tracing::trace!(path = %path.display(), rows = rows.len(), "Parsed price file.");
    Ok(rows)
}

#[async_trait]
impl MarketDataFetcher for FileSource {
    async fn fetch_prices(&self, ticker: &str, range: &DateRange) -> Result<PriceSeries, ApiError> {
        let rows = self.read_rows(ticker).await?.unwrap_or_default();
        Ok(PriceSeries::from_raw(
            ticker,
            rows.into_iter().filter(|(date, _)| range.contains(*date)),
        ))
    }

    async fn earliest_date(&self, ticker: &str) -> Result<NaiveDate, ApiError> {
        let rows = self.read_rows(ticker).await?.unwrap_or_default();
        PriceSeries::from_raw(ticker, rows)
            .first()
            .map(|p| p.date)
            .ok_or_else(|| ApiError::InvalidData(format!("{}: no prices on file", ticker)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn write(dir: &Path, ticker: &str, body: &str) {
        std::fs::write(dir.join(format!("{ticker}.csv")), body).unwrap();
    }

    #[tokio::test]
    async fn reads_rows_within_range() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "PLTR",
            "date,close\n2024-01-03,17.5\n2024-01-02,17.0\n2024-01-04,\n2024-01-05,18.1\n",
        );
        let source = FileSource::new(dir.path());
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 5)).unwrap();

        let series = source.fetch_prices("PLTR", &range).await.unwrap();
        let closes: Vec<f64> = series.points().iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![17.0, 17.5]);

        assert_eq!(source.earliest_date("PLTR").await.unwrap(), d(2024, 1, 2));
    }

    #[tokio::test]
    async fn missing_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path());
        let range = DateRange::new(d(2024, 1, 1), d(2024, 2, 1)).unwrap();

        assert!(source.fetch_prices("NOPE", &range).await.unwrap().is_empty());
        assert!(source.earliest_date("NOPE").await.is_err());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "BAD", "date,close\nnot-a-date,1.0\n");
        let source = FileSource::new(dir.path());
        let range = DateRange::new(d(2024, 1, 1), d(2024, 2, 1)).unwrap();

        assert!(matches!(
            source.fetch_prices("BAD", &range).await,
            Err(ApiError::Csv(_))
        ));
    }
}
