use analytics::{LeaderboardRow, MetricsFrame};
use rust_decimal::Decimal;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const LEADERBOARD_HEADER: [&str; 6] = [
    "Ticker",
    "Return (%)",
    "Final Value",
    "Annualized Return (%)",
    "Annualized Volatility (%)",
    "Sharpe Ratio",
];

/// Two decimal places, or an empty field when undefined.
pub fn cell(value: Option<Decimal>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

fn float_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes the leaderboard as CSV. Undefined figures, such as the Sharpe
/// sentinel, are written as empty fields.
pub fn write_leaderboard<W: io::Write>(writer: W, rows: &[LeaderboardRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(LEADERBOARD_HEADER)?;
    for row in rows.iter().map(LeaderboardRow::rounded) {
        wtr.write_record([
            row.ticker,
            cell(row.return_pct),
            cell(row.final_value),
            cell(row.annualized_return_pct),
            cell(row.annualized_volatility_pct),
            cell(row.sharpe_ratio),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_leaderboard_file(path: &Path, rows: &[LeaderboardRow]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_leaderboard(fs::File::create(path)?, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Leaderboard exported.");
    Ok(())
}

/// Writes a full metrics frame, one line per date, for charting elsewhere.
pub fn write_frame<W: io::Write>(writer: W, frame: &MetricsFrame) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let sma_column = format!("sma_{}", frame.sma_window());
    wtr.write_record([
        "date",
        "close",
        "daily_return",
        "cumulative_return",
        "running_peak",
        "drawdown",
        sma_column.as_str(),
        "rolling_volatility",
    ])?;
    for row in frame.rows() {
        wtr.write_record([
            row.date.to_string(),
            row.close.to_string(),
            float_cell(row.daily_return),
            row.cumulative_return.to_string(),
            row.running_peak.to_string(),
            row.drawdown.to_string(),
            float_cell(row.moving_average),
            float_cell(row.rolling_volatility),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `<dir>/<TICKER>_metrics.csv` and returns its path.
pub fn write_frame_file(dir: &Path, frame: &MetricsFrame) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_metrics.csv", frame.ticker()));
    write_frame(fs::File::create(&path)?, frame)?;
    tracing::debug!(path = %path.display(), "Metrics frame written.");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{Aggregator, MetricsEngine};
    use chrono::{Duration, NaiveDate};
    use core_types::PriceSeries;
    use rust_decimal_macros::dec;

    fn frame(ticker: &str, closes: &[f64]) -> MetricsFrame {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = PriceSeries::from_raw(
            ticker,
            closes
                .iter()
                .enumerate()
                .map(|(i, c)| (start + Duration::days(i as i64), Some(*c))),
        );
        MetricsEngine::new().derive(&series, 10)
    }

    #[test]
    fn leaderboard_csv_writes_sentinel_as_empty_field() {
        let frames = vec![frame("UP", &[100.0, 110.0, 99.0]), frame("FLAT", &[5.0, 5.0, 5.0])];
        let rows = Aggregator::new().leaderboard(&frames, dec!(1000)).unwrap();

        let mut buf = Vec::new();
        write_leaderboard(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Ticker,Return (%),Final Value,Annualized Return (%),Annualized Volatility (%),Sharpe Ratio"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines.contains(&"FLAT,0.00,1000.00,0.00,0.00,"));
        assert!(lines.iter().any(|l| l.starts_with("UP,-1.00,990.00,")));
    }

    #[test]
    fn leaderboard_file_matches_the_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.csv");
        let rows = Aggregator::new()
            .leaderboard(&[frame("UP", &[100.0, 110.0, 99.0])], dec!(1000))
            .unwrap();

        write_leaderboard_file(&path, &rows).unwrap();

        let mut buf = Vec::new();
        write_leaderboard(&mut buf, &rows).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), buf);
    }

    #[test]
    fn frame_file_has_one_line_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_frame_file(dir.path(), &frame("PLTR", &[1.0, 2.0, 3.0])).unwrap();

        assert!(path.ends_with("PLTR_metrics.csv"));
        let text = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("sma_10"));
        assert_eq!(lines[1], "2024-01-01,1,,1,1,0,,");
    }
}
