use crate::aggregator::investment_as_f64;
use crate::error::AnalyticsError;
use crate::frame::MetricsFrame;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Value over time of an amount invested in a single ticker on the first day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioTrajectory {
    pub ticker: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl PortfolioTrajectory {
    pub fn final_value(&self) -> Option<f64> {
        self.points.last().map(|(_, v)| *v)
    }
}

/// Scales the frame's cumulative return by `investment`.
///
/// Returns `Ok(None)` unless the frame has at least two defined daily returns.
pub fn simulate(
    frame: &MetricsFrame,
    investment: Decimal,
) -> Result<Option<PortfolioTrajectory>, AnalyticsError> {
    let investment = investment_as_f64(investment)?;

    if frame.daily_returns().count() < 2 {
        return Ok(None);
    }

    let points = frame
        .rows()
        .iter()
        .map(|row| (row.date, investment * row.cumulative_return))
        .collect();

    Ok(Some(PortfolioTrajectory {
        ticker: frame.ticker().to_string(),
        points,
    }))
}
