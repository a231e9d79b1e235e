use crate::TRADING_DAYS_PER_YEAR;
use crate::engine::{mean, sample_std};
use crate::error::AnalyticsError;
use crate::frame::MetricsFrame;
use crate::report::{AnnualReturnRow, LeaderboardRow};
use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;

/// Reduces per-ticker frames into the cross-ticker views.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    periods_per_year: u32,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranks tickers by annualized return, highest first.
    ///
    /// Frames with fewer than two valid closes are left out. The sort is stable,
    /// so equal returns keep the order of `frames`.
    pub fn leaderboard(
        &self,
        frames: &[MetricsFrame],
        investment: Decimal,
    ) -> Result<Vec<LeaderboardRow>, AnalyticsError> {
        let investment = investment_as_f64(investment)?;
        let periods = f64::from(self.periods_per_year);

        let mut rows: Vec<LeaderboardRow> = frames
            .iter()
            .filter_map(|frame| {
                if frame.valid_price_count() < 2 {
                    tracing::debug!(ticker = frame.ticker(), "Skipping ticker from leaderboard.");
                    return None;
                }
                let first = frame.first()?.close;
                let last = frame.last()?.close;
                let growth = last / first;

                let returns: Vec<f64> = frame.daily_returns().collect();
                let annualized_return = mean(&returns) * periods;
                let annualized_volatility = sample_std(&returns).map(|sd| sd * periods.sqrt());
                let sharpe_ratio = match annualized_volatility {
                    Some(vol) if vol != 0.0 => Some(annualized_return / vol),
                    _ => None,
                };

                Some(LeaderboardRow {
                    ticker: frame.ticker().to_string(),
                    total_return_pct: (growth - 1.0) * 100.0,
                    final_value: investment * growth,
                    annualized_return,
                    annualized_volatility,
                    sharpe_ratio,
                })
            })
            .collect();

        rows.sort_by(|a, b| b.annualized_return.total_cmp(&a.annualized_return));
        Ok(rows)
    }

    /// Compounded return per (ticker, calendar year), in ticker order then year order.
    ///
    /// The first row of a frame has no daily return and contributes a factor of 1,
    /// so a year holding only that row reports 0 %.
    pub fn annual_returns(&self, frames: &[MetricsFrame]) -> Vec<AnnualReturnRow> {
        let mut out = Vec::new();

        for frame in frames.iter().filter(|f| f.valid_price_count() >= 2) {
            let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
            for row in frame.rows() {
                let r = row.daily_return.unwrap_or(0.0);
                let acc = by_year.entry(row.date.year()).or_insert(0.0);
                // (1 + acc)(1 + r) - 1, kept in excess form so a single day is exact.
                *acc = *acc + r + *acc * r;
            }

            out.extend(by_year.into_iter().map(|(year, compounded_return)| AnnualReturnRow {
                ticker: frame.ticker().to_string(),
                year,
                compounded_return,
            }));
        }

        out
    }
}

pub(crate) fn investment_as_f64(investment: Decimal) -> Result<f64, AnalyticsError> {
    match investment.to_f64() {
        Some(value) if value > 0.0 && value.is_finite() => Ok(value),
        _ => Err(AnalyticsError::InvalidInvestment(investment.to_string())),
    }
}
