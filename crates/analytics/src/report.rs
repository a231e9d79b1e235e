use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;

/// Cross-ticker summary of return and risk over the selected range.
///
/// Fields keep full precision; `rounded()` produces the presented figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub ticker: String,
    /// `(last / first - 1) * 100`.
    pub total_return_pct: f64,
    /// The initial investment scaled by `last / first`.
    pub final_value: f64,
    /// Mean daily return times 252, as a fraction.
    pub annualized_return: f64,
    /// `None` when fewer than two daily returns exist.
    pub annualized_volatility: Option<f64>,
    /// `None` is the not-a-number sentinel: volatility zero or undefined.
    pub sharpe_ratio: Option<f64>,
}

/// A `LeaderboardRow` as displayed and exported: percentages, 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundedLeaderboardRow {
    pub ticker: String,
    pub return_pct: Option<Decimal>,
    pub final_value: Option<Decimal>,
    pub annualized_return_pct: Option<Decimal>,
    pub annualized_volatility_pct: Option<Decimal>,
    pub sharpe_ratio: Option<Decimal>,
}

impl LeaderboardRow {
    pub fn rounded(&self) -> RoundedLeaderboardRow {
        RoundedLeaderboardRow {
            ticker: self.ticker.clone(),
            return_pct: round2(self.total_return_pct),
            final_value: round2(self.final_value),
            annualized_return_pct: round2(self.annualized_return * 100.0),
            annualized_volatility_pct: self.annualized_volatility.and_then(|v| round2(v * 100.0)),
            sharpe_ratio: self.sharpe_ratio.and_then(round2),
        }
    }
}

/// Compounded return of one ticker over one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualReturnRow {
    pub ticker: String,
    pub year: i32,
    /// `Π(1 + daily_return) - 1` over the year's trading days, as a fraction.
    pub compounded_return: f64,
}

impl AnnualReturnRow {
    /// The compounded return as a percentage, 2 decimal places.
    pub fn return_pct(&self) -> Option<Decimal> {
        round2(self.compounded_return * 100.0)
    }
}

/// Rounds to 2 decimal places, half to even, keeping a scale of 2 so whole
/// numbers serialize as `990.00`. `None` for NaN or infinite input.
pub fn round2(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| {
        let mut rounded = d.round_dp(2);
        rounded.rescale(2);
        rounded
    })
}
