use crate::frame::MetricsFrame;
use serde::Serialize;
use std::fmt;

/// Annualized volatility, in percent, below which a ticker counts as stable.
pub const LOW_VOLATILITY_PCT: f64 = 30.0;
/// Drawdown, in percent, above which a ticker counts as recovered.
pub const RECOVERED_DRAWDOWN_PCT: f64 = -10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stability {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recovery {
    Recovered,
    Struggled,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trend::Bullish => "bullish",
            Trend::Bearish => "bearish",
        })
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stability::Low => "low",
            Stability::High => "high",
        })
    }
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Recovery::Recovered => "recovered",
            Recovery::Struggled => "struggled",
        })
    }
}

/// Rule-based reading of the latest row of a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub ticker: String,
    pub latest_close: f64,
    pub sma_window: usize,
    pub sma: Option<f64>,
    pub drawdown_pct: f64,
    pub volatility_pct: Option<f64>,
    pub trend: Trend,
    pub stability: Stability,
    pub recovery: Recovery,
}

impl Insight {
    /// Classifies the last row. `None` when the frame has fewer than two closes.
    ///
    /// An undefined moving average reads as bearish and an undefined volatility
    /// as high: neither comparison can succeed without a value.
    pub fn from_frame(frame: &MetricsFrame) -> Option<Self> {
        if frame.valid_price_count() < 2 {
            return None;
        }
        let last = frame.last()?;
        let drawdown_pct = last.drawdown * 100.0;
        let volatility_pct = last.rolling_volatility.map(|v| v * 100.0);

        let trend = match last.moving_average {
            Some(sma) if last.close > sma => Trend::Bullish,
            _ => Trend::Bearish,
        };
        let stability = match volatility_pct {
            Some(vol) if vol < LOW_VOLATILITY_PCT => Stability::Low,
            _ => Stability::High,
        };
        let recovery = if drawdown_pct > RECOVERED_DRAWDOWN_PCT {
            Recovery::Recovered
        } else {
            Recovery::Struggled
        };

        Some(Self {
            ticker: frame.ticker().to_string(),
            latest_close: last.close,
            sma_window: frame.sma_window(),
            sma: last.moving_average,
            drawdown_pct,
            volatility_pct,
            trend,
            stability,
            recovery,
        })
    }

    /// The one-paragraph summary shown under the figures.
    pub fn narrative(&self) -> String {
        format!(
            "{} has {} recently, with a drawdown of {:.2}%. The price is {} relative to its \
             SMA, and volatility is {}, suggesting a {} outlook under current conditions.",
            self.ticker,
            self.recovery,
            self.drawdown_pct,
            self.trend,
            self.stability,
            self.trend
        )
    }
}
