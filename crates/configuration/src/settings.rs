use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// Smallest and largest moving-average window accepted from the user.
pub const MIN_SMA_WINDOW: usize = 10;
pub const MAX_SMA_WINDOW: usize = 200;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tickers: Tickers,
    pub defaults: Defaults,
    pub views: ViewToggles,
    pub provider: Provider,
    pub logging: Logging,
}

/// The instruments offered when none are given on the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tickers {
    pub base: Vec<String>,
}

impl Default for Tickers {
    fn default() -> Self {
        Self {
            base: ["BTC-EUR", "ETH-EUR", "CW8.PA", "PLTR", "LQQ.PA", "PUST.PA", "ESE.PA", "CL2.PA"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

/// Values used for a render when the user does not override them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// The amount simulated as invested on the first day of the range.
    pub initial_investment: Decimal,
    /// Trailing window, in rows, of the simple moving average.
    pub sma_window: usize,
    /// Start date used when the earliest-date lookup for a ticker fails.
    pub fallback_start_date: NaiveDate,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            initial_investment: dec!(1000),
            sma_window: MAX_SMA_WINDOW,
            fallback_start_date: NaiveDate::from_ymd_opt(2012, 1, 1).expect("valid calendar date"),
        }
    }
}

/// Which parts of the dashboard are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewToggles {
    pub show_price: bool,
    pub show_volatility: bool,
    pub show_drawdown: bool,
    /// Overlay the moving average on the price output.
    pub show_sma: bool,
    pub show_leaderboard: bool,
    pub show_simulation: bool,
    pub show_insights: bool,
}

impl Default for ViewToggles {
    fn default() -> Self {
        Self {
            show_price: true,
            show_volatility: true,
            show_drawdown: true,
            show_sma: false,
            show_leaderboard: true,
            show_simulation: true,
            show_insights: true,
        }
    }
}

impl ViewToggles {
    pub fn is_enabled(&self, view: View) -> bool {
        match view {
            View::Analysis => self.show_price || self.show_volatility || self.show_drawdown,
            View::Leaderboard => self.show_leaderboard,
            View::Simulation => self.show_simulation,
            View::Insights => self.show_insights,
        }
    }

    /// Restricts the toggles to the given views, leaving per-chart switches untouched.
    pub fn only(mut self, views: &[View]) -> Self {
        if views.is_empty() {
            return self;
        }
        if !views.contains(&View::Analysis) {
            self.show_price = false;
            self.show_volatility = false;
            self.show_drawdown = false;
        }
        self.show_leaderboard &= views.contains(&View::Leaderboard);
        self.show_simulation &= views.contains(&View::Simulation);
        self.show_insights &= views.contains(&View::Insights);
        self
    }
}

/// The four dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum View {
    Analysis,
    Leaderboard,
    Simulation,
    Insights,
}

/// Settings for the remote market-data provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Provider {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for Provider {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
