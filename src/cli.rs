use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use configuration::View;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Daily price analytics for a list of tickers: metrics, leaderboard,
/// simulated investment growth and narrative insights.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Print the view data as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Per-ticker metrics: price, moving average, rolling volatility, drawdown.
    Analyze(AnalyzeArgs),
    /// Rank tickers by annualized return and break returns down by year.
    Leaderboard(LeaderboardArgs),
    /// Growth of the initial investment held in each ticker.
    Simulate(SelectionArgs),
    /// Rule-based outlook for each ticker.
    Insights(SelectionArgs),
    /// Every view enabled in the configuration, in order.
    Dashboard(DashboardArgs),
    /// Show the earliest date with data for a ticker.
    Earliest(EarliestArgs),
}

/// Options shared by every view.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Ticker to include; repeat for several (e.g. -t PLTR -t CW8.PA).
    #[arg(short = 't', long = "ticker")]
    pub tickers: Vec<String>,

    /// First day of the range (YYYY-MM-DD). Defaults to the first ticker's earliest date.
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// End of the range, exclusive (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Amount invested on the first day of the range.
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Moving-average window in days (10-200).
    #[arg(long)]
    pub sma_window: Option<usize>,

    /// Read `<TICKER>.csv` files (date,close) from this directory instead of the network.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Number of most recent rows printed per ticker.
    #[arg(long, default_value_t = 10)]
    pub rows: usize,

    /// Write every ticker's full metrics frame as CSV into this directory.
    #[arg(long)]
    pub series_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct LeaderboardArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Also write the leaderboard to this CSV file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Restrict output to these views; repeat for several.
    #[arg(long = "view", value_enum)]
    pub views: Vec<View>,

    /// Number of most recent rows printed per ticker in the analysis view.
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Args, Debug, Clone)]
pub struct EarliestArgs {
    pub ticker: String,

    /// Read `<TICKER>.csv` files from this directory instead of the network.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}
