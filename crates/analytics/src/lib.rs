//! # Analytics
//!
//! Turns a daily `PriceSeries` into per-row return and risk metrics, and
//! reduces those metrics into cross-ticker views.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of data
//!   providers or presentation. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** `MetricsEngine` and `Aggregator` hold only
//!   constants. Every call is a pure function of its arguments, so a render pass
//!   can call them per ticker in any order.
//! - **No hard failures for thin data:** fewer than two prices is an
//!   `Analysis::Empty`, a zero volatility is a `None` Sharpe ratio.
//!
//! ## Public API
//!
//! - `MetricsEngine`: derives a `MetricsFrame` from a `PriceSeries`.
//! - `Aggregator`: builds the leaderboard and the calendar-year returns.
//! - `simulate` / `Insight`: the portfolio-growth and narrative views.

// Declare the modules that constitute this crate.
pub mod aggregator;
pub mod engine;
pub mod error;
pub mod frame;
pub mod insights;
pub mod report;
pub mod simulation;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::Aggregator;
pub use engine::MetricsEngine;
pub use error::AnalyticsError;
pub use frame::{Analysis, MetricsFrame, MetricsRow};
pub use insights::{Insight, Recovery, Stability, Trend};
pub use report::{AnnualReturnRow, LeaderboardRow, RoundedLeaderboardRow};
pub use simulation::{PortfolioTrajectory, simulate};

/// Trading days per year used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Trailing window, in rows, of the rolling volatility.
pub const VOLATILITY_WINDOW: usize = 30;
