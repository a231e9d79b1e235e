use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid investment amount: {0}")]
    InvalidInvestment(String),
}
