//! Error handling for index-prices
//!
//! Defines the domain error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation.

use chrono::NaiveDate;
use thiserror::Error;

/// Core error types for the price export pipeline
#[derive(Error, Debug)]
pub enum PriceError {
    #[error("invalid date range: start {start} must precede end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("provider response for {symbol} has no '{column}' column")]
    MissingColumn { symbol: String, column: String },

    #[error("Failed to download price data for {symbol}: no prices returned")]
    EmptySeries { symbol: String },

    #[error("provider error: {0}")]
    Provider(String),

    #[error("invalid report: {0}")]
    InvalidReport(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = anyhow::Result<T>;
