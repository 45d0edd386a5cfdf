//! index-prices - daily index prices as a date-aligned CSV
//!
//! Downloads closing price histories (S&P 500 and MSCI World by default),
//! keeps the dates every series traded, and renders them as CSV.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod pricing;
pub mod reports;
pub mod series;
pub mod utils;

pub use error::{PriceError, Result};
pub use pipeline::{build_table, run_export, ExportRequest};
