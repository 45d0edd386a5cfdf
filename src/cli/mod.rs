use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::series::PriceField;
use crate::utils::parse_date;

pub mod runner;

pub use runner::{run, to_export_request};

#[derive(Parser, Debug, Default)]
#[command(name = "index-prices")]
#[command(
    version,
    about = "Download S&P 500 and MSCI World daily prices as a date-aligned CSV"
)]
#[command(
    long_about = "Fetch daily closing prices for the configured indices from Yahoo Finance, keep only the dates every index traded, and print them to stdout as CSV (Date,S&P 500,MSCI World by default). Logs go to stderr; set RUST_LOG=info for progress."
)]
pub struct Cli {
    /// First date to include, YYYY-MM-DD (default: 1900-01-01 or config)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Date to stop before, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Closing price column to export
    #[arg(long, value_enum)]
    pub price_field: Option<PriceField>,

    /// Print returns over this many calendar days instead of prices
    #[arg(long, value_name = "DAYS", value_parser = clap::value_parser!(u32).range(1..))]
    pub rolling_returns: Option<u32>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read saved Yahoo chart responses (<SYMBOL>.json) from this directory instead of the network
    #[arg(long)]
    pub chart_dir: Option<PathBuf>,
}
