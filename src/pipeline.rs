//! Export pipeline: fetch every series, align them, optionally turn the
//! prices into rolling returns, render CSV.
//!
//! Network access and the output stream are passed in, so the whole flow
//! runs against in-memory providers in tests.

use std::io::Write;
use tracing::{info, warn};

use crate::error::{PriceError, Result};
use crate::pricing::{fetch_series, PriceProvider};
use crate::reports::{align, resample_daily, rolling_returns, write_csv, write_csv_with_decimals, AlignedTable};
use crate::series::{DateRange, PriceField, SeriesDefinition};
use crate::utils::RETURN_DECIMALS;

/// What to download and how to price it
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub series: Vec<SeriesDefinition>,
    pub range: DateRange,
    pub price_field: PriceField,
    /// Report returns over this many calendar days instead of prices
    pub rolling_returns: Option<usize>,
}

impl ExportRequest {
    pub fn new(series: Vec<SeriesDefinition>, range: DateRange, price_field: PriceField) -> Result<Self> {
        if series.is_empty() {
            return Err(PriceError::Config("no series to export".into()).into());
        }
        Ok(Self {
            series,
            range,
            price_field,
            rolling_returns: None,
        })
    }

    pub fn with_rolling_returns(mut self, period: Option<usize>) -> Self {
        self.rolling_returns = period;
        self
    }

    /// S&P 500 and MSCI World adjusted closes over `range`
    pub fn index_pair(range: DateRange) -> Self {
        Self {
            series: SeriesDefinition::defaults(),
            range,
            price_field: PriceField::AdjustedClose,
            rolling_returns: None,
        }
    }
}

/// Fetch each series in order and join them on date.
///
/// Stops at the first failed or empty fetch.
pub fn build_table(provider: &dyn PriceProvider, request: &ExportRequest) -> Result<AlignedTable> {
    let mut fetched = Vec::with_capacity(request.series.len());
    for definition in &request.series {
        fetched.push(fetch_series(
            provider,
            definition,
            request.range,
            request.price_field,
        )?);
    }

    let table = align(&fetched);
    if table.is_empty() {
        warn!("Series share no trading dates; report will only have a header");
    }
    info!("Aligned {} trading days", table.len());
    Ok(table)
}

/// Build the table and write it as CSV. Nothing is written if a fetch fails.
///
/// With `rolling_returns` set, the aligned prices are resampled to calendar
/// days and each row holds the return over the period ending that day.
pub fn run_export<W: Write>(provider: &dyn PriceProvider, request: &ExportRequest, writer: W) -> Result<usize> {
    let table = build_table(provider, request)?;
    match request.rolling_returns {
        None => {
            write_csv(&table, writer)?;
            Ok(table.len())
        }
        Some(period) => {
            let returns = rolling_returns(&resample_daily(&table)?, period)?;
            info!("Computed {}-day returns for {} days", period, returns.len());
            write_csv_with_decimals(&returns, writer, RETURN_DECIMALS)?;
            Ok(returns.len())
        }
    }
}
