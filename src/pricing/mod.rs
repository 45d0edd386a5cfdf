// Pricing module - provider abstraction and series extraction

pub mod replay;
pub mod yahoo;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{PriceError, Result};
use crate::series::{price_from_f64, DateRange, PriceField, PriceSeries, SeriesDefinition};

/// Daily history for one symbol as reported by a provider.
///
/// Columns are positional against `dates`; a column the provider did not
/// send at all is `None`, a single missing value inside a column is `None`
/// at that position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub close: Option<Vec<Option<f64>>>,
    pub adjclose: Option<Vec<Option<f64>>>,
}

impl PriceHistory {
    /// Typed accessor for a closing-price column.
    ///
    /// Fails when the provider omitted the column or sent one whose length
    /// does not match the date index.
    pub fn column(&self, field: PriceField) -> Result<&[Option<f64>]> {
        let column = match field {
            PriceField::AdjustedClose => self.adjclose.as_deref(),
            PriceField::Close => self.close.as_deref(),
        }
        .ok_or_else(|| PriceError::MissingColumn {
            symbol: self.symbol.clone(),
            column: field.column_name().to_string(),
        })?;

        if column.len() != self.dates.len() {
            return Err(PriceError::Provider(format!(
                "{} column for {} has {} values for {} dates",
                field.column_name(),
                self.symbol,
                column.len(),
                self.dates.len()
            ))
            .into());
        }
        Ok(column)
    }
}

/// Source of daily price histories
pub trait PriceProvider {
    fn name(&self) -> &str;

    /// Fetch the daily history of `symbol` covering `range`.
    fn fetch_history(&self, symbol: &str, range: DateRange) -> Result<PriceHistory>;
}

/// Fetch one series and extract the requested price column.
///
/// Dates outside `range` are dropped. A series with no usable price is an
/// error: an empty download must never turn into an empty report.
pub fn fetch_series(
    provider: &dyn PriceProvider,
    definition: &SeriesDefinition,
    range: DateRange,
    field: PriceField,
) -> Result<PriceSeries> {
    if definition.symbol.trim().is_empty() {
        return Err(PriceError::Config(format!("series '{}' has no symbol", definition.label)).into());
    }

    info!(
        "Fetching {} ({}) from {} between {} and {}",
        definition.label,
        definition.symbol,
        provider.name(),
        range.start,
        range.end
    );

    let history = provider
        .fetch_history(&definition.symbol, range)
        .with_context(|| format!("Failed to fetch {} ({})", definition.label, definition.symbol))?;

    let mut series = PriceSeries::new(&definition.label, &definition.symbol);
    if !history.dates.is_empty() {
        let column = history.column(field)?;
        for (date, value) in history.dates.iter().zip(column) {
            if range.contains(*date) {
                series.insert(*date, value.and_then(price_from_f64));
            }
        }
    }

    if series.is_empty() {
        warn!("{} returned no rows for {}", provider.name(), definition.symbol);
    } else if series.priced_len() == 0 {
        warn!(
            "{} returned {} rows for {} but none has a {} value",
            provider.name(),
            series.len(),
            definition.symbol,
            field.column_name()
        );
    }

    if series.priced_len() == 0 {
        return Err(PriceError::EmptySeries {
            symbol: definition.symbol.clone(),
        }
        .into());
    }

    debug!(
        "Fetched {} rows ({} priced) for {}",
        series.len(),
        series.priced_len(),
        definition.symbol
    );
    Ok(series)
}
