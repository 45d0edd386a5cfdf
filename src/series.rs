//! Price series model: date ranges, the selected price column and the
//! per-symbol series produced by a fetch.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{PriceError, Result};

/// Half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(PriceError::InvalidRange { start, end }.into());
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Which closing price column a series is built from.
///
/// `AdjustedClose` accounts for dividends and splits; `Close` is the raw
/// session close. The two are not numerically equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PriceField {
    #[default]
    AdjustedClose,
    Close,
}

impl PriceField {
    /// Column name as reported by the provider
    pub fn column_name(&self) -> &'static str {
        match self {
            PriceField::AdjustedClose => "adjclose",
            PriceField::Close => "close",
        }
    }
}

/// A symbol to download and the column label it gets in the output
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeriesDefinition {
    pub symbol: String,
    pub label: String,
}

impl SeriesDefinition {
    pub fn new(symbol: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            label: label.into(),
        }
    }

    /// S&P 500 and MSCI World, in output column order
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("^GSPC", "S&P 500"),
            Self::new("^990100-USD-STRD", "MSCI World"),
        ]
    }
}

/// Date-ordered prices for one symbol. `None` marks a trading day the
/// provider reported without a value.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub label: String,
    pub symbol: String,
    points: BTreeMap<NaiveDate, Option<Decimal>>,
}

impl PriceSeries {
    pub fn new(label: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            symbol: symbol.into(),
            points: BTreeMap::new(),
        }
    }

    /// Build a series from `(date, price)` pairs; later duplicates win.
    pub fn from_points<I>(label: impl Into<String>, symbol: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Option<Decimal>)>,
    {
        let mut series = Self::new(label, symbol);
        for (date, price) in points {
            series.insert(date, price);
        }
        series
    }

    pub fn insert(&mut self, date: NaiveDate, price: Option<Decimal>) {
        self.points.insert(date, price);
    }

    /// Non-missing price on `date`
    pub fn price_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.points.get(&date).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of dates carrying an actual price
    pub fn priced_len(&self) -> usize {
        self.points.values().filter(|p| p.is_some()).count()
    }

    /// Dates with a non-missing price, ascending
    pub fn priced_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points
            .iter()
            .filter(|(_, p)| p.is_some())
            .map(|(d, _)| *d)
    }
}

/// Convert a provider float to a decimal price; NaN and infinities are missing.
pub fn price_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64_retain(value)
}
