use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{PriceError, Result};
use crate::series::PriceSeries;

/// Prices of several series on the dates they all share.
///
/// Every row carries one price per label, in label order; rows are kept
/// ascending by date with no duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedTable {
    labels: Vec<String>,
    rows: BTreeMap<NaiveDate, Vec<Decimal>>,
}

impl AlignedTable {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            rows: BTreeMap::new(),
        }
    }

    /// Add a row; the price count must match the labels and the date must be new.
    pub fn push_row(&mut self, date: NaiveDate, prices: Vec<Decimal>) -> Result<()> {
        if prices.len() != self.labels.len() {
            return Err(PriceError::InvalidReport(format!(
                "row {} has {} prices for {} columns",
                date,
                prices.len(),
                self.labels.len()
            ))
            .into());
        }
        if self.rows.contains_key(&date) {
            return Err(PriceError::InvalidReport(format!("duplicate row for {}", date)).into());
        }
        self.rows.insert(date, prices);
        Ok(())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&[Decimal]> {
        self.rows.get(&date).map(Vec::as_slice)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.keys().copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, &[Decimal])> + '_ {
        self.rows.iter().map(|(d, p)| (*d, p.as_slice()))
    }
}

/// Inner-join series on date, dropping every date where any series lacks a price.
///
/// Columns follow the order of `series`.
pub fn align(series: &[PriceSeries]) -> AlignedTable {
    let labels = series.iter().map(|s| s.label.clone()).collect();
    let mut table = AlignedTable::new(labels);

    let Some(first) = series.first() else {
        return table;
    };

    for date in first.priced_dates() {
        let prices: Option<Vec<Decimal>> = series.iter().map(|s| s.price_on(date)).collect();
        if let Some(prices) = prices {
            table.rows.insert(date, prices);
        }
    }

    debug!(
        "Aligned {} series: {} of {} dates kept",
        series.len(),
        table.len(),
        first.len()
    );
    table
}
