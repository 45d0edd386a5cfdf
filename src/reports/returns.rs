//! Calendar-day resampling and rolling returns over an aligned table

use anyhow::anyhow;
use rust_decimal::Decimal;
use tracing::debug;

use super::aligned::AlignedTable;
use crate::error::{PriceError, Result};

/// Expand the table to one row per calendar day from its first to its last date.
///
/// Days without a row (weekends, holidays) repeat the last known prices.
/// An empty table stays empty.
pub fn resample_daily(table: &AlignedTable) -> Result<AlignedTable> {
    let mut daily = AlignedTable::new(table.labels().to_vec());
    let (Some(first), Some(last)) = (table.dates().next(), table.dates().last()) else {
        return Ok(daily);
    };

    let mut rows = table.rows().peekable();
    let mut current: &[Decimal] = &[];
    let mut date = first;
    loop {
        if let Some((_, prices)) = rows.next_if(|(d, _)| *d == date) {
            current = prices;
        }
        daily.push_row(date, current.to_vec())?;
        if date == last {
            break;
        }
        date = date
            .succ_opt()
            .ok_or_else(|| anyhow!("Failed to increment date {}", date))?;
    }

    debug!("Resampled {} rows to {} calendar days", table.len(), daily.len());
    Ok(daily)
}

/// Return over `period` rows for every column: `P[i + period] / P[i] - 1`,
/// dated on the later row.
///
/// On a [`resample_daily`] table a row is a calendar day, so `period` is a
/// number of days. The period must be at least 1 and below the row count.
pub fn rolling_returns(table: &AlignedTable, period: usize) -> Result<AlignedTable> {
    if period == 0 {
        return Err(PriceError::InvalidReport("rolling return period must be at least 1".into()).into());
    }
    if period >= table.len() {
        return Err(PriceError::InvalidReport(format!(
            "rolling return period of {} needs more than {} rows, table has {}",
            period,
            period,
            table.len()
        ))
        .into());
    }

    let rows: Vec<_> = table.rows().collect();
    let mut returns = AlignedTable::new(table.labels().to_vec());
    for (start, end) in rows.iter().zip(rows.iter().skip(period)) {
        let values = start
            .1
            .iter()
            .zip(end.1)
            .zip(table.labels())
            .map(|((from, to), label)| {
                to.checked_div(*from).map(|ratio| ratio - Decimal::ONE).ok_or_else(|| {
                    anyhow::Error::from(PriceError::InvalidReport(format!(
                        "cannot compute {} return from {} to {}: price {} on {}",
                        label, start.0, end.0, from, start.0
                    )))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        returns.push_row(end.0, values)?;
    }

    debug!("Computed {} rolling returns over {} rows", returns.len(), period);
    Ok(returns)
}
