//! CSV rendering of the aligned price table
//!
//! Layout: a `Date` column, then one column per series label. Dates are
//! `YYYY-MM-DD`, prices fixed-point with three decimals.

use anyhow::{anyhow, Context};
use csv::{ReaderBuilder, Writer};
use rust_decimal::Decimal;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing::debug;

use super::aligned::AlignedTable;
use crate::error::{PriceError, Result};
use crate::utils::{format_date, format_decimal, parse_date, PRICE_DECIMALS};

pub const DATE_HEADER: &str = "Date";

/// Stream the table as CSV into `writer`.
pub fn write_csv<W: Write>(table: &AlignedTable, writer: W) -> Result<()> {
    write_csv_with_decimals(table, writer, PRICE_DECIMALS)
}

/// Stream the table as CSV with `decimals` digits in every value cell.
pub fn write_csv_with_decimals<W: Write>(table: &AlignedTable, writer: W, decimals: u32) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);

    let mut header = Vec::with_capacity(table.labels().len() + 1);
    header.push(DATE_HEADER);
    header.extend(table.labels().iter().map(String::as_str));
    csv_writer
        .write_record(&header)
        .context("Failed to write CSV header")?;

    for (date, prices) in table.rows() {
        let mut record = Vec::with_capacity(prices.len() + 1);
        record.push(format_date(date));
        record.extend(prices.iter().map(|p| format_decimal(*p, decimals)));
        csv_writer
            .write_record(&record)
            .with_context(|| format!("Failed to write CSV row for {}", date))?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    debug!("Wrote {} CSV rows", table.len());
    Ok(())
}

/// Render the table into an in-memory CSV string.
pub fn to_csv_string(table: &AlignedTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(table, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| anyhow!("CSV output is not UTF-8: {}", e))
}

/// Parse a CSV produced by [`write_csv`] back into a table.
///
/// Prices come back at the three-decimal precision they were written with.
pub fn read_csv<R: Read>(reader: R) -> Result<AlignedTable> {
    let mut csv_reader = ReaderBuilder::new().from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    match headers.get(0) {
        Some(first) if first == DATE_HEADER => {}
        other => {
            return Err(PriceError::InvalidReport(format!(
                "first column must be '{}', found {:?}",
                DATE_HEADER, other
            ))
            .into())
        }
    }

    let labels = headers.iter().skip(1).map(str::to_string).collect();
    let mut table = AlignedTable::new(labels);
    let mut last_date = None;

    for (idx, result) in csv_reader.records().enumerate() {
        let line = idx + 2;
        let record = result.with_context(|| format!("Failed to read CSV line {}", line))?;

        let date = parse_date(record.get(0).unwrap_or_default())
            .with_context(|| format!("Bad date on line {}", line))?;
        if let Some(last) = last_date {
            if date <= last {
                return Err(PriceError::InvalidReport(format!(
                    "line {}: {} does not follow {}",
                    line, date, last
                ))
                .into());
            }
        }

        let prices = record
            .iter()
            .skip(1)
            .map(|cell| {
                Decimal::from_str(cell.trim())
                    .map_err(|e| anyhow!("Bad price '{}' on line {}: {}", cell, line, e))
            })
            .collect::<Result<Vec<_>>>()?;
        table.push_row(date, prices)?;
        last_date = Some(date);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::align;
    use crate::series::PriceSeries;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_table() -> AlignedTable {
        let sp = PriceSeries::from_points(
            "S&P 500",
            "^GSPC",
            vec![
                (d(2020, 1, 2), Some(dec!(3257.8500488281))),
                (d(2020, 1, 3), Some(dec!(3234.85))),
            ],
        );
        let msci = PriceSeries::from_points(
            "MSCI World",
            "^990100-USD-STRD",
            vec![
                (d(2020, 1, 2), Some(dec!(8290.1))),
                (d(2020, 1, 3), Some(dec!(8244.4567))),
            ],
        );
        align(&[sp, msci])
    }

    #[test]
    fn test_single_shared_date_renders_one_row() {
        let sp = PriceSeries::from_points(
            "S&P 500",
            "^GSPC",
            vec![
                (d(2020, 1, 1), Some(dec!(100.0))),
                (d(2020, 1, 2), Some(dec!(101.0))),
            ],
        );
        let msci = PriceSeries::from_points(
            "MSCI World",
            "^990100-USD-STRD",
            vec![(d(2020, 1, 1), Some(dec!(200.0)))],
        );

        let csv = to_csv_string(&align(&[sp, msci])).unwrap();
        assert_eq!(csv, "Date,S&P 500,MSCI World\n2020-01-01,100.000,200.000\n");
    }

    #[test]
    fn test_write_csv_formats_dates_and_prices() {
        let csv = to_csv_string(&sample_table()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Date,S&P 500,MSCI World");
        assert_eq!(lines[1], "2020-01-02,3257.850,8290.100");
        assert_eq!(lines[2], "2020-01-03,3234.850,8244.457");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_read_csv_recovers_rounded_table() {
        let csv = to_csv_string(&sample_table()).unwrap();
        let parsed = read_csv(csv.as_bytes()).unwrap();

        assert_eq!(parsed.labels(), sample_table().labels());
        assert_eq!(parsed.get(d(2020, 1, 2)), Some(&[dec!(3257.850), dec!(8290.100)][..]));
        assert_eq!(parsed.get(d(2020, 1, 3)), Some(&[dec!(3234.850), dec!(8244.457)][..]));

        // Writing the parsed table again is byte-identical
        assert_eq!(to_csv_string(&parsed).unwrap(), csv);
    }

    #[test]
    fn test_read_csv_rejects_bad_input() {
        assert!(read_csv("Day,A\n2020-01-01,1.000\n".as_bytes()).is_err());
        assert!(read_csv("Date,A\n2020-01-02,1.000\n2020-01-01,1.000\n".as_bytes()).is_err());
        assert!(read_csv("Date,A\n2020-01-01,abc\n".as_bytes()).is_err());
        assert!(read_csv("Date,A,B\n2020-01-01,1.000\n".as_bytes()).is_err());
    }

    #[test]
    fn test_empty_table_is_header_only() {
        let table = AlignedTable::new(vec!["S&P 500".to_string(), "MSCI World".to_string()]);
        assert_eq!(to_csv_string(&table).unwrap(), "Date,S&P 500,MSCI World\n");
    }
}
