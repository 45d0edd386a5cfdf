//! Formatting and parsing helpers for the CSV report
//!
//! Centralizes the fixed output formats so every writer and reader of the
//! report agrees on them.

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::Result;

/// Date format of the report: `2020-01-31`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Digits after the decimal point in every price cell
pub const PRICE_DECIMALS: u32 = 3;

/// Digits after the decimal point in rolling return cells
pub const RETURN_DECIMALS: u32 = 6;

/// Round a price to the report precision.
///
/// Uses round-half-even on the exact decimal value, the same rule `printf`
/// applies to `%.3f`.
///
/// # Examples
/// ```
/// use index_prices::utils::round_price;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_price(dec!(1.0005)), dec!(1.000));
/// assert_eq!(round_price(dec!(1.0015)), dec!(1.002));
/// ```
pub fn round_price(value: Decimal) -> Decimal {
    round_to(value, PRICE_DECIMALS)
}

fn round_to(value: Decimal, decimals: u32) -> Decimal {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven);
    if rounded.is_zero() {
        // avoid "-0.000"
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Format a price as fixed-point with exactly three decimals.
///
/// # Examples
/// ```
/// use index_prices::utils::format_price;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_price(dec!(100)), "100.000");
/// assert_eq!(format_price(dec!(3257.8500488)), "3257.850");
/// ```
pub fn format_price(value: Decimal) -> String {
    format_decimal(value, PRICE_DECIMALS)
}

/// Format a value as fixed-point with `decimals` digits, rounding half-even.
pub fn format_decimal(value: Decimal, decimals: u32) -> String {
    format!("{:.prec$}", round_to(value, decimals), prec = decimals as usize)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| anyhow!("invalid date '{}' (expected YYYY-MM-DD): {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_price_pads_to_three_decimals() {
        assert_eq!(format_price(dec!(0)), "0.000");
        assert_eq!(format_price(dec!(1)), "1.000");
        assert_eq!(format_price(dec!(1.5)), "1.500");
        assert_eq!(format_price(dec!(200.25)), "200.250");
    }

    #[test]
    fn test_format_price_rounds_half_even() {
        assert_eq!(format_price(dec!(1.2344)), "1.234");
        assert_eq!(format_price(dec!(1.2346)), "1.235");
        assert_eq!(format_price(dec!(1.2345)), "1.234");
        assert_eq!(format_price(dec!(1.2355)), "1.236");
    }

    #[test]
    fn test_format_price_negative() {
        assert_eq!(format_price(dec!(-12.3456)), "-12.346");
        assert_eq!(format_price(dec!(-0.0004)), "0.000");
    }

    #[test]
    fn test_format_decimal_uses_requested_precision() {
        assert_eq!(format_decimal(dec!(0.1), RETURN_DECIMALS), "0.100000");
        assert_eq!(format_decimal(dec!(-0.0070598707), RETURN_DECIMALS), "-0.007060");
        assert_eq!(format_decimal(dec!(-0.0000004), RETURN_DECIMALS), "0.000000");
    }

    #[test]
    fn test_format_price_from_binary_float() {
        // 1.0005 is stored as 1.000499999..., so it rounds down
        let value = crate::series::price_from_f64(1.0005).unwrap();
        assert_eq!(format_price(value), "1.000");
    }

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        assert_eq!(format_date(date), "2020-01-02");
        assert_eq!(parse_date("2020-01-02").unwrap(), date);
        assert_eq!(parse_date(" 2020-01-02 ").unwrap(), date);
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("02/01/2020").is_err());
        assert!(parse_date("2020-13-01").is_err());
        assert!(parse_date("").is_err());
    }
}
