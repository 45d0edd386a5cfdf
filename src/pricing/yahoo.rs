use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{PriceHistory, PriceProvider};
use crate::error::{PriceError, Result};
use crate::series::DateRange;

const YAHOO_CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; IndexPrices/1.0)";

/// Yahoo Finance v8 chart response
#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    symbol: Option<String>,
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: Option<String>,
}

/// Yahoo Finance daily chart provider (blocking, no retries)
pub struct YahooProvider {
    client: Client,
}

impl YahooProvider {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn fetch_history(&self, symbol: &str, range: DateRange) -> Result<PriceHistory> {
        let url = chart_url(symbol, range)?;
        info!("Requesting {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .context("Failed to send request to Yahoo Finance")?;
        let status = response.status();
        let body = response
            .text()
            .context("Failed to read Yahoo Finance response")?;

        parse_chart_body(symbol, status, &body)
    }
}

/// Interpret a chart response body given its HTTP status.
///
/// A non-success status is an error, except that unknown symbols come back
/// as a 404 that still carries a `chart.error`, which is reported instead.
pub fn parse_chart_body(symbol: &str, status: StatusCode, body: &str) -> Result<PriceHistory> {
    let parsed = serde_json::from_str::<ChartResponse>(body);
    if !status.is_success() {
        if let Ok(data) = parsed {
            if data.chart.error.is_some() {
                return parse_chart_response(symbol, data);
            }
        }
        return Err(PriceError::Provider(format!(
            "Yahoo Finance returned error status: {}",
            status
        ))
        .into());
    }

    let data = parsed.context("Failed to parse Yahoo Finance response")?;
    parse_chart_response(symbol, data)
}

/// Build the chart URL for a symbol; both bounds are midnight UTC, the end exclusive.
pub fn chart_url(symbol: &str, range: DateRange) -> Result<Url> {
    let mut url = Url::parse(YAHOO_CHART_URL).context("Invalid Yahoo Finance base URL")?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Yahoo Finance base URL cannot take a path"))?
        .push(symbol);
    url.query_pairs_mut()
        .append_pair("period1", &midnight_timestamp(range.start).to_string())
        .append_pair("period2", &midnight_timestamp(range.end).to_string())
        .append_pair("interval", "1d")
        .append_pair("includeAdjustedClose", "true");
    Ok(url)
}

fn midnight_timestamp(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

/// Parse a chart response body into a [`PriceHistory`].
pub fn parse_chart_json(symbol: &str, body: &str) -> Result<PriceHistory> {
    let data: ChartResponse =
        serde_json::from_str(body).context("Failed to parse Yahoo Finance chart JSON")?;
    parse_chart_response(symbol, data)
}

pub(crate) fn parse_chart_response(symbol: &str, data: ChartResponse) -> Result<PriceHistory> {
    if let Some(error) = data.chart.error {
        return Err(PriceError::Provider(format!(
            "Yahoo Finance API error for {}: {} - {}",
            symbol,
            error.code,
            error.description.unwrap_or_default()
        ))
        .into());
    }

    let mut results = data
        .chart
        .result
        .ok_or_else(|| PriceError::Provider(format!("No data returned for {}", symbol)))?;
    if results.len() != 1 {
        return Err(PriceError::Provider(format!(
            "Expected one chart result for {}, got {}",
            symbol,
            results.len()
        ))
        .into());
    }
    let result = results.remove(0);

    let reported = result.meta.symbol.unwrap_or_default();
    if reported.trim().is_empty() {
        return Err(PriceError::Provider(format!(
            "Unexpected response for {}: chart has no symbol",
            symbol
        ))
        .into());
    }

    let timestamps = result.timestamp.unwrap_or_default();
    let offset = result.meta.gmtoffset.unwrap_or(0);
    let dates = timestamps
        .iter()
        .map(|&ts| {
            chrono::DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| anyhow!("Invalid timestamp {} for {}", ts, symbol))
        })
        .collect::<Result<Vec<_>>>()?;

    let (close, adjclose) = match result.indicators {
        Some(indicators) => (
            indicators.quote.into_iter().next().and_then(|q| q.close),
            indicators
                .adjclose
                .and_then(|a| a.into_iter().next())
                .and_then(|a| a.adjclose),
        ),
        None => (None, None),
    };

    debug!("Parsed {} chart rows for {}", dates.len(), reported);
    Ok(PriceHistory {
        symbol: reported,
        dates,
        close,
        adjclose,
    })
}
