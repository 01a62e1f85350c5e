//! Yahoo Finance daily-chart client.
//!
//! One outbound request per `fetch_window` call. The caller owns pacing
//! between calls; this client only validates inputs, performs the request,
//! and decodes the chart payload into bars.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Bar;
use crate::services::fetcher::BarSource;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// Yahoo rejects clientless requests, so present a browser UA.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Fetch daily bars for `[start, end]` inclusive.
    pub async fn fetch_daily(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>> {
        if ticker.trim().is_empty() {
            return Err(Error::InvalidInput("Empty ticker".to_string()));
        }

        let today = Utc::now().date_naive();
        if start > today {
            return Err(Error::InvalidInput(format!(
                "Start date {} is in the future",
                start
            )));
        }
        if end < start {
            return Err(Error::InvalidInput(format!(
                "Window end {} precedes start {}",
                end, start
            )));
        }

        // period2 is exclusive, so push it one day past the window end
        let period1 = start.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp());
        let period2 = end
            .succ_opt()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|t| t.and_utc().timestamp());
        let (period1, period2) = match (period1, period2) {
            (Some(p1), Some(p2)) => (p1, p2),
            _ => {
                return Err(Error::InvalidInput(format!(
                    "Unrepresentable window {}..{}",
                    start, end
                )))
            }
        };

        // "&" in symbols like M&M.NS must not leak into the query string
        let symbol = ticker.replace('&', "%26");
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=div%2Csplit",
            self.base_url, symbol, period1, period2
        );

        debug!(ticker = ticker, url = %url, "Fetching daily bars");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request failed for {}: {}", ticker, e)))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Provider returned {} for {}",
                response.status(),
                ticker
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Invalid JSON for {}: {}", ticker, e)))?;

        parse_chart_response(ticker, &body)
    }
}

impl BarSource for YahooClient {
    async fn fetch_window(
        &mut self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>> {
        self.fetch_daily(ticker, start, end).await
    }
}

/// Decode a v8 chart payload into daily bars.
///
/// Rows with a null close (or any null price field) are skipped; the
/// provider pads holidays and suspended sessions with nulls.
fn parse_chart_response(ticker: &str, body: &Value) -> Result<Vec<Bar>> {
    if let Some(err) = body
        .pointer("/chart/error")
        .filter(|v| !v.is_null())
    {
        let description = err
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("unknown provider error");
        return Err(Error::Network(format!("{}: {}", ticker, description)));
    }

    let result = match body.pointer("/chart/result/0") {
        Some(r) => r,
        // A null result with no error is an empty window
        None => return Ok(Vec::new()),
    };

    let timestamps = match result.get("timestamp").and_then(Value::as_array) {
        Some(t) => t,
        None => return Ok(Vec::new()),
    };

    let quote = result
        .pointer("/indicators/quote/0")
        .ok_or_else(|| Error::Parse(format!("{}: missing quote block", ticker)))?;

    let series = |name: &str| -> Result<&Vec<Value>> {
        quote
            .get(name)
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Parse(format!("{}: missing {} series", ticker, name)))
    };

    let opens = series("open")?;
    let highs = series("high")?;
    let lows = series("low")?;
    let closes = series("close")?;
    let volumes = series("volume")?;

    let mut bars = Vec::with_capacity(timestamps.len());

    for (i, ts) in timestamps.iter().enumerate() {
        let date = match ts
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        {
            Some(dt) => dt.date_naive(),
            None => continue,
        };

        let price = |values: &Vec<Value>| values.get(i).and_then(Value::as_f64);

        match (price(opens), price(highs), price(lows), price(closes)) {
            (Some(open), Some(high), Some(low), Some(close)) => {
                let volume = volumes.get(i).and_then(Value::as_u64).unwrap_or(0);
                bars.push(Bar::new(
                    date,
                    ticker.to_string(),
                    open,
                    high,
                    low,
                    close,
                    volume,
                ));
            }
            _ => continue,
        }
    }

    Ok(bars)
}
