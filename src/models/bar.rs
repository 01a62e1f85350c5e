use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One ticker's daily OHLCV record for one calendar date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date (no time component)
    pub date: NaiveDate,

    /// Exchange-qualified ticker symbol (e.g. "RELIANCE.NS")
    pub ticker: String,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Trading volume (number of shares)
    pub volume: u64,

    /// Day-over-day close change in percent, derived over the ticker's own
    /// chronological series. None on a ticker's first bar and wherever the
    /// prior close is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_return_pct: Option<f64>,
}

impl Bar {
    /// Create a new bar with no derived return
    pub fn new(
        date: NaiveDate,
        ticker: String,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            date,
            ticker,
            open,
            high,
            low,
            close,
            volume,
            daily_return_pct: None,
        }
    }

    /// Persisted ordering: (ticker, date) ascending
    pub fn cmp_key(&self, other: &Bar) -> Ordering {
        self.ticker
            .cmp(&other.ticker)
            .then(self.date.cmp(&other.date))
    }
}
