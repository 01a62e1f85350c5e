use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    BACKUP_DIR_NAME, DEFAULT_LOOKBACK_DAYS, HISTORY_START_DATE, LOG_FILE_NAME, MASTER_FILE_NAME,
    MIN_HISTORY_ROWS, NIFTY50_TICKERS, REQUEST_DELAY_MS,
};
use crate::utils::get_data_dir;

/// Pipeline configuration, constructed once at process start and passed
/// explicitly to the pipeline functions. No global mutable state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ordered ticker universe
    pub universe: Vec<String>,

    /// Master dataset CSV location
    pub master_path: PathBuf,

    /// Directory receiving timestamped backup copies
    pub backup_dir: PathBuf,

    /// Append-only run log location
    pub log_path: PathBuf,

    /// Days re-fetched before the latest recorded date on incremental runs
    pub lookback_days: i64,

    /// Fixed pause between per-ticker requests
    pub request_delay: Duration,

    /// First date of the backfill window
    pub history_start: NaiveDate,

    /// Minimum rows a backfill fetch must return to count as usable history
    pub min_history_rows: usize,
}

impl Config {
    /// Build the default configuration: hardcoded universe, everything
    /// under the data directory.
    pub fn from_defaults() -> Self {
        let data_dir = get_data_dir();

        Self {
            universe: NIFTY50_TICKERS.iter().map(|t| t.to_string()).collect(),
            master_path: data_dir.join(MASTER_FILE_NAME),
            backup_dir: data_dir.join(BACKUP_DIR_NAME),
            log_path: data_dir.join(LOG_FILE_NAME),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            request_delay: Duration::from_millis(REQUEST_DELAY_MS),
            history_start: NaiveDate::parse_from_str(HISTORY_START_DATE, "%Y-%m-%d")
                .unwrap_or_else(|_| Local::now().date_naive()),
            min_history_rows: MIN_HISTORY_ROWS,
        }
    }
}
