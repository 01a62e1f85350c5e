//! Universe and pipeline defaults.
//!
//! The ticker list is the NIFTY 50 constituents as NSE-suffixed Yahoo
//! symbols. Order matters: progress output and the post-run verification
//! lines follow it.

/// NIFTY 50 constituent tickers (NSE suffix)
pub const NIFTY50_TICKERS: &[&str] = &[
    "RELIANCE.NS", "TCS.NS", "HDFCBANK.NS", "INFY.NS",
    "ITC.NS", "ICICIBANK.NS", "SBIN.NS", "BHARTIARTL.NS",
    "KOTAKBANK.NS", "LT.NS", "HINDUNILVR.NS", "AXISBANK.NS",
    "MARUTI.NS", "BAJFINANCE.NS", "WIPRO.NS", "ONGC.NS",
    "TITAN.NS", "NTPC.NS", "ULTRACEMCO.NS", "SUNPHARMA.NS",
    "POWERGRID.NS", "NESTLEIND.NS", "INDUSINDBK.NS",
    "BAJAJFINSV.NS", "JSWSTEEL.NS", "TATASTEEL.NS", "HCLTECH.NS",
    "DRREDDY.NS", "ASIANPAINT.NS", "TECHM.NS", "HINDALCO.NS",
    "GRASIM.NS", "DIVISLAB.NS", "ADANIENT.NS", "CIPLA.NS",
    "M&M.NS", "ADANIPORTS.NS", "BRITANNIA.NS", "EICHERMOT.NS",
    "BAJAJ-AUTO.NS", "SBILIFE.NS", "SHREECEM.NS", "COALINDIA.NS",
    "UPL.NS", "APOLLOHOSP.NS", "TATACONSUM.NS", "BPCL.NS",
    "HEROMOTOCO.NS", "IOC.NS",
];

/// First date of the backfill window
pub const HISTORY_START_DATE: &str = "2010-01-01";

/// Days re-fetched before the latest recorded date on each incremental run.
/// Covers provider revisions of recent, possibly not-yet-finalized bars.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 60;

/// Fixed pause between per-ticker requests (provider rate limiting)
pub const REQUEST_DELAY_MS: u64 = 300;

/// A backfill fetch must return more rows than this to count as usable
/// history. Filters out recently listed or misresolved symbols.
pub const MIN_HISTORY_ROWS: usize = 1000;

/// Master dataset file name inside the data directory
pub const MASTER_FILE_NAME: &str = "nifty50_daily.csv";

/// Backup directory name inside the data directory
pub const BACKUP_DIR_NAME: &str = "backups";

/// Run log file name inside the data directory
pub const LOG_FILE_NAME: &str = "update_log.txt";
