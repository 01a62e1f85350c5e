//! One-time full-history backfill.
//!
//! Fetches each ticker's complete daily history from the configured epoch,
//! derives returns, and writes a fresh master dataset. Per-ticker failures
//! (including too-short histories) are collected and summarized; only a
//! universe-wide failure aborts the run.

use chrono::Local;
use tokio::time::sleep;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::{Bar, Config};
use crate::services::{apply_returns, write_master, BarSource};
use crate::utils::{format_count, log_timestamp};

/// Summary of a completed backfill
#[derive(Debug)]
pub struct BackfillReport {
    pub total_rows: usize,
    pub tickers_loaded: usize,
    pub failed: Vec<String>,
}

pub async fn run_backfill<S: BarSource>(config: &Config, source: &mut S) -> Result<BackfillReport> {
    let now = Local::now();
    let today = now.date_naive();
    let total = config.universe.len();

    println!("{}", "=".repeat(60));
    println!("NIFTY 50 COMPLETE DOWNLOAD ({} → today)", config.history_start);
    println!("Run time: {}", log_timestamp(&now));
    println!("{}", "=".repeat(60));
    println!("Downloading {} stocks from {}...", total, config.history_start);

    let mut all_bars: Vec<Bar> = Vec::new();
    let mut failed: Vec<String> = Vec::new();
    let mut tickers_loaded = 0;

    for (i, ticker) in config.universe.iter().enumerate() {
        match source
            .fetch_window(ticker, config.history_start, today)
            .await
        {
            Ok(bars) if bars.len() > config.min_history_rows => {
                let first = bars.iter().map(|b| b.date).min().unwrap_or(today);
                let last = bars.iter().map(|b| b.date).max().unwrap_or(today);
                println!(
                    "[{:2}/{}] {:<15} ✓ {} rows ({} to {})",
                    i + 1,
                    total,
                    ticker,
                    format_count(bars.len()),
                    first,
                    last
                );
                all_bars.extend(bars);
                tickers_loaded += 1;
            }
            Ok(bars) => {
                println!(
                    "[{:2}/{}] {:<15} ✗ Not enough data: {} rows",
                    i + 1,
                    total,
                    ticker,
                    bars.len()
                );
                failed.push(ticker.clone());
            }
            Err(e) => {
                println!("[{:2}/{}] {:<15} ✗ Error", i + 1, total, ticker);
                warn!(ticker = %ticker, error = %e, "Backfill fetch failed");
                failed.push(ticker.clone());
            }
        }

        if i + 1 < total {
            sleep(config.request_delay).await;
        }
    }

    if all_bars.is_empty() {
        return Err(Error::Other(
            "No ticker returned usable history".to_string(),
        ));
    }

    all_bars.sort_by(|a, b| a.cmp_key(b));
    apply_returns(&mut all_bars);

    write_master(&config.master_path, &all_bars)?;

    println!("\n{}", "=".repeat(60));
    println!("✅ DOWNLOAD COMPLETE!");
    println!("{}", "=".repeat(60));
    println!("File: {}", config.master_path.display());
    println!("Rows: {}", format_count(all_bars.len()));
    if let (Some(first), Some(last)) = (
        all_bars.iter().map(|b| b.date).min(),
        all_bars.iter().map(|b| b.date).max(),
    ) {
        println!("Date range: {} to {}", first, last);
    }
    println!("Stocks: {}", tickers_loaded);

    if !failed.is_empty() {
        println!("\n⚠️  Failed: {} stocks", failed.len());
        for ticker in failed.iter().take(5) {
            println!("   {}", ticker);
        }
    }

    print_verification(&all_bars, &config.universe);

    Ok(BackfillReport {
        total_rows: all_bars.len(),
        tickers_loaded,
        failed,
    })
}

/// Print first/last bar for the leading universe tickers
fn print_verification(bars: &[Bar], universe: &[String]) {
    println!("\n💰 VERIFICATION:");
    for ticker in universe.iter().take(2) {
        let mut series = bars.iter().filter(|b| &b.ticker == ticker);
        let first = series.next();
        let last = series.last().or(first);

        if let (Some(first), Some(last)) = (first, last) {
            println!("  {}:", ticker);
            println!("    First: {} - ₹{:.2}", first.date, first.close);
            println!("    Last:  {} - ₹{:.2}", last.date, last.close);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::dataset::load_master;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::path::Path;
    use std::time::Duration;

    enum Scripted {
        Rows(Vec<Bar>),
        Fail,
    }

    struct ScriptedSource {
        responses: HashMap<String, Scripted>,
        calls: Vec<(String, NaiveDate, NaiveDate)>,
    }

    impl ScriptedSource {
        fn new(responses: HashMap<String, Scripted>) -> Self {
            Self {
                responses,
                calls: Vec::new(),
            }
        }
    }

    impl BarSource for ScriptedSource {
        async fn fetch_window(
            &mut self,
            ticker: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> crate::error::Result<Vec<Bar>> {
            self.calls.push((ticker.to_string(), start, end));
            match self.responses.get(ticker) {
                Some(Scripted::Rows(rows)) => Ok(rows.clone()),
                Some(Scripted::Fail) => Err(Error::Network("scripted failure".to_string())),
                None => Ok(Vec::new()),
            }
        }
    }

    fn bar(ticker: &str, day: u32, close: f64) -> Bar {
        Bar::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            ticker.to_string(),
            close,
            close,
            close,
            close,
            1000,
        )
    }

    fn test_config(dir: &Path, universe: &[&str]) -> Config {
        Config {
            universe: universe.iter().map(|t| t.to_string()).collect(),
            master_path: dir.join("master.csv"),
            backup_dir: dir.join("backups"),
            log_path: dir.join("update_log.txt"),
            lookback_days: 60,
            request_delay: Duration::ZERO,
            history_start: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            min_history_rows: 2,
        }
    }

    #[tokio::test]
    async fn test_backfill_writes_fresh_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), &["AAA.NS", "BBB.NS", "CCC.NS"]);

        let mut source = ScriptedSource::new(HashMap::from([
            (
                "AAA.NS".to_string(),
                Scripted::Rows(vec![
                    bar("AAA.NS", 1, 100.0),
                    bar("AAA.NS", 2, 110.0),
                    bar("AAA.NS", 3, 99.0),
                ]),
            ),
            // single row: below the minimum-history threshold
            ("BBB.NS".to_string(), Scripted::Rows(vec![bar("BBB.NS", 1, 5.0)])),
            ("CCC.NS".to_string(), Scripted::Fail),
        ]));

        let report = run_backfill(&config, &mut source).await.unwrap();

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.tickers_loaded, 1);
        assert_eq!(report.failed, vec!["BBB.NS", "CCC.NS"]);

        let bars = load_master(&config.master_path).unwrap();
        assert_eq!(bars.len(), 3);
        assert!(bars.iter().all(|b| b.ticker == "AAA.NS"));
        assert_eq!(bars[0].daily_return_pct, None);
        assert!((bars[1].daily_return_pct.unwrap() - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_backfill_fetches_from_history_start() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), &["AAA.NS"]);

        let mut source = ScriptedSource::new(HashMap::new());
        let _ = run_backfill(&config, &mut source).await;

        assert_eq!(source.calls.len(), 1);
        assert_eq!(source.calls[0].1, config.history_start);
    }

    #[tokio::test]
    async fn test_backfill_with_no_usable_history_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), &["AAA.NS", "BBB.NS"]);

        let mut source = ScriptedSource::new(HashMap::from([
            ("AAA.NS".to_string(), Scripted::Fail),
        ]));

        let err = run_backfill(&config, &mut source).await.unwrap_err();
        assert!(matches!(err, Error::Other(_)));
        assert!(!config.master_path.exists());
    }
}
