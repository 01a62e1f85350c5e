//! Incremental daily update.
//!
//! Loads the master dataset, re-fetches a trailing window per ticker
//! (latest recorded date minus the lookback margin), merges with last-wins
//! dedup, re-derives returns, and persists master + timestamped backup +
//! one run-log line. When no ticker returns any rows the run short-circuits
//! to the NO DATA path: log line only, nothing else touched.

use chrono::{Duration, Local, NaiveDate};
use std::collections::HashSet;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{Bar, Config};
use crate::services::run_log;
use crate::services::{load_master, merge_bars, write_backup, write_master, BarSource};
use crate::utils::{format_count, log_timestamp};

/// Outcome of an incremental run. NO DATA is success, not an error.
#[derive(Debug)]
pub enum UpdateOutcome {
    NoData,
    Updated {
        rows_added: usize,
        total_rows: usize,
        latest: NaiveDate,
    },
}

pub async fn run_update<S: BarSource>(config: &Config, source: &mut S) -> Result<UpdateOutcome> {
    let now = Local::now();
    let today = now.date_naive();
    let timestamp = log_timestamp(&now);

    println!("{}", "=".repeat(70));
    println!("NIFTY 50 DAILY UPDATER");
    println!("Run time: {}", timestamp);
    println!("{}", "=".repeat(70));

    println!("📂 Loading {}...", config.master_path.display());
    let existing = load_master(&config.master_path)?;
    let latest = existing
        .iter()
        .map(|b| b.date)
        .max()
        .ok_or_else(|| Error::Parse("Master dataset has no rows".to_string()))?;
    let was_rows = existing.len();
    let unique_tickers: HashSet<&str> = existing.iter().map(|b| b.ticker.as_str()).collect();

    println!("   ✓ Loaded: {} rows", format_count(was_rows));
    println!("   📅 Latest date: {}", latest);
    println!("   🏢 Unique stocks: {}", unique_tickers.len());

    let window_start = latest - Duration::days(config.lookback_days);
    let total = config.universe.len();

    println!("\n📥 Downloading new data from {}...", window_start);
    println!("   Stocks: {}", total);
    println!("{}", "-".repeat(70));

    let mut fetched: Vec<Bar> = Vec::new();
    let mut failed: Vec<String> = Vec::new();

    for (i, ticker) in config.universe.iter().enumerate() {
        match source.fetch_window(ticker, window_start, today).await {
            Ok(bars) if !bars.is_empty() => {
                println!(
                    "[{:2}/{}] {:<15} ✓ {} rows",
                    i + 1,
                    total,
                    ticker,
                    bars.len()
                );
                fetched.extend(bars);
            }
            Ok(_) => {
                println!("[{:2}/{}] {:<15} ✗ No data", i + 1, total, ticker);
                failed.push(ticker.clone());
            }
            Err(e) => {
                println!("[{:2}/{}] {:<15} ✗ Error", i + 1, total, ticker);
                warn!(ticker = %ticker, error = %e, "Window fetch failed");
                failed.push(ticker.clone());
            }
        }

        if i + 1 < total {
            sleep(config.request_delay).await;
        }
    }

    if fetched.is_empty() {
        println!("\n❌ No new data (market holiday?)");
        run_log::append_no_data(&config.log_path, &timestamp)?;
        info!("Update run finished: no data for window");
        return Ok(UpdateOutcome::NoData);
    }

    let fetched_rows = fetched.len();
    let outcome = merge_bars(existing, fetched);
    let total_rows = outcome.bars.len();
    let new_latest = outcome
        .bars
        .iter()
        .map(|b| b.date)
        .max()
        .ok_or_else(|| Error::Parse("Merged dataset has no rows".to_string()))?;

    write_master(&config.master_path, &outcome.bars)?;
    let backup_path = write_backup(&config.backup_dir, &config.master_path, &outcome.bars, &now)?;
    run_log::append_update(
        &config.log_path,
        &timestamp,
        outcome.rows_added,
        total_rows,
        new_latest,
    )?;

    println!("\n{}", "=".repeat(70));
    println!("✅ UPDATE COMPLETE!");
    println!("{}", "=".repeat(70));
    println!("📁 Master file updated: {}", config.master_path.display());
    println!("📁 Daily backup: {}", backup_path.display());
    println!(
        "📈 Total rows: {} (was {})",
        format_count(total_rows),
        format_count(was_rows)
    );
    println!("➕ New rows added: {} ({} fetched)", outcome.rows_added, fetched_rows);
    println!("📅 Latest date: {}", new_latest);

    if !failed.is_empty() {
        println!("\n⚠️  Failed: {} stocks", failed.len());
        for ticker in failed.iter().take(3) {
            println!("   {}", ticker);
        }
        if failed.len() > 3 {
            println!("   ... and {} more", failed.len() - 3);
        }
    }

    print_latest_bars(&outcome.bars, &config.universe);

    info!(
        rows_added = outcome.rows_added,
        total_rows = total_rows,
        latest = %new_latest,
        failed = failed.len(),
        "Update run finished"
    );

    Ok(UpdateOutcome::Updated {
        rows_added: outcome.rows_added,
        total_rows,
        latest: new_latest,
    })
}

/// Print the newest bar for the leading universe tickers
fn print_latest_bars(bars: &[Bar], universe: &[String]) {
    println!("\n💰 LATEST MARKET DATA:");
    for ticker in universe.iter().take(2) {
        if let Some(last) = bars.iter().rev().find(|b| &b.ticker == ticker) {
            let ret = last
                .daily_return_pct
                .map_or("N/A".to_string(), |r| format!("{:+.2}%", r));
            println!("  {}: {} - ₹{:.2} ({})", ticker, last.date, last.close, ret);
        }
    }
}
