use std::collections::HashSet;

use crate::error::Result;
use crate::models::Config;
use crate::services::load_master;
use crate::utils::format_count;

pub fn run() {
    println!("📊 NIFTY 50 Dataset Status\n");

    match show_status() {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn show_status() -> Result<()> {
    let config = Config::from_defaults();
    let bars = load_master(&config.master_path)?;

    let tickers: HashSet<&str> = bars.iter().map(|b| b.ticker.as_str()).collect();
    let first = bars.iter().map(|b| b.date).min();
    let last = bars.iter().map(|b| b.date).max();

    println!("📁 Master file: {}", config.master_path.display());
    println!("📈 Total rows: {}", format_count(bars.len()));
    println!("🏢 Unique stocks: {}", tickers.len());
    if let (Some(first), Some(last)) = (first, last) {
        println!("📅 Date range: {} to {}", first, last);
    }

    println!("\n💰 LATEST CLOSES:");
    for ticker in config.universe.iter().take(2) {
        if let Some(bar) = bars.iter().rev().find(|b| &b.ticker == ticker) {
            let ret = bar
                .daily_return_pct
                .map_or("N/A".to_string(), |r| format!("{:+.2}%", r));
            println!("  {}: {} - ₹{:.2} ({})", ticker, bar.date, bar.close, ret);
        }
    }

    if let Ok(log) = std::fs::read_to_string(&config.log_path) {
        let lines: Vec<&str> = log.lines().collect();
        if !lines.is_empty() {
            println!("\n📜 Recent runs:");
            for line in lines.iter().rev().take(5).rev() {
                println!("   {}", line);
            }
        }
    }

    Ok(())
}
