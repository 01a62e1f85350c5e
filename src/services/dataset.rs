//! Master dataset persistence.
//!
//! The master file is a headered CSV with columns
//! `Date, Open, High, Low, Close, Volume, Ticker, Daily_Return_%`. Columns
//! are located by header name on read, so files with a different column
//! order load fine. Dates tolerate the mixed textual formats older files
//! carry (see `utils::parse_date`).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use csv::{Reader, Writer};

use crate::error::{Error, Result};
use crate::models::{Bar, Dataset};
use crate::utils::{backup_stamp, parse_date};

const HEADER: &[&str] = &[
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Ticker",
    "Daily_Return_%",
];

/// Load the master dataset.
///
/// A missing file is `NotFound`; any unreadable row is a `Parse` error.
/// Both abort the run before anything is written.
pub fn load_master(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "Master file {} not found",
            path.display()
        )));
    }

    let mut reader = Reader::from_path(path)
        .map_err(|e| Error::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let columns = ColumnIndex::from_headers(
        reader
            .headers()
            .map_err(|e| Error::Parse(format!("Failed to read header: {}", e)))?,
    )?;

    let mut bars = Vec::new();

    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Error::Parse(format!("Row {}: {}", line + 2, e)))?;
        bars.push(columns.parse_row(&record, line + 2)?);
    }

    Ok(bars)
}

/// Overwrite the master file with the full dataset.
///
/// Writes to a temp sibling and renames it into place so an interrupted
/// run never leaves a half-written master.
pub fn write_master(path: &Path, bars: &[Bar]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("csv.tmp");
    write_csv(&tmp_path, bars)?;
    fs::rename(&tmp_path, path)
        .map_err(|e| Error::Io(format!("Failed to replace {}: {}", path.display(), e)))?;

    Ok(())
}

/// Write an immutable timestamped backup copy of the dataset.
///
/// Returns the backup path. The run timestamp keeps names unique; an
/// existing file of the same name is never overwritten.
pub fn write_backup(
    backup_dir: &Path,
    master_path: &Path,
    bars: &[Bar],
    now: &DateTime<Local>,
) -> Result<PathBuf> {
    fs::create_dir_all(backup_dir)?;

    let stem = master_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");
    let backup_path = backup_dir.join(format!("{}_backup_{}.csv", stem, backup_stamp(now)));

    if backup_path.exists() {
        return Err(Error::InvalidInput(format!(
            "Backup {} already exists",
            backup_path.display()
        )));
    }

    write_csv(&backup_path, bars)?;
    Ok(backup_path)
}

fn write_csv(path: &Path, bars: &[Bar]) -> Result<()> {
    let mut writer = Writer::from_path(path)
        .map_err(|e| Error::Io(format!("Failed to create {}: {}", path.display(), e)))?;

    writer.write_record(HEADER)?;

    for bar in bars {
        writer.write_record(&[
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
            bar.ticker.clone(),
            bar.daily_return_pct
                .map_or(String::new(), |v| v.to_string()),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Header-name to column-position mapping for the master schema
struct ColumnIndex {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
    ticker: usize,
    daily_return: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::Parse(format!("Missing column: {}", name)))
        };

        Ok(Self {
            date: find("Date")?,
            open: find("Open")?,
            high: find("High")?,
            low: find("Low")?,
            close: find("Close")?,
            volume: find("Volume")?,
            ticker: find("Ticker")?,
            daily_return: find("Daily_Return_%")?,
        })
    }

    fn parse_row(&self, record: &csv::StringRecord, line: usize) -> Result<Bar> {
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let price = |idx: usize, name: &str| -> Result<f64> {
            field(idx)
                .parse()
                .map_err(|_| Error::Parse(format!("Row {}: invalid {}", line, name)))
        };

        // Volume may appear as "123" or "123.0" depending on which tool
        // last wrote the file.
        let volume = field(self.volume)
            .parse::<f64>()
            .map_err(|_| Error::Parse(format!("Row {}: invalid Volume", line)))?
            .round() as u64;

        let daily_return = match field(self.daily_return) {
            "" => None,
            raw => Some(
                raw.parse()
                    .map_err(|_| Error::Parse(format!("Row {}: invalid Daily_Return_%", line)))?,
            ),
        };

        let ticker = field(self.ticker);
        if ticker.is_empty() {
            return Err(Error::Parse(format!("Row {}: empty Ticker", line)));
        }

        Ok(Bar {
            date: parse_date(field(self.date))?,
            ticker: ticker.to_string(),
            open: price(self.open, "Open")?,
            high: price(self.high, "High")?,
            low: price(self.low, "Low")?,
            close: price(self.close, "Close")?,
            volume,
            daily_return_pct: daily_return,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::returns::apply_returns;
    use chrono::NaiveDate;

    fn bar(ticker: &str, day: u32, close: f64) -> Bar {
        Bar::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            ticker.to_string(),
            close - 1.0,
            close + 1.0,
            close - 2.0,
            close,
            12345,
        )
    }

    #[test]
    fn test_round_trip_preserves_rows_and_returns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.csv");

        let mut bars = vec![bar("AAA", 1, 100.0), bar("AAA", 2, 110.0), bar("BBB", 1, 50.0)];
        apply_returns(&mut bars);

        write_master(&path, &bars).unwrap();
        let mut loaded = load_master(&path).unwrap();

        assert_eq!(loaded.len(), bars.len());
        for (a, b) in bars.iter().zip(loaded.iter()) {
            assert_eq!(a.ticker, b.ticker);
            assert_eq!(a.date, b.date);
            assert_eq!(a.close, b.close);
            assert_eq!(a.volume, b.volume);
        }

        // Re-deriving over the loaded set reproduces the same returns
        apply_returns(&mut loaded);
        for (a, b) in bars.iter().zip(loaded.iter()) {
            match (a.daily_return_pct, b.daily_return_pct) {
                (Some(x), Some(y)) => assert!((x - y).abs() < 1e-9),
                (None, None) => {}
                other => panic!("return mismatch: {:?}", other),
            }
        }
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_master(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_load_tolerates_column_order_and_date_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.csv");
        std::fs::write(
            &path,
            "Ticker,Date,Open,High,Low,Close,Volume,Daily_Return_%\n\
             AAA.NS,2024-01-01,9,11,8,10,100,\n\
             AAA.NS,02-01-2024,10,12,9,11,200.0,10.0\n",
        )
        .unwrap();

        let bars = load_master(&path).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[1].volume, 200);
        assert_eq!(bars[0].daily_return_pct, None);
        assert_eq!(bars[1].daily_return_pct, Some(10.0));
    }

    #[test]
    fn test_load_malformed_row_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.csv");
        std::fs::write(
            &path,
            "Date,Open,High,Low,Close,Volume,Ticker,Daily_Return_%\n\
             2024-01-01,not-a-price,11,8,10,100,AAA.NS,\n",
        )
        .unwrap();

        assert!(matches!(
            load_master(&path).unwrap_err(),
            Error::Parse(_)
        ));
    }

    #[test]
    fn test_write_master_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.csv");

        write_master(&path, &[bar("AAA", 1, 100.0)]).unwrap();
        write_master(&path, &[bar("AAA", 1, 100.0), bar("AAA", 2, 101.0)]).unwrap();

        assert_eq!(load_master(&path).unwrap().len(), 2);
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_backup_name_carries_run_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let master = dir.path().join("nifty50_daily.csv");
        let backups = dir.path().join("backups");
        let now = Local::now();

        let path = write_backup(&backups, &master, &[bar("AAA", 1, 100.0)], &now).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("nifty50_daily_backup_"));
        assert!(name.ends_with(".csv"));
        assert!(path.exists());
    }
}
