//! Append-only run log.
//!
//! One human-readable line per run. The log is the durable record of
//! outcomes across runs; it is never rewritten.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Append an UPDATE line: rows added, total rows, latest date present
pub fn append_update(
    log_path: &Path,
    timestamp: &str,
    rows_added: usize,
    total_rows: usize,
    latest: NaiveDate,
) -> Result<()> {
    append_line(
        log_path,
        &format!(
            "{} | UPDATE | Added {} rows | Total: {} | Latest: {}",
            timestamp,
            rows_added,
            total_rows,
            latest.format("%Y-%m-%d")
        ),
    )
}

/// Append a NO DATA line (market holiday, empty window)
pub fn append_no_data(log_path: &Path, timestamp: &str) -> Result<()> {
    append_line(log_path, &format!("{} | NO DATA | Market holiday", timestamp))
}

fn append_line(log_path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| Error::Io(format!("Failed to open {}: {}", log_path.display(), e)))?;

    writeln!(file, "{}", line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_append_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("update_log.txt");
        let latest = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

        append_update(&log, "2024-01-03 18:00:00", 49, 170000, latest).unwrap();
        append_no_data(&log, "2024-01-04 18:00:00").unwrap();

        let content = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "2024-01-03 18:00:00 | UPDATE | Added 49 rows | Total: 170000 | Latest: 2024-01-03"
        );
        assert_eq!(lines[1], "2024-01-04 18:00:00 | NO DATA | Market holiday");
    }

    #[test]
    fn test_append_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("nested").join("update_log.txt");

        append_no_data(&log, "2024-01-04 18:00:00").unwrap();
        assert!(log.exists());
    }
}
