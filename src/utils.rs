use chrono::{DateTime, Local, NaiveDate};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Get data directory from environment variable or use default
pub fn get_data_dir() -> PathBuf {
    std::env::var("NIFTY_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

/// Parse a calendar date from the textual forms seen in master files.
///
/// Accepts an optional trailing time component ("2024-01-02 00:00:00" or
/// ISO 8601 "2024-01-02T00:00:00") and tries ISO first, then day-first
/// forms. Ambiguous day-first strings ("03-04-2024") resolve day-first.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let head = trimmed
        .split(|c| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);

    const FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];

    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(head, format) {
            return Ok(date);
        }
    }

    Err(Error::Parse(format!("Unrecognized date: {}", raw)))
}

/// Run timestamp for log lines and console output ("2026-08-07 18:30:00")
pub fn log_timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Compact run timestamp used in backup file names ("20260807_1830")
pub fn backup_stamp(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M").to_string()
}

/// Thousands-separated integer for console summaries
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date("2024-01-02").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_parse_date_with_time_component() {
        let date = parse_date("2024-01-02 00:00:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

        let date = parse_date("2024-01-02T15:30:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_parse_date_day_first() {
        let date = parse_date("03-04-2024").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());

        let date = parse_date("31/12/2023").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("not a date").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
