use chrono::NaiveDate;

use crate::error::Result;
use crate::models::Bar;

/// A provider of daily bars for one ticker over a date window.
///
/// Contract: exactly one outbound request per call; the window is
/// `[start, end]` inclusive; returned bars carry no derived return. An
/// empty Vec means the provider had no rows for the window. Callers treat
/// that as a ticker-level failure, the same as a transport error, and move
/// on to the next ticker. Pacing between calls is the caller's job.
pub trait BarSource {
    fn fetch_window(
        &mut self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Vec<Bar>>>;
}
