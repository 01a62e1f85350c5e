//! Merge a freshly fetched batch into the existing dataset.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{Bar, Dataset};
use crate::services::returns::apply_returns;

/// Result of merging a fetched batch into the existing dataset
#[derive(Debug)]
pub struct MergeOutcome {
    /// The merged, sorted, return-derived dataset
    pub bars: Dataset,

    /// Net row growth over the existing dataset
    pub rows_added: usize,
}

/// Combine existing rows with a freshly fetched batch.
///
/// Where a (ticker, date) key appears in both, the fetched bar wins: the
/// provider may revise a recent, not-yet-finalized bar. The result is
/// sorted by (ticker, date) ascending and every `daily_return_pct` is
/// re-derived over the merged series, so the value at the fetch-window
/// boundary chains to the true prior close.
///
/// Callers short-circuit to the NO DATA path before calling this; an empty
/// `fresh` batch never reaches merge.
pub fn merge_bars(existing: Dataset, fresh: Dataset) -> MergeOutcome {
    let existing_rows = existing.len();

    let mut by_key: HashMap<(String, NaiveDate), Bar> = HashMap::with_capacity(
        existing_rows + fresh.len(),
    );

    for bar in existing {
        by_key.insert((bar.ticker.clone(), bar.date), bar);
    }
    for bar in fresh {
        by_key.insert((bar.ticker.clone(), bar.date), bar);
    }

    let mut bars: Vec<Bar> = by_key.into_values().collect();
    bars.sort_by(|a, b| a.cmp_key(b));
    apply_returns(&mut bars);

    let rows_added = bars.len().saturating_sub(existing_rows);

    MergeOutcome { bars, rows_added }
}
