pub mod dataset;
pub mod fetcher;
pub mod merge;
pub mod returns;
pub mod run_log;
pub mod yahoo;

pub use dataset::{load_master, write_backup, write_master};
pub use fetcher::BarSource;
pub use merge::{merge_bars, MergeOutcome};
pub use returns::{apply_returns, derive_returns};
pub use yahoo::YahooClient;
