mod bar;
mod config;

pub use bar::Bar;
pub use config::Config;

/// The whole historical table, keyed by (ticker, date) after any merge
pub type Dataset = Vec<Bar>;
