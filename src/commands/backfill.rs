use crate::error::Error;
use crate::models::Config;
use crate::pipeline;
use crate::services::YahooClient;

pub fn run() {
    let config = Config::from_defaults();

    match run_pipeline(&config) {
        Ok(report) => {
            if !report.failed.is_empty() {
                println!(
                    "\n💡 {} tickers had no usable history; re-run backfill to retry them",
                    report.failed.len()
                );
            }
        }
        Err(e) => {
            eprintln!("❌ Backfill failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_pipeline(config: &Config) -> Result<pipeline::backfill::BackfillReport, Error> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Config(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(async {
        let mut source = YahooClient::new()?;
        pipeline::run_backfill(config, &mut source).await
    })
}
