use crate::error::Error;
use crate::models::Config;
use crate::pipeline::{self, UpdateOutcome};
use crate::services::YahooClient;

pub fn run() {
    let config = Config::from_defaults();

    match run_pipeline(&config) {
        // NO DATA is a normal outcome (market holiday); exit 0 either way
        Ok(_) => {}
        Err(e) => {
            eprintln!("❌ Update failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_pipeline(config: &Config) -> Result<UpdateOutcome, Error> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Config(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(async {
        let mut source = YahooClient::new()?;
        pipeline::run_update(config, &mut source).await
    })
}
