use daily_memes::{collector, config::CollectorConfig, startup};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    startup::init_tracing();

    let config = CollectorConfig::from_env();
    tracing::debug!(?config, "Collector configuration loaded");

    match collector::run(&config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error.source = ?e, "{}", e);
            ExitCode::from(e.exit_status())
        }
    }
}
