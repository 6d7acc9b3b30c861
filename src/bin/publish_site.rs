use daily_memes::{
    config::PublisherConfig,
    errors::AppError,
    exec::SystemCommandRunner,
    publisher::Publisher,
    startup,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    startup::init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error.source = ?e, "{}", e);
            ExitCode::from(e.exit_status())
        }
    }
}

fn run() -> Result<(), AppError> {
    let config = PublisherConfig::from_env()?;
    tracing::info!(root = %config.root.display(), branch = %config.git_branch, "Starting daily site publish");

    let publisher = Publisher::new(config, SystemCommandRunner);
    publisher.build_site()?;
    publisher.publish()?;
    Ok(())
}
