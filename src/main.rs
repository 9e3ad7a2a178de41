use anyhow::{Context, Result};
use clap::Parser;
use interview_coach::app_log;
use interview_coach::coach_cli::{handle_coach_command, CoachCli, CoachContext};
use interview_coach::core::{ConfigManager, FsOps};
use std::fs::OpenOptions;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CoachCli::parse();
    let config = ConfigManager::load()?;

    if let Some(parent) = config.storage.log_file.parent() {
        FsOps::ensure_dir_exists(parent).await?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&config.storage.log_file)
        .with_context(|| {
            format!("Failed to open log file: {}", config.storage.log_file.display())
        })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();

    match &config.config_file {
        Some(path) => app_log!(
            info,
            "Loaded {} configuration from {}",
            config.environment,
            path.display()
        ),
        None => app_log!(info, "No config file, using defaults for {}", config.environment),
    }
    app_log!(info, "Environment: {}", config.environment);
    app_log!(info, "Backend: {}", config.service.api_url);
    app_log!(info, "State dir: {}", config.storage.state_dir.display());

    let ctx = CoachContext::new(config)?;
    handle_coach_command(cli, ctx).await
}
