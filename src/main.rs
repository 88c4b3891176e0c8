use anyhow::Result;
use clap::Parser;
use placement_hub::{cli, config::Config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file before anything else (silently ignore if missing)
    dotenvy::dotenv().ok();

    let cli_args = cli::Cli::parse();

    let mut log_config = logging::LogConfig::new().with_debug_mode(cli_args.debug);

    // Logging settings from the config file; load errors surface later in cli::run
    let file_config = match cli_args.config.as_deref() {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let configured_dir = match file_config {
        Ok(config) => {
            log_config = log_config.with_level(config.logging.level);
            config.logging.file
        }
        Err(_) => None,
    };
    let log_dir = logging::resolve_log_dir(configured_dir.as_deref());
    log_config = log_config.with_log_dir(log_dir.clone());

    // Without --debug the subscriber writes to stderr, which the UI shares
    let _guard = if cli_args.debug || !cli_args.is_interactive() {
        logging::init_logging(log_config)
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?
    } else {
        None
    };

    // Clean up old log files (keep last 7 days)
    if cli_args.debug
        && let Ok(removed) = logging::cleanup_old_logs(&log_dir, 7)
        && removed > 0
    {
        tracing::info!("Cleaned up {} old log file(s)", removed);
    }

    cli::run(cli_args).await
}
