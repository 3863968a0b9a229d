//! collection-watch - Reports recently updated Ansible collections
//!
//! This is the main entry point for the collection-watch command.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use collection_watch::config::{Config, DEFAULT_CONFIG_PATH};
use collection_watch::hub::HubClient;
use collection_watch::logging::init_tracing;
use collection_watch::window::TimeWindow;

/// Print collections from Ansible Automation Hub updated within the last N days
#[derive(Parser, Debug)]
#[command(name = "collection-watch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Days from today to report updated collections on
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    timedelta: u32,

    /// Path to the configuration file
    #[arg(short, long, env = "COLLECTION_WATCH_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Base URL of the API (overrides hub.url)
    #[arg(long, env = "COLLECTION_WATCH_API_URL")]
    api_url: Option<String>,

    /// Username to authenticate against the API (overrides hub.username)
    #[arg(long, env = "COLLECTION_WATCH_API_USERNAME")]
    api_username: Option<String>,

    /// Password for the API user (overrides hub.password)
    #[arg(long, env = "COLLECTION_WATCH_API_PASSWORD", hide_env_values = true)]
    api_password: Option<String>,

    /// Bearer token for the API (overrides hub.token)
    #[arg(long, env = "COLLECTION_WATCH_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Log level (overrides logging.level)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = load_config(&args)?;

    // Initialize tracing/logging
    init_tracing(&config.logging.level, &config.logging.format)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        url = %config.hub.url,
        timedelta = args.timedelta,
        "Starting collection-watch"
    );

    let window = TimeWindow::new(args.timedelta)?;
    let client = HubClient::new(&config.hub)?;
    let mut stdout = std::io::stdout();

    match collection_watch::run(&config, &client, window, &mut stdout).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Report failed");
            Err(e.into())
        }
    }
}

/// Load the configuration file and apply command-line overrides
fn load_config(args: &Args) -> anyhow::Result<Config> {
    // Use eprintln! since tracing is not yet initialized
    eprintln!("Loading configuration from file: {}", args.config.display());

    let mut config = Config::from_file(&args.config)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    if let Some(url) = &args.api_url {
        config.hub.url = url.clone();
    }
    if let Some(username) = &args.api_username {
        config.hub.username = Some(username.clone());
    }
    if let Some(password) = &args.api_password {
        config.hub.password = Some(password.clone());
    }
    if let Some(token) = &args.api_token {
        config.hub.token = Some(token.clone());
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;

    Ok(config)
}
