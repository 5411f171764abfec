//! Scout CLI
//!
//! Command-line workbench for browsing, running and authoring query patterns.

mod commands;
mod config;
mod name_resolver;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Scout query pattern workbench", long_about = None)]
struct Cli {
    /// Pattern store API base URL
    #[arg(long, env = "SCOUT_API_URL", default_value = scout_client::DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "SCOUT_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// File holding the logged-in user
    #[arg(long, env = "SCOUT_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so tables on stdout stay pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scout=warn,scout_client=warn,scout_workbench=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::new(&cli.api_url, cli.timeout, cli.session_file)?;
    tracing::debug!("Using API at {}", config.api_url);

    handle_command(cli.command, &config).await
}
