//! tickflow bot entry point.

use anyhow::Result;
use clap::Parser;
use tickflow_rest::Credentials;
use tracing::info;

/// Randomized order-flow bot for derivatives exchange testnets.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via TICKFLOW_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pull in a local .env before reading credentials.
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tickflow_bot::logging::init_logging();

    info!("Starting tickflow v{}", env!("CARGO_PKG_VERSION"));

    let config = tickflow_bot::AppConfig::load(args.config.as_deref())?;
    info!(symbol = %config.symbol, rest_url = %config.rest_url, "Configuration loaded");

    // Missing credentials are the one fatal startup condition.
    let credentials = Credentials::from_env()?;

    let app = tickflow_bot::Application::new(config, credentials)?;
    app.run().await?;

    Ok(())
}
