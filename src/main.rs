//! cldsync - Cloudinary sync tool
//!
//! Command-line front end for uploading, listing, renaming and deleting
//! Cloudinary resources.

use clap::Parser;
use cldsync::cli::Cli;
use cldsync::config;
use cldsync::error::Result;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Execute the command
    if let Err(e) = run(cli).await {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting cldsync {}", env!("CARGO_PKG_VERSION"));

    // Config commands must work before the configuration is complete
    let config = if cli.needs_service() {
        config::load_config(cli.config.as_deref()).await?
    } else {
        config::load_config_no_validation(cli.config.as_deref()).await?
    };

    cli.execute(config).await
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "cldsync=debug" } else { "cldsync=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
