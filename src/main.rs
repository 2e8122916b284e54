//! blobsize - Azure Blob Storage usage reporting
//!
//! A command-line tool that reports storage consumption per container
//! and per account for the storage accounts given on the command line.

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blobsize::cli::{report_fatal, Cli};
use blobsize::config;
use blobsize::Result;

#[tokio::main]
async fn main() {
    // Parse command-line arguments; a missing --accounts exits non-zero here
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        report_fatal(&mut std::io::stderr(), &e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load_config().await?;
    init_logging(cli.debug || config.debug);

    info!("Starting blobsize");
    cli.execute(config).await
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "blobsize=debug" } else { "blobsize=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
