use clap::Parser;
use timetree_to_gcal::cli::Cli;
use timetree_to_gcal::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    startup::init_logging()?;

    info!("Starting TimeTree migration from {}", cli.input.display());

    // Load configuration
    let config = startup::load_config()?;

    startup::run(cli, config).await
}
