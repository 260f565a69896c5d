use crate::cli::Cli;
use crate::components::google_calendar::{list_calendars, GoogleCalendarClient, TokenManager};
use crate::components::migration::{self, Migration};
use crate::components::timetree;
use crate::config::Config;
use crate::error::Error;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Migrate the export named on the command line
pub async fn run(cli: Cli, config: Config) -> miette::Result<()> {
    let export = timetree::load_export(&cli.input)?;

    if cli.dry_run {
        for result in migration::preview(&export, &config.event_defaults()) {
            match result {
                Ok(event) => println!(
                    "{}",
                    serde_json::to_string_pretty(&event).map_err(Error::from)?
                ),
                Err(e) => error!("Event cannot be converted: {}", e),
            }
        }
        return Ok(());
    }

    // Authenticate once for the whole batch
    let token_manager = TokenManager::new(&config);
    let credential = token_manager.acquire_credentials(&config.scopes).await?;
    let client = GoogleCalendarClient::new(&config.api_base_url, &credential)?;

    let report = Migration::new(&client, config.event_defaults())
        .run(&export, &cli.calendar)
        .await?;

    println!(
        "{} of {} events created in calendar {}",
        report.created(),
        report.events.len(),
        report.calendar_id
    );
    Ok(())
}

/// Print every calendar the account can write to
pub async fn print_calendars(config: Config) -> miette::Result<()> {
    let token_manager = TokenManager::new(&config);
    let credential = token_manager.acquire_credentials(&config.scopes).await?;
    let client = GoogleCalendarClient::new(&config.api_base_url, &credential)?;

    let calendars = list_calendars(&client).await?;
    info!("Found {} calendars", calendars.len());

    for (title, id) in calendars {
        println!("Calendar Title: {}", title);
        println!("Calendar ID: {}", id);
        println!("---");
    }

    Ok(())
}
