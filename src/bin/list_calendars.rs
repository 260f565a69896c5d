use timetree_to_gcal::startup;

/// Lists calendar titles and IDs so the right one can be picked for a migration
#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    let config = startup::load_config()?;

    startup::print_calendars(config).await
}
