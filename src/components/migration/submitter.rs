use crate::components::google_calendar::{CalendarService, CreatedEvent, GoogleEvent};
use crate::error::MigrateResult;
use tracing::info;

/// Create one event on the target calendar
pub async fn submit_event<S>(event: &GoogleEvent, calendar_id: &str, service: &S) -> MigrateResult<CreatedEvent>
where
    S: CalendarService + ?Sized,
{
    let created = service.insert_event(calendar_id, event).await?;

    info!(
        "Event created: {}",
        created.html_link.as_deref().unwrap_or(created.id.as_str())
    );
    Ok(created)
}
