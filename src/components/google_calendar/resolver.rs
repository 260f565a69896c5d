use super::client::CalendarService;
use super::models::CalendarSummary;
use crate::error::{Error, MigrateResult};
use tracing::{info, warn};

/// First calendar in listing order whose title contains `title_substring`
pub fn find_calendar_id<'a>(calendars: &'a [CalendarSummary], title_substring: &str) -> Option<&'a str> {
    calendars
        .iter()
        .find(|calendar| calendar.title.contains(title_substring))
        .map(|calendar| calendar.id.as_str())
}

/// Resolve a calendar ID from part of its title
pub async fn resolve_calendar_id<S>(title_substring: &str, service: &S) -> MigrateResult<String>
where
    S: CalendarService + ?Sized,
{
    let calendars = service.list_calendars().await?;

    let matches: Vec<&str> = calendars
        .iter()
        .filter(|calendar| calendar.title.contains(title_substring))
        .map(|calendar| calendar.title.as_str())
        .collect();
    if matches.len() > 1 {
        warn!(
            "{} calendars match '{}': {}. Using the first one",
            matches.len(),
            title_substring,
            matches.join(", ")
        );
    }

    let id = find_calendar_id(&calendars, title_substring)
        .ok_or_else(|| Error::CalendarNotFound(title_substring.to_string()))?;

    info!("Resolved calendar '{}' to {}", title_substring, id);
    Ok(id.to_string())
}

/// Every calendar visible to the account as (title, id) pairs
pub async fn list_calendars<S>(service: &S) -> MigrateResult<Vec<(String, String)>>
where
    S: CalendarService + ?Sized,
{
    let calendars = service.list_calendars().await?;
    Ok(calendars
        .into_iter()
        .map(|calendar| (calendar.title, calendar.id))
        .collect())
}
