use super::EventDefaults;
use crate::components::google_calendar::models::{EventDateTime, GoogleEvent, Reminders};
use crate::components::timetree::time::to_local_timestamp;
use crate::components::timetree::TimeTreeEvent;
use crate::error::MigrateResult;

/// Convert a TimeTree event into a Google Calendar insert payload.
///
/// The note, the all-day flag and the source timezone are not carried over:
/// descriptions are left empty and every event gets `defaults.timezone`.
pub fn map_event(source: &TimeTreeEvent, defaults: &EventDefaults) -> MigrateResult<GoogleEvent> {
    let start = to_local_timestamp(source.start_at)?;
    let end = to_local_timestamp(source.end_at)?;

    Ok(GoogleEvent {
        summary: source.title.clone(),
        location: source.location.clone(),
        description: String::new(),
        start: EventDateTime {
            date_time: start,
            time_zone: defaults.timezone.clone(),
        },
        end: EventDateTime {
            date_time: end,
            time_zone: defaults.timezone.clone(),
        },
        recurrence: source.recurrences.clone(),
        attendees: Vec::new(),
        reminders: Reminders {
            use_default: defaults.use_default_reminders,
        },
    })
}
