use serde::{Deserialize, Serialize};

/// Event insert payload for the Google Calendar API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub recurrence: Vec<String>,
    pub attendees: Vec<Attendee>,
    pub reminders: Reminders,
}

/// Start or end of an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

/// Event attendee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Reminder policy of an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
}

/// Calendar title and ID as shown in the account's calendar list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarSummary {
    pub title: String,
    pub id: String,
}

/// The parts of an inserted event the migration reports back
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub id: String,
    #[serde(default)]
    pub html_link: Option<String>,
}

/// One page of `users/me/calendarList`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListPage {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
    pub next_page_token: Option<String>,
}

/// Entry of the calendar list
#[derive(Debug, Deserialize)]
pub struct CalendarListEntry {
    pub id: String,
    /// Calendars without a title are listed with an empty one
    #[serde(default)]
    pub summary: String,
}

impl From<CalendarListEntry> for CalendarSummary {
    fn from(entry: CalendarListEntry) -> Self {
        Self {
            title: entry.summary,
            id: entry.id,
        }
    }
}
