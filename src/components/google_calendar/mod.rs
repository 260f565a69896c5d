pub mod client;
pub mod models;
pub mod oauth;
pub mod resolver;
pub mod token;

pub use client::{CalendarService, GoogleCalendarClient};
pub use models::{CalendarSummary, CreatedEvent, GoogleEvent};
pub use resolver::{find_calendar_id, list_calendars, resolve_calendar_id};
pub use token::{Credential, TokenManager, TokenStore};
