use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the migration
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Input error: {0}")]
    #[diagnostic(
        code(timetree_to_gcal::input),
        help("The input must be a TimeTree export with an `events` list where every event field is present")
    )]
    Input(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(timetree_to_gcal::config))]
    Config(String),

    #[error("Client secret unavailable: {0}")]
    #[diagnostic(
        code(timetree_to_gcal::client_secret),
        help("Download the OAuth client file from the Google Cloud Console, or set GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET")
    )]
    ClientSecret(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(code(timetree_to_gcal::auth))]
    Auth(String),

    #[error("Token refresh failed: {0}")]
    #[diagnostic(
        code(timetree_to_gcal::token_refresh),
        help("Delete the stored token file to authorize again")
    )]
    TokenRefresh(String),

    #[error("No calendar title contains '{0}'")]
    #[diagnostic(
        code(timetree_to_gcal::calendar_not_found),
        help("Run list_calendars to see the calendars this account can access")
    )]
    CalendarNotFound(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(timetree_to_gcal::google_calendar))]
    GoogleCalendar(String),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(timetree_to_gcal::http))]
    Http(#[from] reqwest::Error),

    #[error("Time conversion error: {0}")]
    #[diagnostic(code(timetree_to_gcal::time))]
    TimeConversion(String),

    #[error(transparent)]
    #[diagnostic(code(timetree_to_gcal::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(timetree_to_gcal::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(timetree_to_gcal::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type MigrateResult<T> = Result<T, Error>;

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create authorization errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}
