use crate::components::migration::EventDefaults;
use crate::error::{config_error, MigrateResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Optional configuration file, read relative to the working directory
pub const CONFIG_FILE: &str = "config/migrate.toml";

/// Default timezone written into every migrated event
pub const DEFAULT_TIMEZONE: &str = "Europe/London";

/// Default Google Calendar API root
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Scopes for read/write access to calendars and their events
pub const DEFAULT_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/calendar.events",
];

/// Main configuration structure for the migration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// File holding the stored OAuth token
    pub token_file: PathBuf,
    /// Client secret file downloaded from the Google Cloud Console
    pub client_secret_file: PathBuf,
    /// Google Calendar API root URL
    pub api_base_url: String,
    /// Timezone name attached to every migrated event
    pub timezone: String,
    /// OAuth scopes requested on authorization
    pub scopes: Vec<String>,
    /// Whether migrated events use the calendar's default reminders
    pub use_default_reminders: bool,
    /// OAuth client ID, used when no client secret file exists
    pub google_client_id: Option<String>,
    /// OAuth client secret, used when no client secret file exists
    pub google_client_secret: Option<String>,
}

/// Values that may be overridden from the TOML file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    token_file: Option<PathBuf>,
    client_secret_file: Option<PathBuf>,
    api_base_url: Option<String>,
    timezone: Option<String>,
    scopes: Option<Vec<String>>,
    use_default_reminders: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from("token.json"),
            client_secret_file: PathBuf::from("credentials.json"),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            use_default_reminders: true,
            google_client_id: None,
            google_client_secret: None,
        }
    }
}

impl Config {
    /// Load configuration from defaults, the config file and the environment
    pub fn load() -> MigrateResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let file_content = match fs::read_to_string(CONFIG_FILE) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Self::from_sources(file_content.as_deref(), |key| env::var(key).ok())
    }

    /// Build configuration from optional TOML content and an environment lookup
    pub fn from_sources<F>(file_content: Option<&str>, env_var: F) -> MigrateResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(content) = file_content {
            let file: ConfigFile = toml::from_str(content)?;
            config.merge_file(file);
        }

        if let Some(path) = env_var("GOOGLE_TOKEN_FILE") {
            config.token_file = PathBuf::from(path);
        }
        if let Some(path) = env_var("GOOGLE_CLIENT_SECRET_FILE") {
            config.client_secret_file = PathBuf::from(path);
        }
        if let Some(url) = env_var("GOOGLE_CALENDAR_API_URL") {
            config.api_base_url = url;
        }
        if let Some(timezone) = env_var("TARGET_TIMEZONE") {
            config.timezone = timezone;
        }
        config.google_client_id = env_var("GOOGLE_CLIENT_ID");
        config.google_client_secret = env_var("GOOGLE_CLIENT_SECRET");

        config.validate()?;
        Ok(config)
    }

    fn merge_file(&mut self, file: ConfigFile) {
        if let Some(path) = file.token_file {
            self.token_file = path;
        }
        if let Some(path) = file.client_secret_file {
            self.client_secret_file = path;
        }
        if let Some(url) = file.api_base_url {
            self.api_base_url = url;
        }
        if let Some(timezone) = file.timezone {
            self.timezone = timezone;
        }
        if let Some(scopes) = file.scopes {
            self.scopes = scopes;
        }
        if let Some(use_default) = file.use_default_reminders {
            self.use_default_reminders = use_default;
        }
    }

    /// Check that the configured values are usable
    pub fn validate(&self) -> MigrateResult<()> {
        if self.timezone.parse::<Tz>().is_err() {
            return Err(config_error(&format!(
                "Unknown timezone '{}'",
                self.timezone
            )));
        }
        if self.scopes.is_empty() {
            return Err(config_error("At least one OAuth scope is required"));
        }
        url::Url::parse(&self.api_base_url).map_err(|e| {
            config_error(&format!("Invalid API URL '{}': {}", self.api_base_url, e))
        })?;
        Ok(())
    }

    /// Event fields that are fixed for the whole run
    pub fn event_defaults(&self) -> EventDefaults {
        EventDefaults {
            timezone: self.timezone.clone(),
            use_default_reminders: self.use_default_reminders,
        }
    }
}
