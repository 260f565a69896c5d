use super::models::{CalendarListPage, CalendarSummary, CreatedEvent, GoogleEvent};
use super::token::Credential;
use crate::error::{google_calendar_error, Error, MigrateResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

/// Largest page size accepted by `calendarList.list`
const CALENDAR_LIST_PAGE_SIZE: &str = "250";

/// Calendar operations the migration depends on
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// List every calendar visible to the account, across all pages
    async fn list_calendars(&self) -> MigrateResult<Vec<CalendarSummary>>;

    /// Create an event on the given calendar
    async fn insert_event(&self, calendar_id: &str, event: &GoogleEvent) -> MigrateResult<CreatedEvent>;
}

/// Google Calendar v3 REST client authorized by a single access token
#[derive(Clone)]
pub struct GoogleCalendarClient {
    base_url: Url,
    access_token: String,
    client: Client,
}

impl GoogleCalendarClient {
    pub fn new(base_url: &str, credential: &Credential) -> MigrateResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        Ok(Self {
            base_url,
            access_token: credential.access_token.clone(),
            client: Client::new(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> MigrateResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("API URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn calendar_list_page(&self, page_token: Option<&str>) -> MigrateResult<CalendarListPage> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;

        let mut request = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("maxResults", CALENDAR_LIST_PAGE_SIZE)]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await?;
        let response = check_status(response, "Failed to list calendars").await?;

        response.json().await.map_err(|e| {
            google_calendar_error(&format!("Failed to parse calendar list response: {}", e))
        })
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarClient {
    async fn list_calendars(&self) -> MigrateResult<Vec<CalendarSummary>> {
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.calendar_list_page(page_token.as_deref()).await?;
            calendars.extend(page.items.into_iter().map(CalendarSummary::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!("Listed {} calendars", calendars.len());
        Ok(calendars)
    }

    async fn insert_event(&self, calendar_id: &str, event: &GoogleEvent) -> MigrateResult<CreatedEvent> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await?;
        let response = check_status(response, "Failed to create event").await?;

        response.json().await.map_err(|e| {
            google_calendar_error(&format!("Failed to parse created event: {}", e))
        })
    }
}

async fn check_status(response: Response, context: &str) -> MigrateResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response".to_string());

    Err(Error::GoogleCalendar(format!(
        "{}: HTTP {} - {}",
        context, status, error_body
    )))
}
