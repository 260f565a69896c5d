pub mod mapper;
pub mod submitter;

pub use mapper::map_event;
pub use submitter::submit_event;

use crate::components::google_calendar::{resolve_calendar_id, CalendarService, CreatedEvent, GoogleEvent};
use crate::components::timetree::TimeTreeExport;
use crate::error::{Error, MigrateResult};
use tracing::{error, info};

/// Target event fields that are the same for every migrated event
#[derive(Debug, Clone, PartialEq)]
pub struct EventDefaults {
    pub timezone: String,
    pub use_default_reminders: bool,
}

/// What happened to one source event
#[derive(Debug)]
pub enum EventOutcome {
    Created(CreatedEvent),
    Failed(Error),
}

/// Per-event result, in input order
#[derive(Debug)]
pub struct EventReport {
    pub index: usize,
    pub title: String,
    pub outcome: EventOutcome,
}

/// Result of a whole migration run
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub calendar_id: String,
    pub events: Vec<EventReport>,
}

impl MigrationReport {
    pub fn created(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.outcome, EventOutcome::Created(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.events.len() - self.created()
    }
}

/// Moves the events of one export into one Google calendar
pub struct Migration<'a, S: CalendarService + ?Sized> {
    service: &'a S,
    defaults: EventDefaults,
}

impl<'a, S: CalendarService + ?Sized> Migration<'a, S> {
    pub fn new(service: &'a S, defaults: EventDefaults) -> Self {
        Self { service, defaults }
    }

    /// Resolve the target calendar once, then map and submit every event.
    ///
    /// Only a failed calendar lookup stops the run. A mapping or submission
    /// failure is recorded for that event and the batch continues.
    pub async fn run(&self, export: &TimeTreeExport, calendar_title: &str) -> MigrateResult<MigrationReport> {
        let calendar_id = resolve_calendar_id(calendar_title, self.service).await?;
        let mut report = MigrationReport {
            calendar_id: calendar_id.clone(),
            events: Vec::with_capacity(export.events.len()),
        };

        for (index, source) in export.events.iter().enumerate() {
            let outcome = match map_event(source, &self.defaults) {
                Ok(event) => self.submit(&event, &calendar_id).await,
                Err(e) => {
                    error!("Skipping event '{}': {}", source.title, e);
                    EventOutcome::Failed(e)
                }
            };

            report.events.push(EventReport {
                index,
                title: source.title.clone(),
                outcome,
            });
        }

        info!(
            "Migration finished: {} created, {} failed",
            report.created(),
            report.failed()
        );
        Ok(report)
    }

    async fn submit(&self, event: &GoogleEvent, calendar_id: &str) -> EventOutcome {
        match submit_event(event, calendar_id, self.service).await {
            Ok(created) => EventOutcome::Created(created),
            Err(e) => {
                error!(
                    "An error occurred creating '{}': {}. Suggestion: the calendar id may be incorrect, run list_calendars",
                    event.summary, e
                );
                EventOutcome::Failed(e)
            }
        }
    }
}

/// Map every event without contacting Google
pub fn preview(export: &TimeTreeExport, defaults: &EventDefaults) -> Vec<MigrateResult<GoogleEvent>> {
    export
        .events
        .iter()
        .map(|source| map_event(source, defaults))
        .collect()
}
