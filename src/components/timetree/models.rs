use serde::{Deserialize, Serialize};

/// Top-level shape of a TimeTree export file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeTreeExport {
    pub events: Vec<TimeTreeEvent>,
}

/// A single event as exported by TimeTree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TimeTreeEvent {
    pub title: String,
    pub all_day: bool,
    pub note: String,
    /// Start time in Unix epoch milliseconds
    pub start_at: i64,
    /// End time in Unix epoch milliseconds
    pub end_at: i64,
    pub recurrences: Vec<String>,
    pub start_timezone: String,
    pub location: String,
}
