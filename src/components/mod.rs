// Export components
pub mod google_calendar;
pub mod migration;
pub mod timetree;
