use crate::error::{Error, MigrateResult};
use chrono::{DateTime, Local, TimeZone};

/// Wall-clock layout with a literal `-00:00` suffix.
///
/// The suffix is fixed text and does not describe the offset of the
/// rendered wall-clock time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S-00:00";

/// Render epoch milliseconds as wall-clock time in `tz`
pub fn format_epoch_millis<Tz>(epoch_millis: i64, tz: &Tz) -> MigrateResult<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::from_timestamp_millis(epoch_millis).ok_or_else(|| {
        Error::TimeConversion(format!(
            "Timestamp {} ms is outside the supported date range",
            epoch_millis
        ))
    })?;

    Ok(utc.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string())
}

/// Render epoch milliseconds as wall-clock time in the system timezone
pub fn to_local_timestamp(epoch_millis: i64) -> MigrateResult<String> {
    format_epoch_millis(epoch_millis, &Local)
}
