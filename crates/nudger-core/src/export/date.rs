//! Timestamp formatting for frontmatter and note bodies

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

use crate::types::DateLike;

/// `yyyy-MM-dd HH:mm`
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a date field in local time. Absent or unparsable values become an
/// empty string.
pub fn format_date(value: Option<&DateLike>) -> String {
    format_date_in(value, &Local)
}

/// Format a date field in the given timezone
pub fn format_date_in<Tz>(value: Option<&DateLike>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    value
        .and_then(|v| v.to_datetime().ok())
        .map(|dt| format_instant(&dt.with_timezone(tz)))
        .unwrap_or_default()
}

/// Format an instant that is already in the target timezone
pub fn format_instant<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.format(DATE_FORMAT).to_string()
}
