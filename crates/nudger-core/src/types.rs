//! Record types shared by the exporter, the snapshot loader and the CLI
//!
//! Project and task records are produced by the hosted database and handed
//! to nudger already loaded. Field names follow the database documents
//! (camelCase); every field except the id is optional on the wire.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Deserializes `null` the same way as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns the string if it is present and non-empty.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Why a [`DateLike`] could not be turned into an instant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("empty date string")]
    Empty,

    #[error("timestamp is not a finite number")]
    NotFinite,

    #[error("timestamp out of range")]
    OutOfRange,

    #[error("local time {0} does not exist in the current timezone")]
    NonexistentLocalTime(NaiveDateTime),

    #[error("unrecognized date format: {0}")]
    Unrecognized(String),
}

/// Database timestamp object (`{ seconds, nanoseconds }`).
///
/// Admin SDK JSON dumps prefix both keys with an underscore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    #[serde(alias = "_seconds")]
    pub seconds: i64,
    #[serde(alias = "_nanoseconds", default)]
    pub nanoseconds: u32,
}

/// Any value a record may carry in a date field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateLike {
    /// Milliseconds since the Unix epoch
    Millis(f64),
    /// ISO-8601 / RFC 3339 / RFC 2822 text
    Text(String),
    /// Database timestamp object
    Timestamp(Timestamp),
    /// Already-parsed instant
    Instant(DateTime<Utc>),
}

/// Naive date-time layouts accepted in addition to RFC 3339. Interpreted in
/// local time.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

impl DateLike {
    /// Resolves the value to an instant.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, DateParseError> {
        match self {
            DateLike::Millis(ms) => {
                if !ms.is_finite() {
                    return Err(DateParseError::NotFinite);
                }
                Utc.timestamp_millis_opt(ms.trunc() as i64)
                    .single()
                    .ok_or(DateParseError::OutOfRange)
            }
            DateLike::Text(text) => parse_text(text),
            DateLike::Timestamp(ts) => {
                DateTime::from_timestamp(ts.seconds, ts.nanoseconds).ok_or(DateParseError::OutOfRange)
            }
            DateLike::Instant(dt) => Ok(*dt),
        }
    }
}

fn parse_text(text: &str) -> Result<DateTime<Utc>, DateParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DateParseError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or(DateParseError::NonexistentLocalTime(naive));
        }
    }

    // Date-only ISO strings are UTC midnight
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(DateParseError::Unrecognized(text.to_string()))
}

impl From<DateTime<Utc>> for DateLike {
    fn from(dt: DateTime<Utc>) -> Self {
        DateLike::Instant(dt)
    }
}

impl From<&str> for DateLike {
    fn from(text: &str) -> Self {
        DateLike::Text(text.to_string())
    }
}

impl From<i64> for DateLike {
    fn from(ms: i64) -> Self {
        DateLike::Millis(ms as f64)
    }
}

impl fmt::Display for DateLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateLike::Millis(ms) => write!(f, "{}", ms),
            DateLike::Text(text) => write!(f, "{}", text),
            DateLike::Timestamp(ts) => write!(f, "{}s+{}ns", ts.seconds, ts.nanoseconds),
            DateLike::Instant(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

/// A project record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Older documents carry `name` instead of `title`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateLike>,
}

impl Project {
    /// Create a project with an id and a title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Title, falling back to the legacy `name` field
    pub fn display_name(&self) -> Option<&str> {
        present(&self.title).or_else(|| present(&self.name))
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A task record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Task {
    /// Create an open task with an id and a title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn in_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn completed(mut self) -> Self {
        self.is_complete = true;
        self
    }

    pub fn due(mut self, due: impl Into<DateLike>) -> Self {
        self.due_date = Some(due.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Open, dated, and due strictly before `now`.
    ///
    /// Unparsable due dates never count as overdue.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        if self.is_complete {
            return false;
        }
        self.due_date
            .as_ref()
            .and_then(|due| due.to_datetime().ok())
            .is_some_and(|due| due < now)
    }
}
