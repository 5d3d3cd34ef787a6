use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Title used when an incoming record carries none
pub const DEFAULT_TITLE: &str = "New notification";

/// Category tag used when an incoming record carries none
pub const DEFAULT_KIND: &str = "message";

/// Identifier of a notification as the server hands it out.
///
/// Servers emit either numeric or string ids, so both are kept as-is.
/// Equality is strict: `1` and `"1"` are different notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationId {
    Number(i64),
    Text(String),
}

impl NotificationId {
    /// Fresh id for records that arrive without one
    pub fn generate() -> Self {
        NotificationId::Text(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationId::Number(n) => write!(f, "{}", n),
            NotificationId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for NotificationId {
    fn from(n: i64) -> Self {
        NotificationId::Number(n)
    }
}

impl From<&str> for NotificationId {
    fn from(s: &str) -> Self {
        NotificationId::Text(s.to_string())
    }
}

impl From<String> for NotificationId {
    fn from(s: String) -> Self {
        NotificationId::Text(s)
    }
}

/// A partial notification record as it arrives from the server or a live feed.
///
/// Only the fields the store interprets are typed; everything else lands in
/// `extra` and survives normalization untouched. Null values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomingNotification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NotificationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IncomingNotification {
    pub fn with_id(id: impl Into<NotificationId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Fill in every missing field, using `now` when no creation time is known.
    ///
    /// `message` falls back to the `content` field and `createdAt` to the
    /// `timestamp` field; both fallbacks stay in `extra` as well.
    pub fn normalize(self, now: DateTime<Utc>) -> Notification {
        let IncomingNotification {
            id,
            title,
            message,
            read,
            created_at,
            kind,
            extra,
        } = self;

        let message = message
            .or_else(|| string_field(&extra, "content"))
            .unwrap_or_default();
        let created_at = created_at
            .or_else(|| string_field(&extra, "timestamp"))
            .unwrap_or_else(|| format_timestamp(now));

        Notification {
            id: id.unwrap_or_else(NotificationId::generate),
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            message,
            read: read.unwrap_or(false),
            created_at,
            kind: kind.unwrap_or_else(|| DEFAULT_KIND.to_string()),
            extra,
        }
    }
}

fn string_field(extra: &Map<String, Value>, key: &str) -> Option<String> {
    extra.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Notification entity held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub read: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String, // ISO 8601
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notification {
    /// Parsed `created_at`, if it is a timestamp we understand
    pub fn created_instant(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Newest first; unparseable timestamps sort after everything else.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        match (self.created_instant(), other.created_instant()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// ISO 8601 in UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts RFC 3339, offset-less date-times (read as UTC) and bare dates
/// (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
