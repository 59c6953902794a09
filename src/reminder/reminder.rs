use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ReminderError {
    #[error("invalid due date '{0}': expected RFC 3339, YYYY-MM-DD HH:MM or YYYY-MM-DD")]
    InvalidDueDate(String),

    #[error("custom recurrence needs a positive number of days")]
    ZeroCustomDays,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Custom {
        #[serde(rename = "customDays")]
        custom_days: u32,
    },
}

impl Recurrence {
    pub fn custom(days: u32) -> Result<Self, ReminderError> {
        if days == 0 {
            return Err(ReminderError::ZeroCustomDays);
        }
        Ok(Self::Custom { custom_days: days })
    }

    pub fn label(&self) -> String {
        match self {
            Self::Daily => "daily".to_string(),
            Self::Weekly => "weekly".to_string(),
            Self::Monthly => "monthly".to_string(),
            Self::Custom { custom_days } => format!("Every {} days", custom_days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    #[serde(with = "due_date_format")]
    pub due_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl Reminder {
    pub fn new(title: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            due_date,
            recurrence: None,
        }
    }

    pub fn with_recurrence(mut self, recurrence: Option<Recurrence>) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn due_display(&self, format: &str) -> String {
        self.due_date.with_timezone(&Local).format(format).to_string()
    }
}

/// Parse a due date the way an ISO timestamp string is read: full RFC 3339,
/// a naive date-time taken as UTC, or a bare date at midnight UTC.
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>, ReminderError> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ReminderError::InvalidDueDate(input.to_string()))
}

mod due_date_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_due_date(&raw).map_err(de::Error::custom)
    }
}
