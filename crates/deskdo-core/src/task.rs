use crate::id::TaskId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One to-do entry.
///
/// `order` is the zero-based rank of the task inside its group; the stores
/// keep it contiguous per group after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    pub order: usize,
    pub group: String,
}

impl Task {
    pub fn new(
        id: TaskId,
        text: impl Into<String>,
        group: impl Into<String>,
        order: usize,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at,
            order,
            group: group.into(),
        }
    }
}

/// `created_at` as a local `YYYY-MM-DD HH:MM:SS` string.
///
/// RFC 3339 strings are accepted on input as well.
pub mod timestamp {
    use crate::error::CoreError;
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn parse(raw: &str) -> Result<NaiveDateTime, CoreError> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_local()))
            .map_err(|_| CoreError::InvalidTimestamp(raw.to_string()))
    }

    pub fn serialize<S: Serializer>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&at.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }
}
