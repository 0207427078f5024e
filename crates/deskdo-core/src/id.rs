use chrono::{DateTime, TimeZone};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Stable identifier of a task.
///
/// New ids are the SHA-256 of the creation instant, a per-store sequence
/// number and the task text, stored as 64 lowercase hex chars. Documents
/// written by older versions used the creation timestamp as a JSON number;
/// those load with the number's decimal text as the id.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    /// Derive a fresh id for a task created at `at`.
    pub fn generate<Tz: TimeZone>(at: &DateTime<Tz>, seq: u64, text: &str) -> Self {
        let nanos = at.timestamp_nanos_opt().unwrap_or_else(|| at.timestamp_micros());
        let mut hasher = Sha256::new();
        hasher.update(nanos.to_le_bytes());
        hasher.update(seq.to_le_bytes());
        hasher.update(text.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Accept any non-empty token without whitespace.
    pub fn parse(raw: &str) -> Result<Self, crate::error::CoreError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(crate::error::CoreError::InvalidTaskId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 chars, used for display.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => TaskId::parse(&s).map_err(de::Error::custom),
            Raw::Number(n) => Ok(TaskId(n.to_string())),
        }
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.short())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}
