use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::helpers::deserialize_datetime;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    #[serde(deserialize_with = "deserialize_datetime")]
    pub detected_at: DateTime<Utc>,
    #[serde(default)]
    pub person_name: Option<String>,
    pub confidence: f64,
    pub source: String,
    #[serde(default)]
    pub source_info: Option<String>,
}

/// Envelope of `GET /api/logs`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogPage {
    pub logs: Vec<LogEntry>,
}
