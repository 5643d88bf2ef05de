use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub user_message: String,
    pub ai_response: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Serialize, Clone)]
pub struct AnalyzeRequest {
    pub symptoms: String,
}

/// Accepts RFC 3339 and the minute-precision ISO form (`2024-05-01T10:00Z`).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%#z"))
        .map_err(|e| format!("Invalid timestamp '{}': {}", raw, e))
}
