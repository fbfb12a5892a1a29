#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;
use chrono::NaiveDateTime;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::ChatReply;
use super::Role;

/// Shown in place of an assistant reply whenever a chat request fails.
pub const APOLOGY_TEXT: &str =
    "Sorry, an error occurred while processing your request. Please try again.";

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <Option<String> as serde::Deserialize>::deserialize(deserializer)?;
    return Ok(raw.and_then(|value| return parse_timestamp(&value)));
}

/// Accepts RFC 3339, or naive ISO-8601 which the API emits for some rows and
/// is treated as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    return None;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.to_string(),
            created_at: Some(Utc::now()),
        };
    }

    pub fn apology() -> Message {
        return Message::new(Role::System, APOLOGY_TEXT);
    }

    /// The server supplies id and content, the timestamp is taken on receipt.
    pub fn from_reply(reply: ChatReply) -> Message {
        return Message {
            id: reply.message_id,
            role: Role::Assistant,
            content: reply.content,
            created_at: Some(Utc::now()),
        };
    }

    /// Hour and minute in the viewer's local time, or an empty string.
    pub fn formatted_time(&self) -> String {
        return match self.created_at {
            Some(created_at) => created_at.with_timezone(&Local).format("%H:%M").to_string(),
            None => "".to_string(),
        };
    }
}
