use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    /// Anything the API sends that we don't recognise.
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => return "user",
            Role::Assistant => return "assistant",
            Role::System => return "system",
            Role::Unknown => return "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::User => return "You",
            Role::Assistant => return "Legal Assistant",
            Role::System => return "System",
            Role::Unknown => return "Unknown",
        }
    }

    pub fn avatar(&self) -> &'static str {
        match self {
            Role::User => return "🧑",
            Role::Assistant => return "⚖",
            Role::System => return "⚠",
            Role::Unknown => return "•",
        }
    }
}
