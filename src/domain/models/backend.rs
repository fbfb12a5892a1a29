use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Message;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub content: String,
    pub session_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message_id: String,
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
}

/// Result of a chat request, tagged with the session it was sent for.
pub struct ChatOutcome {
    pub session_id: String,
    pub result: Result<ChatReply>,
}

/// Result of a history request, tagged with the session it was sent for.
pub struct HistoryOutcome {
    pub session_id: String,
    pub result: Result<Vec<Message>>,
}

#[async_trait]
pub trait ChatApi {
    /// Used at startup to verify the API can be reached.
    async fn health_check(&self) -> Result<()>;

    /// Returns the ordered message log stored server side for a session. An
    /// absent or null list is an empty history.
    async fn history(&self, session_id: &str) -> Result<Vec<Message>>;

    /// Sends one user message and returns the assistant's reply.
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply>;
}

pub type ChatApiHandle = Arc<dyn ChatApi + Send + Sync>;
