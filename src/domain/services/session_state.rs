#[cfg(test)]
#[path = "session_state_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use uuid::Uuid;

use super::LocalStorage;
use super::StorageKey;
use crate::domain::models::ChatApi;
use crate::domain::models::ChatOutcome;
use crate::domain::models::ChatRequest;
use crate::domain::models::HistoryOutcome;
use crate::domain::models::Message;
use crate::domain::models::Role;

/// The active session and its message log. Owned by a single writer, the
/// UI loop or a CLI command, and handed explicitly to whatever renders it.
pub struct SessionState {
    storage: LocalStorage,
    session_id: String,
    messages: Vec<Message>,
    loading: bool,
    error: Option<String>,
    revision: u64,
}

impl SessionState {
    pub fn new(storage: LocalStorage) -> SessionState {
        return SessionState {
            storage,
            session_id: "".to_string(),
            messages: vec![],
            loading: false,
            error: None,
            revision: 0,
        };
    }

    pub fn create_id() -> String {
        return Uuid::new_v4().to_string();
    }

    pub fn session_id(&self) -> &str {
        return &self.session_id;
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub fn is_loading(&self) -> bool {
        return self.loading;
    }

    pub fn error(&self) -> Option<&str> {
        return self.error.as_deref();
    }

    /// Bumped on every change to the message log, including a replacement
    /// with another empty log.
    pub fn revision(&self) -> u64 {
        return self.revision;
    }

    pub fn set_error(&mut self, error: &str) {
        self.error = Some(error.to_string());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.revision += 1;
    }

    fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.revision += 1;
    }

    /// Makes the stored session current, or creates and stores a new one.
    /// `preferred_id` takes precedence over storage when not empty. Returns
    /// the id whose history must be fetched, `None` for a fresh session.
    pub async fn initialize(&mut self, preferred_id: &str) -> Result<Option<String>> {
        let mut stored = self.storage.get(StorageKey::SessionID).await?;
        if !preferred_id.is_empty() {
            if stored.as_deref() != Some(preferred_id) {
                self.storage.set(StorageKey::SessionID, preferred_id).await?;
            }
            stored = Some(preferred_id.to_string());
        }

        self.replace(vec![]);

        if let Some(id) = stored.filter(|id| return !id.trim().is_empty()) {
            tracing::debug!(session_id = %id, "restored session");
            self.session_id = id.to_string();
            return Ok(Some(id));
        }

        let id = SessionState::create_id();
        self.storage.set(StorageKey::SessionID, &id).await?;
        tracing::debug!(session_id = %id, "created session");
        self.session_id = id;

        return Ok(None);
    }

    /// Starts a fresh conversation. The server creates its side lazily on the
    /// first message.
    pub async fn create_new_session(&mut self) {
        let id = SessionState::create_id();
        tracing::debug!(previous = %self.session_id, session_id = %id, "new session");

        self.session_id = id.to_string();
        self.replace(vec![]);
        self.error = None;

        if let Err(err) = self.storage.set(StorageKey::SessionID, &id).await {
            tracing::error!(error = ?err, "failed to persist session id");
            self.error = Some(format!("Could not save the new session: {err}"));
        }
    }

    pub fn begin_load(&mut self, session_id: &str) {
        self.session_id = session_id.to_string();
        self.replace(vec![]);
        self.loading = true;
        self.error = None;
    }

    pub fn complete_load(&mut self, outcome: HistoryOutcome) {
        self.loading = false;
        if outcome.session_id != self.session_id {
            tracing::debug!(
                session_id = %outcome.session_id,
                "dropping history for inactive session"
            );
            return;
        }

        match outcome.result {
            Ok(messages) => {
                self.replace(messages);
            }
            Err(err) => {
                tracing::error!(error = ?err, session_id = %outcome.session_id, "failed to load history");
                self.replace(vec![]);
                self.error = Some(format!("Could not load the conversation: {err}"));
            }
        }
    }

    pub async fn load_history<A: ChatApi + ?Sized>(&mut self, api: &A, session_id: &str) {
        self.begin_load(session_id);
        let result = api.history(session_id).await;
        self.complete_load(HistoryOutcome {
            session_id: session_id.to_string(),
            result,
        });
    }

    /// Optimistically appends the user's message and returns the request to
    /// send. Content must already be trimmed and non-empty.
    pub fn begin_send(&mut self, content: &str) -> Result<ChatRequest> {
        if content.trim().is_empty() {
            bail!("Cannot send an empty message");
        }
        if self.loading {
            bail!("A request is already in flight");
        }

        self.push(Message::new(Role::User, content));
        self.loading = true;

        return Ok(ChatRequest {
            content: content.to_string(),
            session_id: self.session_id.to_string(),
        });
    }

    /// Appends exactly one terminal message for a request started by
    /// `begin_send`. The user's message stays in place on failure.
    pub fn complete_send(&mut self, outcome: ChatOutcome) {
        self.loading = false;
        if outcome.session_id != self.session_id {
            tracing::debug!(
                session_id = %outcome.session_id,
                "dropping reply for inactive session"
            );
            return;
        }

        match outcome.result {
            Ok(reply) => {
                self.push(Message::from_reply(reply));
            }
            Err(err) => {
                tracing::error!(error = ?err, session_id = %outcome.session_id, "chat request failed");
                self.push(Message::apology());
                self.error = Some(format!("The assistant could not reply: {err}"));
            }
        }
    }

    pub async fn send_message<A: ChatApi + ?Sized>(&mut self, api: &A, content: &str) -> Result<()> {
        let request = self.begin_send(content)?;
        let session_id = request.session_id.to_string();
        let result = api.chat(request).await;
        self.complete_send(ChatOutcome { session_id, result });

        return Ok(());
    }
}
