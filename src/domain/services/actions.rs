#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::ChatApiHandle;
use crate::domain::models::ChatOutcome;
use crate::domain::models::ChatRequest;
use crate::domain::models::Event;
use crate::domain::models::HistoryOutcome;

async fn health_check(api: ChatApiHandle, tx: mpsc::UnboundedSender<Event>) -> Result<()> {
    if let Err(err) = api.health_check().await {
        tracing::warn!(error = ?err, "health check failed");
        tx.send(Event::HealthCheckFailed(err.to_string()))?;
    }

    return Ok(());
}

async fn load_history(
    api: ChatApiHandle,
    session_id: String,
    tx: mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let result = api.history(&session_id).await;
    tx.send(Event::HistoryResponse(HistoryOutcome { session_id, result }))?;

    return Ok(());
}

async fn send_message(
    api: ChatApiHandle,
    request: ChatRequest,
    tx: mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let session_id = request.session_id.to_string();
    let result = api.chat(request).await;
    tx.send(Event::ChatResponse(ChatOutcome { session_id, result }))?;

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs requests off the UI loop. Every request answers with exactly one
    /// event, success or not, so the UI can always clear its loading state.
    pub async fn start(
        api: ChatApiHandle,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        tokio::spawn(health_check(api.clone(), tx.clone()));

        while let Some(action) = rx.recv().await {
            let worker_api = api.clone();
            let worker_tx = tx.clone();

            match action {
                Action::LoadHistory(session_id) => {
                    tracing::debug!(session_id = %session_id, "loading history");
                    tokio::spawn(load_history(worker_api, session_id, worker_tx));
                }
                Action::SendMessage(request) => {
                    tracing::debug!(session_id = %request.session_id, "sending message");
                    tokio::spawn(send_message(worker_api, request, worker_tx));
                }
            }
        }

        return Ok(());
    }
}
