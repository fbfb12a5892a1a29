use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::ChatApi;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequest;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::Role;

struct EchoApi {
    healthy: bool,
}

#[async_trait]
impl ChatApi for EchoApi {
    async fn health_check(&self) -> Result<()> {
        if !self.healthy {
            bail!("API is not running");
        }
        return Ok(());
    }

    async fn history(&self, session_id: &str) -> Result<Vec<Message>> {
        if session_id == "missing" {
            bail!("Session not found");
        }
        return Ok(vec![Message::new(Role::User, session_id)]);
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatReply> {
        return Ok(ChatReply {
            message_id: "m1".to_string(),
            content: format!("echo: {}", request.content),
        });
    }
}

async fn run(
    healthy: bool,
    actions: Vec<Action>,
    expected_events: usize,
) -> Result<Vec<Event>> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    for action in actions {
        action_tx.send(action)?;
    }
    drop(action_tx);

    ActionsService::start(Arc::new(EchoApi { healthy }), event_tx, &mut action_rx).await?;

    let mut events = vec![];
    while events.len() < expected_events {
        match event_rx.recv().await {
            Some(event) => events.push(event),
            None => break,
        }
    }

    return Ok(events);
}

#[tokio::test]
async fn it_answers_a_send_with_a_chat_response() -> Result<()> {
    let events = run(
        true,
        vec![Action::SendMessage(ChatRequest {
            content: "hello".to_string(),
            session_id: "abc".to_string(),
        })],
        1,
    )
    .await?;

    match &events[0] {
        Event::ChatResponse(outcome) => {
            assert_eq!(outcome.session_id, "abc");
            let reply = outcome.result.as_ref().map_err(|err| return anyhow::anyhow!("{err}"))?;
            assert_eq!(reply.content, "echo: hello");
        }
        _ => bail!("Wrong enum"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_answers_a_load_with_a_history_response() -> Result<()> {
    let events = run(true, vec![Action::LoadHistory("missing".to_string())], 1).await?;

    match &events[0] {
        Event::HistoryResponse(outcome) => {
            assert_eq!(outcome.session_id, "missing");
            assert!(outcome.result.is_err());
        }
        _ => bail!("Wrong enum"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_reports_failed_health_checks() -> Result<()> {
    let events = run(false, vec![], 1).await?;

    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::HealthCheckFailed(err) => assert_eq!(err, "API is not running"),
        _ => bail!("Wrong enum"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_stays_quiet_when_healthy() -> Result<()> {
    let events = run(true, vec![], 1).await?;
    assert!(events.is_empty());

    return Ok(());
}
