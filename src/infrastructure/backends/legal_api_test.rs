use anyhow::Result;
use mockito::Matcher;
use test_utils::history_fixture;

use super::LegalApi;
use crate::domain::models::ChatApi;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequest;
use crate::domain::models::Role;

fn with_url(url: String) -> LegalApi {
    return LegalApi::new(&url, 2000, 200);
}

#[tokio::test]
async fn it_successfully_health_checks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .create_async()
        .await;

    let api = with_url(server.url());
    let res = api.health_check().await;

    assert!(res.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_health_checks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(500)
        .create_async()
        .await;

    let api = with_url(server.url());
    let res = api.health_check().await;

    assert!(res.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_health_checks_when_unreachable() {
    let api = with_url("http://127.0.0.1:9".to_string());
    assert!(api.health_check().await.is_err());
}

#[tokio::test]
async fn it_loads_history() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/history/abc")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(history_fixture())
        .create_async()
        .await;

    let api = with_url(server.url());
    let messages = api.history("abc").await?;

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, "1");
    assert_eq!(messages[0].content, "hi");
    assert_eq!(messages[0].role, Role::User);
    assert!(messages[0].created_at.is_some());
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_treats_null_history_as_empty() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/history/abc")
        .with_status(200)
        .with_body(r#"{"messages":null}"#)
        .create_async()
        .await;

    let api = with_url(server.url());
    let messages = api.history("abc").await?;

    assert!(messages.is_empty());
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_fails_history_on_error_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/history/abc")
        .with_status(404)
        .with_body(r#"{"detail":"Session not found"}"#)
        .create_async()
        .await;

    let api = with_url(server.url());
    let res = api.history("abc").await;

    assert!(res.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_escapes_session_ids_in_paths() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/history/a%2Fb")
        .with_status(200)
        .with_body(r#"{"messages":[]}"#)
        .create_async()
        .await;

    let api = with_url(server.url());
    api.history("a/b").await?;

    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_sends_chat_messages() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/chat")
        .match_body(Matcher::Json(serde_json::json!({
            "content": "What is tort law?",
            "session_id": "abc",
        })))
        .with_status(200)
        .with_body(r#"{"message_id":"m2","content":"Tort law is...","session_id":"abc"}"#)
        .create_async()
        .await;

    let api = with_url(server.url());
    let reply = api
        .chat(ChatRequest {
            content: "What is tort law?".to_string(),
            session_id: "abc".to_string(),
        })
        .await?;

    assert_eq!(
        reply,
        ChatReply {
            message_id: "m2".to_string(),
            content: "Tort law is...".to_string(),
        }
    );
    mock.assert_async().await;

    return Ok(());
}

#[tokio::test]
async fn it_fails_chat_on_error_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/chat")
        .with_status(500)
        .create_async()
        .await;

    let api = with_url(server.url());
    let res = api
        .chat(ChatRequest {
            content: "test".to_string(),
            session_id: "abc".to_string(),
        })
        .await;

    assert!(res.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_chat_on_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/chat")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let api = with_url(server.url());
    let res = api
        .chat(ChatRequest {
            content: "test".to_string(),
            session_id: "abc".to_string(),
        })
        .await;

    assert!(res.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_respects_a_base_path() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/legal/health")
        .with_status(200)
        .create_async()
        .await;

    let api = with_url(format!("{}/legal/", server.url()));
    api.health_check().await?;

    mock.assert_async().await;

    return Ok(());
}
